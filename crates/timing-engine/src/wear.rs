//! Tyre and car damage summaries.

use racing_timing_wire::packets::{CarDamage, CarTelemetry};
use serde::Serialize;

/// Per-wheel values in display order. The wire order is RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Wheels<T> {
    pub front_left: T,
    pub front_right: T,
    pub rear_left: T,
    pub rear_right: T,
}

impl<T: Copy> Wheels<T> {
    pub fn from_wire(values: [T; 4]) -> Self {
        let [rear_left, rear_right, front_left, front_right] = values;
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WearDetail {
    /// Percent.
    pub tyre_wear: Wheels<f32>,
    pub tyre_inner_temperature: Wheels<u8>,
    pub tyre_surface_temperature: Wheels<u8>,
    pub brake_temperature: Wheels<u16>,
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub engine_temperature: u16,
}

impl WearDetail {
    pub(crate) fn apply_damage(&mut self, damage: &CarDamage) {
        self.tyre_wear = Wheels::from_wire(damage.tyres_wear);
        self.front_left_wing_damage = damage.front_left_wing_damage;
        self.front_right_wing_damage = damage.front_right_wing_damage;
        self.rear_wing_damage = damage.rear_wing_damage;
    }

    pub(crate) fn apply_telemetry(&mut self, telemetry: &CarTelemetry) {
        self.tyre_inner_temperature = Wheels::from_wire(telemetry.tyres_inner_temperature);
        self.tyre_surface_temperature = Wheels::from_wire(telemetry.tyres_surface_temperature);
        self.brake_temperature = Wheels::from_wire(telemetry.brakes_temperature);
        self.engine_temperature = telemetry.engine_temperature;
    }
}

/// Mean tyre wear normalised so that 75 % reads as fully worn.
pub fn tyre_damage(wear: [f32; 4]) -> f32 {
    let mean = wear.iter().sum::<f32>() / 400.0;
    if mean >= 0.75 {
        1.0
    } else {
        (mean / 0.75).max(0.0)
    }
}

/// Wing damage normalised so that 50 % reads as fully damaged.
pub fn car_damage(damage: &CarDamage) -> f32 {
    let total = f32::from(damage.front_left_wing_damage)
        + f32::from(damage.front_right_wing_damage)
        + f32::from(damage.rear_wing_damage);
    let mean = total / 300.0;
    if mean >= 0.5 { 1.0 } else { mean * 2.0 }
}
