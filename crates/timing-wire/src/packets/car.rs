//! CarSetups (id 5), CarTelemetry (id 6), CarStatus (id 7), CarDamage
//! (id 10) and TyreSets (id 12).
//!
//! Four-wheel arrays follow the wire order RL, RR, FL, FR.

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::{GameYear, NUM_CARS, NUM_TYRE_SETS};
use serde::Serialize;

// ── Car setups ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarSetup {
    pub front_wing: u8,
    pub rear_wing: u8,
    pub on_throttle: u8,
    pub off_throttle: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    pub brake_pressure: u8,
    pub brake_bias: u8,
    /// 2024 only.
    pub engine_braking: u8,
    pub tyre_pressure: [f32; 4],
    pub ballast: u8,
    pub fuel_load: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarSetupsPacket {
    pub cars: [CarSetup; NUM_CARS],
    /// 2024 only.
    pub next_front_wing_value: f32,
}

pub(crate) fn decode_car_setups(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<CarSetupsPacket, WireError> {
    let mut packet = CarSetupsPacket::default();
    for car in packet.cars.iter_mut() {
        let mut s = CarSetup {
            front_wing: r.u8()?,              // 0
            rear_wing: r.u8()?,               // 1
            on_throttle: r.u8()?,             // 2
            off_throttle: r.u8()?,            // 3
            front_camber: r.f32_le()?,        // 4-7
            rear_camber: r.f32_le()?,         // 8-11
            front_toe: r.f32_le()?,           // 12-15
            rear_toe: r.f32_le()?,            // 16-19
            front_suspension: r.u8()?,        // 20
            rear_suspension: r.u8()?,         // 21
            front_anti_roll_bar: r.u8()?,     // 22
            rear_anti_roll_bar: r.u8()?,      // 23
            front_suspension_height: r.u8()?, // 24
            rear_suspension_height: r.u8()?,  // 25
            brake_pressure: r.u8()?,          // 26
            brake_bias: r.u8()?,              // 27
            ..CarSetup::default()
        };
        if year == GameYear::Y2024 {
            s.engine_braking = r.u8()?;
        }
        s.tyre_pressure = r.f32_le_array()?;
        s.ballast = r.u8()?;
        s.fuel_load = r.f32_le()?;
        *car = s;
    }
    if year == GameYear::Y2024 {
        packet.next_front_wing_value = r.f32_le()?;
    }
    Ok(packet)
}

// ── Car telemetry ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarTelemetry {
    pub speed_kmh: u16,
    pub throttle: f32,
    pub steer: f32,
    pub brake: f32,
    pub clutch: u8,
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: u8,
    pub rev_lights_percent: u8,
    /// 2022+.
    pub rev_lights_bit_value: u16,
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    pub tyres_pressure: [f32; 4],
    pub surface_type: [u8; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarTelemetryPacket {
    pub cars: [CarTelemetry; NUM_CARS],
    /// 2020 only; later generations moved buttons to the `BUTN` event.
    pub button_status: u32,
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    pub suggested_gear: i8,
}

pub(crate) fn decode_car_telemetry(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<CarTelemetryPacket, WireError> {
    let mut packet = CarTelemetryPacket::default();
    for car in packet.cars.iter_mut() {
        let mut t = CarTelemetry {
            speed_kmh: r.u16_le()?,         // 0-1
            throttle: r.f32_le()?,          // 2-5
            steer: r.f32_le()?,             // 6-9
            brake: r.f32_le()?,             // 10-13
            clutch: r.u8()?,                // 14
            gear: r.i8()?,                  // 15
            engine_rpm: r.u16_le()?,        // 16-17
            drs: r.u8()?,                   // 18
            rev_lights_percent: r.u8()?,    // 19
            ..CarTelemetry::default()
        };
        if year != GameYear::Y2020 {
            t.rev_lights_bit_value = r.u16_le()?; // 20-21
        }
        t.brakes_temperature = r.u16_le_array()?;
        t.tyres_surface_temperature = r.u8_array()?;
        t.tyres_inner_temperature = r.u8_array()?;
        t.engine_temperature = r.u16_le()?;
        t.tyres_pressure = r.f32_le_array()?;
        t.surface_type = r.u8_array()?;
        *car = t;
    }
    if year == GameYear::Y2020 {
        packet.button_status = r.u32_le()?;
    }
    packet.mfd_panel_index = r.u8()?;
    packet.mfd_panel_index_secondary_player = r.u8()?;
    packet.suggested_gear = r.i8()?;
    Ok(packet)
}

// ── Car damage ────────────────────────────────────────────────────────────────

/// Per-car damage. 2020 carries a subset of these inside CarStatus; the
/// decoder lifts it into the same shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarDamage {
    /// Percent.
    pub tyres_wear: [f32; 4],
    pub tyres_damage: [u8; 4],
    pub brakes_damage: [u8; 4],
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub floor_damage: u8,
    pub diffuser_damage: u8,
    pub sidepod_damage: u8,
    pub drs_fault: u8,
    pub ers_fault: u8,
    pub gear_box_damage: u8,
    pub engine_damage: u8,
    pub engine_mguh_wear: u8,
    pub engine_es_wear: u8,
    pub engine_ce_wear: u8,
    pub engine_ice_wear: u8,
    pub engine_mguk_wear: u8,
    pub engine_tc_wear: u8,
    pub engine_blown: u8,
    pub engine_seized: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarDamagePacket {
    pub cars: [CarDamage; NUM_CARS],
}

pub(crate) fn decode_car_damage(r: &mut ByteReader<'_>) -> Result<CarDamagePacket, WireError> {
    let mut packet = CarDamagePacket::default();
    for car in packet.cars.iter_mut() {
        *car = CarDamage {
            tyres_wear: r.f32_le_array()?,      // 0-15
            tyres_damage: r.u8_array()?,        // 16-19
            brakes_damage: r.u8_array()?,       // 20-23
            front_left_wing_damage: r.u8()?,    // 24
            front_right_wing_damage: r.u8()?,   // 25
            rear_wing_damage: r.u8()?,          // 26
            floor_damage: r.u8()?,              // 27
            diffuser_damage: r.u8()?,           // 28
            sidepod_damage: r.u8()?,            // 29
            drs_fault: r.u8()?,                 // 30
            ers_fault: r.u8()?,                 // 31
            gear_box_damage: r.u8()?,           // 32
            engine_damage: r.u8()?,             // 33
            engine_mguh_wear: r.u8()?,          // 34
            engine_es_wear: r.u8()?,            // 35
            engine_ce_wear: r.u8()?,            // 36
            engine_ice_wear: r.u8()?,           // 37
            engine_mguk_wear: r.u8()?,          // 38
            engine_tc_wear: r.u8()?,            // 39
            engine_blown: r.u8()?,              // 40
            engine_seized: r.u8()?,             // 41
        };
    }
    Ok(packet)
}

// ── Car status ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarStatus {
    pub traction_control: u8,
    pub anti_lock_brakes: u8,
    pub fuel_mix: u8,
    pub front_brake_bias: u8,
    pub pit_limiter_status: u8,
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: u8,
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    pub vehicle_fia_flags: i8,
    /// 2023+.
    pub engine_power_ice: f32,
    /// 2023+.
    pub engine_power_mguk: f32,
    pub ers_store_energy: f32,
    pub ers_deploy_mode: u8,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
    pub network_paused: u8,
    /// Wear and damage embedded in the 2020 layout.
    pub legacy_damage: Option<CarDamage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarStatusPacket {
    pub cars: [CarStatus; NUM_CARS],
}

fn decode_car_status_entry(r: &mut ByteReader<'_>, year: GameYear) -> Result<CarStatus, WireError> {
    let mut s = CarStatus {
        traction_control: r.u8()?,         // 0
        anti_lock_brakes: r.u8()?,         // 1
        fuel_mix: r.u8()?,                 // 2
        front_brake_bias: r.u8()?,         // 3
        pit_limiter_status: r.u8()?,       // 4
        fuel_in_tank: r.f32_le()?,         // 5-8
        fuel_capacity: r.f32_le()?,        // 9-12
        fuel_remaining_laps: r.f32_le()?,  // 13-16
        max_rpm: r.u16_le()?,              // 17-18
        idle_rpm: r.u16_le()?,             // 19-20
        max_gears: r.u8()?,                // 21
        drs_allowed: r.u8()?,              // 22
        drs_activation_distance: r.u16_le()?, // 23-24
        ..CarStatus::default()
    };
    if year == GameYear::Y2020 {
        let wear = r.u8_array::<4>()?; // 25-28
        s.actual_tyre_compound = r.u8()?; // 29
        s.visual_tyre_compound = r.u8()?; // 30
        s.tyres_age_laps = r.u8()?; // 31
        let damage = CarDamage {
            tyres_wear: wear.map(f32::from),
            tyres_damage: r.u8_array()?,       // 32-35
            front_left_wing_damage: r.u8()?,   // 36
            front_right_wing_damage: r.u8()?,  // 37
            rear_wing_damage: r.u8()?,         // 38
            drs_fault: r.u8()?,                // 39
            engine_damage: r.u8()?,            // 40
            gear_box_damage: r.u8()?,          // 41
            ..CarDamage::default()
        };
        s.legacy_damage = Some(damage);
        s.vehicle_fia_flags = r.i8()?; // 42
    } else {
        s.actual_tyre_compound = r.u8()?; // 25
        s.visual_tyre_compound = r.u8()?; // 26
        s.tyres_age_laps = r.u8()?; // 27
        s.vehicle_fia_flags = r.i8()?; // 28
        if matches!(year, GameYear::Y2023 | GameYear::Y2024) {
            s.engine_power_ice = r.f32_le()?; // 29-32
            s.engine_power_mguk = r.f32_le()?; // 33-36
        }
    }
    s.ers_store_energy = r.f32_le()?;
    s.ers_deploy_mode = r.u8()?;
    s.ers_harvested_this_lap_mguk = r.f32_le()?;
    s.ers_harvested_this_lap_mguh = r.f32_le()?;
    s.ers_deployed_this_lap = r.f32_le()?;
    if year != GameYear::Y2020 {
        s.network_paused = r.u8()?;
    }
    Ok(s)
}

pub(crate) fn decode_car_status(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<CarStatusPacket, WireError> {
    let mut packet = CarStatusPacket::default();
    for car in packet.cars.iter_mut() {
        *car = decode_car_status_entry(r, year)?;
    }
    Ok(packet)
}

// ── Tyre sets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TyreSet {
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub wear: u8,
    pub available: bool,
    pub recommended_session: u8,
    pub life_span: u8,
    pub usable_life: u8,
    pub lap_delta_time_ms: i16,
    pub fitted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TyreSetsPacket {
    pub car_idx: u8,
    pub sets: [TyreSet; NUM_TYRE_SETS],
    pub fitted_idx: u8,
}

pub(crate) fn decode_tyre_sets(r: &mut ByteReader<'_>) -> Result<TyreSetsPacket, WireError> {
    let mut packet = TyreSetsPacket {
        car_idx: r.u8()?,
        ..TyreSetsPacket::default()
    };
    for set in packet.sets.iter_mut() {
        *set = TyreSet {
            actual_tyre_compound: r.u8()?,
            visual_tyre_compound: r.u8()?,
            wear: r.u8()?,
            available: r.bool()?,
            recommended_session: r.u8()?,
            life_span: r.u8()?,
            usable_life: r.u8()?,
            lap_delta_time_ms: r.i16_le()?,
            fitted: r.bool()?,
        };
    }
    packet.fitted_idx = r.u8()?;
    Ok(packet)
}
