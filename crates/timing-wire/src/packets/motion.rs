//! Motion (id 0) and MotionEx (id 13). Decoded for completeness; the timing
//! engine keeps them as snapshots only.

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::{GameYear, MOTION_PLAYER_TRAILER_SIZE, NUM_CARS};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarMotion {
    pub world_position: [f32; 3],
    pub world_velocity: [f32; 3],
    pub world_forward_dir: [i16; 3],
    pub world_right_dir: [i16; 3],
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MotionPacket {
    pub cars: [CarMotion; NUM_CARS],
}

pub(crate) fn decode_motion(r: &mut ByteReader<'_>, year: GameYear) -> Result<MotionPacket, WireError> {
    let mut packet = MotionPacket::default();
    for car in packet.cars.iter_mut() {
        let world_position = r.f32_le_array::<3>()?; // 0-11
        let world_velocity = r.f32_le_array::<3>()?; // 12-23
        let mut world_forward_dir = [0i16; 3];
        for v in world_forward_dir.iter_mut() {
            *v = r.i16_le()?; // 24-29
        }
        let mut world_right_dir = [0i16; 3];
        for v in world_right_dir.iter_mut() {
            *v = r.i16_le()?; // 30-35
        }
        *car = CarMotion {
            world_position,
            world_velocity,
            world_forward_dir,
            world_right_dir,
            g_force_lateral: r.f32_le()?,      // 36-39
            g_force_longitudinal: r.f32_le()?, // 40-43
            g_force_vertical: r.f32_le()?,     // 44-47
            yaw: r.f32_le()?,                  // 48-51
            pitch: r.f32_le()?,                // 52-55
            roll: r.f32_le()?,                 // 56-59
        };
    }
    if matches!(year, GameYear::Y2020 | GameYear::Y2022) {
        // Player-only suspension/wheel block, superseded by MotionEx.
        r.skip(MOTION_PLAYER_TRAILER_SIZE)?;
    }
    Ok(packet)
}

/// Extended player motion (2023+). Arrays are RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MotionExPacket {
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip_ratio: [f32; 4],
    pub wheel_slip_angle: [f32; 4],
    pub wheel_lat_force: [f32; 4],
    pub wheel_long_force: [f32; 4],
    pub height_of_cog_above_ground: f32,
    pub local_velocity: [f32; 3],
    pub angular_velocity: [f32; 3],
    pub angular_acceleration: [f32; 3],
    pub front_wheels_angle: f32,
    pub wheel_vert_force: [f32; 4],
    /// 2024 only.
    pub front_aero_height: f32,
    pub rear_aero_height: f32,
    pub front_roll_angle: f32,
    pub rear_roll_angle: f32,
    pub chassis_yaw: f32,
}

pub(crate) fn decode_motion_ex(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<MotionExPacket, WireError> {
    let mut m = MotionExPacket {
        suspension_position: r.f32_le_array()?,
        suspension_velocity: r.f32_le_array()?,
        suspension_acceleration: r.f32_le_array()?,
        wheel_speed: r.f32_le_array()?,
        wheel_slip_ratio: r.f32_le_array()?,
        wheel_slip_angle: r.f32_le_array()?,
        wheel_lat_force: r.f32_le_array()?,
        wheel_long_force: r.f32_le_array()?,
        height_of_cog_above_ground: r.f32_le()?,
        local_velocity: r.f32_le_array()?,
        angular_velocity: r.f32_le_array()?,
        angular_acceleration: r.f32_le_array()?,
        front_wheels_angle: r.f32_le()?,
        wheel_vert_force: r.f32_le_array()?,
        ..MotionExPacket::default()
    };
    if year == GameYear::Y2024 {
        m.front_aero_height = r.f32_le()?;
        m.rear_aero_height = r.f32_le()?;
        m.front_roll_angle = r.f32_le()?;
        m.rear_roll_angle = r.f32_le()?;
        m.chassis_yaw = r.f32_le()?;
    }
    Ok(m)
}
