//! Lap (id 2), FinalClassification (id 8), SessionHistory (id 11) and
//! TimeTrial (id 14).
//!
//! All times are normalised to milliseconds. 2020 reported lap times as f32
//! seconds; 2023+ split long times into a minutes byte plus a millisecond
//! u16.

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::{GameYear, MAX_HISTORY_LAPS, MAX_TYRE_STINTS, NUM_CARS};
use serde::Serialize;

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range is checked before the cast"
)]
fn seconds_to_ms(seconds: f32) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    let ms = (f64::from(seconds) * 1000.0).round();
    if ms >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        ms as u32
    }
}

// ── Lap ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LapEntry {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    pub sector1_time_ms: u32,
    pub sector2_time_ms: u32,
    /// 2023+.
    pub delta_to_car_in_front_ms: u32,
    /// 2023+.
    pub delta_to_race_leader_ms: u32,
    /// Negative before the car crosses the line on an out lap.
    pub lap_distance: f32,
    pub total_distance: f32,
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    /// 0 none, 1 pitting, 2 in pit area.
    pub pit_status: u8,
    pub num_pit_stops: u8,
    /// 0 = sector1, 1 = sector2, 2 = sector3.
    pub sector: u8,
    pub current_lap_invalid: bool,
    /// Accumulated time penalties in seconds.
    pub penalties: u8,
    pub total_warnings: u8,
    pub corner_cutting_warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    /// 0 garage, 1 flying lap, 2 in lap, 3 out lap, 4 on track.
    pub driver_status: u8,
    /// 0 invalid, 1 inactive, 2 active, 3 finished, then year-specific terminal codes.
    pub result_status: u8,
    pub pit_lane_timer_active: bool,
    pub pit_lane_time_in_lane_ms: u16,
    pub pit_stop_timer_ms: u16,
    pub pit_stop_should_serve_pen: bool,
    pub speed_trap_fastest_speed: f32,
    pub speed_trap_fastest_lap: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapPacket {
    pub cars: [LapEntry; NUM_CARS],
    pub time_trial_pb_car_idx: u8,
    pub time_trial_rival_car_idx: u8,
}

fn decode_lap_entry_2020(r: &mut ByteReader<'_>) -> Result<LapEntry, WireError> {
    let mut e = LapEntry {
        last_lap_time_ms: seconds_to_ms(r.f32_le()?),    // 0-3
        current_lap_time_ms: seconds_to_ms(r.f32_le()?), // 4-7
        sector1_time_ms: u32::from(r.u16_le()?),         // 8-9
        sector2_time_ms: u32::from(r.u16_le()?),         // 10-11
        ..LapEntry::default()
    };
    // bestLapTime f32, bestLapNum, best-lap sectors 3×u16,
    // best overall sectors 3×(u16 + lap u8) (12-31)
    r.skip(4 + 1 + 6 + 9)?;
    e.lap_distance = r.f32_le()?; // 32-35
    e.total_distance = r.f32_le()?; // 36-39
    e.safety_car_delta = r.f32_le()?; // 40-43
    e.car_position = r.u8()?; // 44
    e.current_lap_num = r.u8()?; // 45
    e.pit_status = r.u8()?; // 46
    e.sector = r.u8()?; // 47
    e.current_lap_invalid = r.bool()?; // 48
    e.penalties = r.u8()?; // 49
    e.grid_position = r.u8()?; // 50
    e.driver_status = r.u8()?; // 51
    e.result_status = r.u8()?; // 52
    Ok(e)
}

fn decode_lap_entry(r: &mut ByteReader<'_>, year: GameYear) -> Result<LapEntry, WireError> {
    if year == GameYear::Y2020 {
        return decode_lap_entry_2020(r);
    }
    let mut e = LapEntry {
        last_lap_time_ms: r.u32_le()?,    // 0-3
        current_lap_time_ms: r.u32_le()?, // 4-7
        ..LapEntry::default()
    };
    match year {
        GameYear::Y2022 => {
            e.sector1_time_ms = u32::from(r.u16_le()?); // 8-9
            e.sector2_time_ms = u32::from(r.u16_le()?); // 10-11
        }
        GameYear::Y2023 => {
            e.sector1_time_ms = r.split_time_ms()?; // 8-10
            e.sector2_time_ms = r.split_time_ms()?; // 11-13
            e.delta_to_car_in_front_ms = u32::from(r.u16_le()?); // 14-15
            e.delta_to_race_leader_ms = u32::from(r.u16_le()?); // 16-17
        }
        _ => {
            e.sector1_time_ms = r.split_time_ms()?; // 8-10
            e.sector2_time_ms = r.split_time_ms()?; // 11-13
            e.delta_to_car_in_front_ms = r.split_time_ms()?; // 14-16
            e.delta_to_race_leader_ms = r.split_time_ms()?; // 17-19
        }
    }
    e.lap_distance = r.f32_le()?;
    e.total_distance = r.f32_le()?;
    e.safety_car_delta = r.f32_le()?;
    e.car_position = r.u8()?;
    e.current_lap_num = r.u8()?;
    e.pit_status = r.u8()?;
    e.num_pit_stops = r.u8()?;
    e.sector = r.u8()?;
    e.current_lap_invalid = r.bool()?;
    e.penalties = r.u8()?;
    e.total_warnings = r.u8()?;
    if year != GameYear::Y2022 {
        e.corner_cutting_warnings = r.u8()?;
    }
    e.num_unserved_drive_through_pens = r.u8()?;
    e.num_unserved_stop_go_pens = r.u8()?;
    e.grid_position = r.u8()?;
    e.driver_status = r.u8()?;
    e.result_status = r.u8()?;
    e.pit_lane_timer_active = r.bool()?;
    e.pit_lane_time_in_lane_ms = r.u16_le()?;
    e.pit_stop_timer_ms = r.u16_le()?;
    e.pit_stop_should_serve_pen = r.bool()?;
    if year == GameYear::Y2024 {
        e.speed_trap_fastest_speed = r.f32_le()?;
        e.speed_trap_fastest_lap = r.u8()?;
    }
    Ok(e)
}

pub(crate) fn decode_lap(r: &mut ByteReader<'_>, year: GameYear) -> Result<LapPacket, WireError> {
    let mut packet = LapPacket::default();
    for car in packet.cars.iter_mut() {
        *car = decode_lap_entry(r, year)?;
    }
    if year != GameYear::Y2020 {
        packet.time_trial_pb_car_idx = r.u8()?;
        packet.time_trial_rival_car_idx = r.u8()?;
    }
    Ok(packet)
}

// ── Final classification ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassificationRecord {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: u8,
    pub best_lap_time_ms: u32,
    /// Seconds, without penalties.
    pub total_race_time: f64,
    pub penalties_time: u8,
    pub num_penalties: u8,
    pub num_tyre_stints: u8,
    pub tyre_stints_actual: [u8; MAX_TYRE_STINTS],
    pub tyre_stints_visual: [u8; MAX_TYRE_STINTS],
    /// 2022+.
    pub tyre_stints_end_laps: [u8; MAX_TYRE_STINTS],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalClassificationPacket {
    pub num_cars: u8,
    pub entries: [ClassificationRecord; NUM_CARS],
}

fn decode_classification_entry(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<ClassificationRecord, WireError> {
    let mut c = ClassificationRecord {
        position: r.u8()?,      // 0
        num_laps: r.u8()?,      // 1
        grid_position: r.u8()?, // 2
        points: r.u8()?,        // 3
        num_pit_stops: r.u8()?, // 4
        result_status: r.u8()?, // 5
        ..ClassificationRecord::default()
    };
    c.best_lap_time_ms = match year {
        GameYear::Y2020 => seconds_to_ms(r.f32_le()?),
        _ => r.u32_le()?,
    }; // 6-9
    c.total_race_time = r.f64_le()?; // 10-17
    c.penalties_time = r.u8()?; // 18
    c.num_penalties = r.u8()?; // 19
    c.num_tyre_stints = r.u8()?; // 20
    c.tyre_stints_actual = r.u8_array()?; // 21-28
    c.tyre_stints_visual = r.u8_array()?; // 29-36
    if year != GameYear::Y2020 {
        c.tyre_stints_end_laps = r.u8_array()?; // 37-44
    }
    Ok(c)
}

pub(crate) fn decode_final_classification(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<FinalClassificationPacket, WireError> {
    let mut packet = FinalClassificationPacket {
        num_cars: r.u8()?,
        ..FinalClassificationPacket::default()
    };
    for entry in packet.entries.iter_mut() {
        *entry = decode_classification_entry(r, year)?;
    }
    Ok(packet)
}

// ── Session history ───────────────────────────────────────────────────────────

/// Bits of [`LapHistory::valid_flags`].
pub const LAP_VALID: u8 = 0x01;
pub const SECTOR1_VALID: u8 = 0x02;
pub const SECTOR2_VALID: u8 = 0x04;
pub const SECTOR3_VALID: u8 = 0x08;
pub const ALL_VALID: u8 = LAP_VALID | SECTOR1_VALID | SECTOR2_VALID | SECTOR3_VALID;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LapHistory {
    pub lap_time_ms: u32,
    pub sector1_time_ms: u32,
    pub sector2_time_ms: u32,
    pub sector3_time_ms: u32,
    pub valid_flags: u8,
}

impl LapHistory {
    pub fn is_fully_valid(&self) -> bool {
        self.valid_flags & ALL_VALID == ALL_VALID
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TyreStintHistory {
    pub end_lap: u8,
    pub tyre_actual_compound: u8,
    pub tyre_visual_compound: u8,
}

/// One car's lap history; the game cycles through cars, one per packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHistoryPacket {
    pub car_idx: u8,
    pub num_laps: u8,
    pub num_tyre_stints: u8,
    pub best_lap_time_lap_num: u8,
    pub best_sector1_lap_num: u8,
    pub best_sector2_lap_num: u8,
    pub best_sector3_lap_num: u8,
    pub laps: Vec<LapHistory>,
    pub tyre_stints: [TyreStintHistory; MAX_TYRE_STINTS],
}

impl Default for SessionHistoryPacket {
    fn default() -> Self {
        Self {
            car_idx: 0,
            num_laps: 0,
            num_tyre_stints: 0,
            best_lap_time_lap_num: 0,
            best_sector1_lap_num: 0,
            best_sector2_lap_num: 0,
            best_sector3_lap_num: 0,
            laps: vec![LapHistory::default(); MAX_HISTORY_LAPS],
            tyre_stints: [TyreStintHistory::default(); MAX_TYRE_STINTS],
        }
    }
}

pub(crate) fn decode_session_history(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<SessionHistoryPacket, WireError> {
    let mut packet = SessionHistoryPacket {
        car_idx: r.u8()?,
        num_laps: r.u8()?,
        num_tyre_stints: r.u8()?,
        best_lap_time_lap_num: r.u8()?,
        best_sector1_lap_num: r.u8()?,
        best_sector2_lap_num: r.u8()?,
        best_sector3_lap_num: r.u8()?,
        laps: Vec::with_capacity(MAX_HISTORY_LAPS),
        tyre_stints: Default::default(),
    };
    for _ in 0..MAX_HISTORY_LAPS {
        let lap = match year {
            GameYear::Y2020 | GameYear::Y2022 => LapHistory {
                lap_time_ms: r.u32_le()?,
                sector1_time_ms: u32::from(r.u16_le()?),
                sector2_time_ms: u32::from(r.u16_le()?),
                sector3_time_ms: u32::from(r.u16_le()?),
                valid_flags: r.u8()?,
            },
            GameYear::Y2023 | GameYear::Y2024 => LapHistory {
                lap_time_ms: r.u32_le()?,
                sector1_time_ms: r.split_time_ms()?,
                sector2_time_ms: r.split_time_ms()?,
                sector3_time_ms: r.split_time_ms()?,
                valid_flags: r.u8()?,
            },
        };
        packet.laps.push(lap);
    }
    for stint in packet.tyre_stints.iter_mut() {
        *stint = TyreStintHistory {
            end_lap: r.u8()?,
            tyre_actual_compound: r.u8()?,
            tyre_visual_compound: r.u8()?,
        };
    }
    Ok(packet)
}

// ── Time trial (2024) ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeTrialDataSet {
    pub car_idx: u8,
    pub team_id: u8,
    pub lap_time_ms: u32,
    pub sector1_time_ms: u32,
    pub sector2_time_ms: u32,
    pub sector3_time_ms: u32,
    pub traction_control: u8,
    pub gearbox_assist: u8,
    pub anti_lock_brakes: u8,
    pub equal_car_performance: u8,
    pub custom_setup: u8,
    pub valid: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeTrialPacket {
    pub player_session_best: TimeTrialDataSet,
    pub personal_best: TimeTrialDataSet,
    pub rival: TimeTrialDataSet,
}

fn decode_time_trial_set(r: &mut ByteReader<'_>) -> Result<TimeTrialDataSet, WireError> {
    Ok(TimeTrialDataSet {
        car_idx: r.u8()?,
        team_id: r.u8()?,
        lap_time_ms: r.u32_le()?,
        sector1_time_ms: r.u32_le()?,
        sector2_time_ms: r.u32_le()?,
        sector3_time_ms: r.u32_le()?,
        traction_control: r.u8()?,
        gearbox_assist: r.u8()?,
        anti_lock_brakes: r.u8()?,
        equal_car_performance: r.u8()?,
        custom_setup: r.u8()?,
        valid: r.u8()?,
    })
}

pub(crate) fn decode_time_trial(r: &mut ByteReader<'_>) -> Result<TimeTrialPacket, WireError> {
    Ok(TimeTrialPacket {
        player_session_best: decode_time_trial_set(r)?,
        personal_best: decode_time_trial_set(r)?,
        rival: decode_time_trial_set(r)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_seconds_round_to_milliseconds() {
        assert_eq!(seconds_to_ms(90.0), 90_000);
        assert_eq!(seconds_to_ms(30.4999), 30_500);
        assert_eq!(seconds_to_ms(0.0), 0);
        assert_eq!(seconds_to_ms(-3.0), 0);
    }
}
