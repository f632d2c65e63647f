//! Per-car state: identity, lap records, tyres, penalties and gaps.

use crate::wear::WearDetail;
use racing_timing_wire::appendix::{Team, VisualTyre};
use serde::Serialize;

/// Lap slots per car; lap N lives at index N-1.
pub const MAX_LAPS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DriverStatus {
    #[default]
    Garage,
    OutLap,
    OnTrack,
    InLap,
    Pitlane,
    Pitting,
    Dnf,
    Dsq,
    Retired,
}

impl DriverStatus {
    /// States a car does not come back from within a session.
    pub const fn is_terminal(self) -> bool {
        matches!(self, DriverStatus::Dnf | DriverStatus::Dsq | DriverStatus::Retired)
    }
}

/// Times are in milliseconds; 0 means not yet known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LapRecord {
    pub sector1_ms: u32,
    pub sector2_ms: u32,
    pub lap_ms: u32,
    /// Elapsed race time up to and including this lap.
    pub accumulated_ms: u32,
    pub invalid: bool,
    /// Indices into the session event list.
    pub incidents: Vec<usize>,
}

impl LapRecord {
    pub fn sector1_s(&self) -> f32 {
        ms_to_s(self.sector1_ms)
    }

    pub fn sector2_s(&self) -> f32 {
        ms_to_s(self.sector2_ms)
    }

    /// Third sector, derived once the lap has closed.
    pub fn sector3_ms(&self) -> Option<u32> {
        if self.lap_ms == 0 || self.sector1_ms == 0 || self.sector2_ms == 0 {
            return None;
        }
        self.lap_ms.checked_sub(self.sector1_ms + self.sector2_ms)
    }

    pub fn lap_s(&self) -> f32 {
        ms_to_s(self.lap_ms)
    }

    pub fn accumulated_s(&self) -> f64 {
        f64::from(self.accumulated_ms) / 1000.0
    }

    /// No timing recorded yet (incidents do not count).
    pub fn has_no_times(&self) -> bool {
        self.sector1_ms == 0 && self.sector2_ms == 0 && self.lap_ms == 0
    }

    /// Zero the timing fields, keeping incidents.
    pub(crate) fn clear_times(&mut self) {
        self.sector1_ms = 0;
        self.sector2_ms = 0;
        self.lap_ms = 0;
        self.accumulated_ms = 0;
        self.invalid = false;
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "lap and sector times stay far below f32's 2^24 exact range"
)]
fn ms_to_s(ms: u32) -> f32 {
    ms as f32 / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSlot {
    /// Car index, fixed for the slot's lifetime.
    pub id: usize,
    pub race_number: u8,
    pub team: Team,
    /// Name to display after mapping and online-name rules.
    pub name: String,
    /// Name exactly as reported by the game.
    pub telemetry_name: String,
    pub mapped_name: Option<String>,
    pub tag: Option<String>,
    pub is_player: bool,
    pub present: bool,
    pub status: DriverStatus,
    pub position: u8,
    pub lap_number: u8,
    pub laps: Vec<LapRecord>,
    pub fastest_lap: LapRecord,
    /// Index of the in-progress lap in `laps`.
    pub current_lap: usize,
    pub wear: WearDetail,
    /// 0..=1, see [`crate::wear::tyre_damage`].
    pub tyre_damage: f32,
    /// 0..=1, see [`crate::wear::car_damage`].
    pub car_damage: f32,
    /// `actualTyreCompound` code.
    pub tyre: u8,
    pub visual_tyre: VisualTyre,
    pub visual_tyres: Vec<VisualTyre>,
    pub tyre_age: u8,
    /// Servable penalties, as indices into the session event list.
    pub pit_penalties: Vec<usize>,
    /// Set on entering the pit box, cleared on leaving the pit lane.
    pub has_pitted: bool,
    pub penalty_seconds: u8,
    pub delta_to_player: f32,
    pub last_delta_to_player: f32,
    pub delta_to_leader: f32,
    /// Distance around the current lap; negative before the line.
    pub location_on_track: f32,
    pub(crate) allow_quali_history: bool,
}

impl DriverSlot {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            race_number: 0,
            team: Team::default(),
            name: String::new(),
            telemetry_name: String::new(),
            mapped_name: None,
            tag: None,
            is_player: false,
            present: false,
            status: DriverStatus::default(),
            position: 0,
            lap_number: 1,
            laps: vec![LapRecord::default(); MAX_LAPS],
            fastest_lap: LapRecord::default(),
            current_lap: 0,
            wear: WearDetail::default(),
            tyre_damage: 0.0,
            car_damage: 0.0,
            tyre: 0,
            visual_tyre: VisualTyre::default(),
            visual_tyres: Vec::new(),
            tyre_age: 0,
            pit_penalties: Vec::new(),
            has_pitted: false,
            penalty_seconds: 0,
            delta_to_player: 0.0,
            last_delta_to_player: 0.0,
            delta_to_leader: 0.0,
            location_on_track: 0.0,
            allow_quali_history: false,
        }
    }

    /// Reset in place for a new session. The lap vector keeps its allocation.
    pub fn reset(&mut self) {
        let mut laps = std::mem::take(&mut self.laps);
        laps.clear();
        laps.resize(MAX_LAPS, LapRecord::default());
        let mut tyres = std::mem::take(&mut self.visual_tyres);
        tyres.clear();
        let mut penalties = std::mem::take(&mut self.pit_penalties);
        penalties.clear();
        *self = Self {
            laps,
            visual_tyres: tyres,
            pit_penalties: penalties,
            ..Self::new(self.id)
        };
    }

    pub fn lap(&self, number: u8) -> Option<&LapRecord> {
        usize::from(number).checked_sub(1).and_then(|idx| self.laps.get(idx))
    }

    pub fn current(&self) -> Option<&LapRecord> {
        self.laps.get(self.current_lap)
    }

    /// Laps with a recorded lap time, in order.
    pub fn completed_laps(&self) -> impl Iterator<Item = (u8, &LapRecord)> {
        (1..=u8::MAX)
            .zip(self.laps.iter())
            .filter(|(_, lap)| lap.lap_ms != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn new_slot_has_preallocated_laps() {
        let d = DriverSlot::new(7);
        assert_eq!(d.id, 7);
        assert_eq!(d.laps.len(), MAX_LAPS);
        assert_eq!(d.lap_number, 1);
        assert!(!d.present);
    }

    #[test]
    fn reset_clears_histories_and_keeps_id() -> TestResult {
        let mut d = DriverSlot::new(3);
        d.present = true;
        d.lap_number = 12;
        d.visual_tyres.push(VisualTyre::Soft);
        d.pit_penalties.push(4);
        d.laps.get_mut(2).ok_or("lap 3")?.incidents.push(1);
        d.laps.get_mut(2).ok_or("lap 3")?.lap_ms = 90_000;
        d.status = DriverStatus::Dnf;
        d.reset();
        assert_eq!(d, DriverSlot::new(3));
        Ok(())
    }

    #[test]
    fn sector3_is_derived_from_closed_lap() {
        let lap = LapRecord {
            sector1_ms: 30_000,
            sector2_ms: 31_000,
            lap_ms: 92_500,
            ..LapRecord::default()
        };
        assert_eq!(lap.sector3_ms(), Some(31_500));
        assert_eq!(LapRecord::default().sector3_ms(), None);
    }

    #[test]
    fn clear_times_keeps_incidents() {
        let mut lap = LapRecord {
            sector1_ms: 1,
            lap_ms: 2,
            invalid: true,
            incidents: vec![5],
            ..LapRecord::default()
        };
        lap.clear_times();
        assert!(lap.has_no_times());
        assert!(!lap.invalid);
        assert_eq!(lap.incidents, vec![5]);
    }

    #[test]
    fn lap_lookup_is_one_based() {
        let d = DriverSlot::new(0);
        assert!(d.lap(0).is_none());
        assert!(d.lap(1).is_some());
        assert!(d.lap(100).is_some());
        assert!(d.lap(101).is_none());
    }
}
