//! Session-wide state: track, session type, lap count and final results.

use racing_timing_wire::GameYear;
use racing_timing_wire::appendix::{SessionType, VisualTyre, track_name};
use racing_timing_wire::packets::{ClassificationRecord, FinalClassificationPacket, SessionPacket};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub track_id: i8,
    pub track_name: &'static str,
    pub session_type: SessionType,
    pub time_left_s: u16,
    pub total_laps: u8,
    /// Race lap shown to viewers: the highest lap any car is on, capped at
    /// the race distance.
    pub current_lap: u8,
    pub finished: bool,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            track_id: -1,
            track_name: track_name(-1),
            session_type: SessionType::Unknown,
            time_left_s: 0,
            total_laps: 0,
            current_lap: 1,
            finished: false,
        }
    }
}

impl SessionInfo {
    /// Timed on fastest laps rather than race distance.
    pub fn is_qualifying_mode(&self) -> bool {
        self.session_type.is_practice_or_qualifying()
    }

    /// Take the fields the session packet carries; true when any changed.
    pub(crate) fn update(&mut self, year: GameYear, packet: &SessionPacket) -> bool {
        let next = Self {
            track_id: packet.track_id,
            track_name: track_name(packet.track_id),
            session_type: SessionType::from_raw(year, packet.session_type),
            time_left_s: packet.session_time_left,
            total_laps: packet.total_laps,
            ..self.clone()
        };
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    /// Per-session flags go back to their start values; the track and session
    /// type stay until the next session packet.
    pub(crate) fn reset(&mut self) {
        self.current_lap = 1;
        self.finished = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TyreStint {
    pub actual: u8,
    pub visual: VisualTyre,
    pub end_lap: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationEntry {
    pub car_index: usize,
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: u8,
    pub best_lap_time_s: f64,
    pub total_race_time_s: f64,
    pub penalties_time_s: u8,
    pub num_penalties: u8,
    pub tyre_stints: Vec<TyreStint>,
}

impl ClassificationEntry {
    fn from_record(car_index: usize, record: &ClassificationRecord) -> Self {
        let stints = record
            .tyre_stints_actual
            .iter()
            .zip(record.tyre_stints_visual.iter())
            .zip(record.tyre_stints_end_laps.iter())
            .take(usize::from(record.num_tyre_stints))
            .map(|((actual, visual), end_lap)| TyreStint {
                actual: *actual,
                visual: VisualTyre::from_raw(*visual),
                end_lap: *end_lap,
            })
            .collect();
        Self {
            car_index,
            position: record.position,
            num_laps: record.num_laps,
            grid_position: record.grid_position,
            points: record.points,
            num_pit_stops: record.num_pit_stops,
            result_status: record.result_status,
            best_lap_time_s: f64::from(record.best_lap_time_ms) / 1000.0,
            total_race_time_s: record.total_race_time,
            penalties_time_s: record.penalties_time,
            num_penalties: record.num_penalties,
            tyre_stints: stints,
        }
    }
}

/// Final results, ordered by finishing position. Cars beyond `num_cars` and
/// entries with position 0 are left out.
pub fn classification_from_packet(packet: &FinalClassificationPacket) -> Vec<ClassificationEntry> {
    let mut entries: Vec<ClassificationEntry> = packet
        .entries
        .iter()
        .enumerate()
        .take(usize::from(packet.num_cars))
        .filter(|(_, record)| record.position != 0)
        .map(|(idx, record)| ClassificationEntry::from_record(idx, record))
        .collect();
    entries.sort_by_key(|e| e.position);
    entries
}
