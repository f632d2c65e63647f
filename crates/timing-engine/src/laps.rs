//! Lap and sector reconstruction from lap data and session history.
//!
//! Race mode fills one lap slot per lap number. Qualifying fills slots in
//! order of completion, since a car may abort laps or return to the garage.

use crate::changes::assign;
use crate::driver::{DriverSlot, DriverStatus, LapRecord};
use racing_timing_wire::packets::{LapEntry, SessionHistoryPacket};

/// Minimum plausible lap or sector time; anything shorter is treated as
/// missing when history is available.
const MIN_PLAUSIBLE_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LapChanges {
    pub laps: bool,
    pub fastest: bool,
}

impl std::ops::BitOrAssign for LapChanges {
    fn bitor_assign(&mut self, rhs: Self) {
        self.laps |= rhs.laps;
        self.fastest |= rhs.fastest;
    }
}

/// Close lap slot `idx` with `lap_ms`, chaining the accumulated time from
/// the slot before it. Returns true when it became the fastest lap.
fn close_lap(driver: &mut DriverSlot, idx: usize, lap_ms: u32) -> bool {
    let before = idx
        .checked_sub(1)
        .and_then(|prev| driver.laps.get(prev))
        .map_or(0, |lap| lap.accumulated_ms);
    let Some(lap) = driver.laps.get_mut(idx) else {
        return false;
    };
    lap.lap_ms = lap_ms;
    lap.accumulated_ms = before.saturating_add(lap_ms);
    let fastest = driver.fastest_lap.lap_ms;
    if lap_ms != 0 && !lap.invalid && (fastest == 0 || lap_ms < fastest) {
        driver.fastest_lap = lap.clone();
        return true;
    }
    false
}

/// Copy sector times the car has just set into `lap`.
fn fill_sectors(lap: &mut LapRecord, entry: &LapEntry, accept_corrections: bool) -> bool {
    let mut changed = false;
    let accept = |stored: u32, reported: u32| {
        reported != 0 && (stored == 0 || (accept_corrections && stored != reported))
    };
    if entry.sector >= 1 && accept(lap.sector1_ms, entry.sector1_time_ms) {
        lap.sector1_ms = entry.sector1_time_ms;
        changed = true;
    }
    if entry.sector >= 2 && accept(lap.sector2_ms, entry.sector2_time_ms) {
        lap.sector2_ms = entry.sector2_time_ms;
        changed = true;
    }
    if changed {
        lap.lap_ms = 0;
    }
    changed |= assign(&mut lap.invalid, entry.current_lap_invalid);
    changed
}

/// Race mode: one slot per lap number.
///
/// `accept_corrections` lets a reported sector time overwrite a stored one
/// (the game revises sector times in 2023 and later).
pub fn update_race_lap(
    driver: &mut DriverSlot,
    entry: &LapEntry,
    total_laps: u8,
    accept_corrections: bool,
) -> LapChanges {
    let mut out = LapChanges::default();
    let number = entry.current_lap_num;

    if driver.lap_number != number {
        driver.lap_number = number;
        out.laps = true;
        let Some(current) = usize::from(number)
            .checked_sub(1)
            .filter(|idx| *idx < driver.laps.len())
        else {
            return out;
        };
        driver.current_lap = current;
        if let Some(lap) = driver.laps.get_mut(current) {
            lap.clear_times();
        }
        if let Some(previous) = current.checked_sub(1) {
            out.fastest = close_lap(driver, previous, entry.last_lap_time_ms);
        }
        return out;
    }
    if number == 0 {
        return out;
    }

    // On the final lap the lap number does not advance at the flag; sector 1
    // dropping back to zero marks the crossing instead.
    let final_idx = usize::from(number);
    let on_final_lap = total_laps == number
        && driver.current_lap + 1 == final_idx
        && final_idx < driver.laps.len()
        && entry.sector1_time_ms == 0
        && driver.current().is_some_and(|lap| lap.sector1_ms > 0);
    if on_final_lap {
        let closing = driver.current_lap;
        out.fastest = close_lap(driver, closing, entry.last_lap_time_ms);
        driver.current_lap = final_idx;
        out.laps = true;
        return out;
    }

    let current = driver.current_lap;
    if let Some(lap) = driver.laps.get_mut(current) {
        out.laps = fill_sectors(lap, entry, accept_corrections);
    }
    out
}

/// Move the current lap to the first slot with no times, or clear it when
/// every slot is used.
fn advance_to_blank(driver: &mut DriverSlot) {
    match driver.laps.iter().position(LapRecord::has_no_times) {
        Some(idx) => driver.current_lap = idx,
        None => {
            if let Some(lap) = driver.laps.get_mut(driver.current_lap) {
                lap.clear_times();
            }
        }
    }
}

/// Qualifying and practice: slots fill in order of completed runs. Reads the
/// status and track location from the previous update.
pub fn update_quali_lap(driver: &mut DriverSlot, entry: &LapEntry) -> LapChanges {
    let mut out = LapChanges {
        laps: assign(&mut driver.lap_number, entry.current_lap_num),
        fastest: false,
    };

    if driver.status == DriverStatus::Garage {
        driver.allow_quali_history = true;
        return out;
    }
    driver.allow_quali_history = false;

    let current = driver.current_lap;
    let Some(lap) = driver.laps.get_mut(current) else {
        return out;
    };
    let in_progress = !lap.has_no_times();

    // Before the line on an out-lap: keep whatever was set as its own run.
    if driver.location_on_track < 0.0 {
        if in_progress {
            advance_to_blank(driver);
            out.laps = true;
        }
        return out;
    }

    if matches!(
        driver.status,
        DriverStatus::Pitlane | DriverStatus::Pitting | DriverStatus::InLap
    ) {
        if in_progress {
            lap.clear_times();
            out.laps = true;
        }
        return out;
    }

    if lap.sector1_ms != 0 && lap.sector2_ms != 0 && entry.sector1_time_ms == 0 {
        lap.lap_ms = entry.last_lap_time_ms;
        let valid = !lap.invalid && lap.lap_ms != 0;
        let fastest = driver.fastest_lap.lap_ms;
        if valid && (fastest == 0 || lap.lap_ms < fastest) {
            driver.fastest_lap = lap.clone();
            out.fastest = true;
        }
        advance_to_blank(driver);
        out.laps = true;
        return out;
    }

    out.laps |= fill_sectors(lap, entry, false);
    out
}

/// Race mode: repair closed laps from the game's own history and take the
/// fastest lap it reports.
pub fn apply_race_history(driver: &mut DriverSlot, history: &SessionHistoryPacket) -> LapChanges {
    let mut out = LapChanges::default();
    let closed = usize::from(driver.lap_number).saturating_sub(1);

    for (lap, hist) in driver.laps.iter_mut().zip(&history.laps).take(closed) {
        let implausible = lap.lap_ms < MIN_PLAUSIBLE_MS
            || lap.sector1_ms < MIN_PLAUSIBLE_MS
            || lap.sector2_ms < MIN_PLAUSIBLE_MS;
        if implausible && hist.lap_time_ms != 0 {
            lap.lap_ms = hist.lap_time_ms;
            lap.sector1_ms = hist.sector1_time_ms;
            lap.sector2_ms = hist.sector2_time_ms;
            out.laps = true;
        }
    }

    let mut accumulated: u32 = 0;
    for lap in driver.laps.iter_mut().take(closed) {
        accumulated = accumulated.saturating_add(lap.lap_ms);
        out.laps |= assign(&mut lap.accumulated_ms, accumulated);
    }

    let best = usize::from(history.best_lap_time_lap_num)
        .checked_sub(1)
        .and_then(|idx| driver.laps.get(idx))
        .filter(|lap| lap.lap_ms != 0)
        .cloned();
    if let Some(best) = best {
        out.fastest = assign(&mut driver.fastest_lap, best);
    }
    out
}

/// Qualifying: while the car sits in the garage, adopt the best fully valid
/// lap from history.
pub fn apply_quali_history(driver: &mut DriverSlot, history: &SessionHistoryPacket) -> LapChanges {
    let mut out = LapChanges::default();
    if !driver.allow_quali_history {
        return out;
    }
    let recorded = history.laps.iter().take(usize::from(history.num_laps));
    for hist in recorded {
        let complete = hist.is_fully_valid()
            && hist.lap_time_ms != 0
            && hist.sector1_time_ms != 0
            && hist.sector2_time_ms != 0
            && hist.sector3_time_ms != 0;
        let fastest = driver.fastest_lap.lap_ms;
        if complete && (fastest == 0 || hist.lap_time_ms < fastest) {
            driver.fastest_lap = LapRecord {
                sector1_ms: hist.sector1_time_ms,
                sector2_ms: hist.sector2_time_ms,
                lap_ms: hist.lap_time_ms,
                ..LapRecord::default()
            };
            out.fastest = true;
        }
    }
    out
}
