//! Gap computation between two cars.
//!
//! Race mode compares elapsed time at the most recent timing line both cars
//! have crossed; qualifying compares fastest laps.

use crate::driver::{DriverSlot, LapRecord};
use racing_timing_wire::GameYear;

/// Timing line inside a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Sector1,
    Sector2,
    Finish,
}

impl Line {
    fn crossed(self, lap: &LapRecord) -> bool {
        match self {
            Line::Sector1 => lap.sector1_ms != 0,
            Line::Sector2 => lap.sector2_ms != 0,
            Line::Finish => lap.lap_ms != 0,
        }
    }

    fn partial_ms(self, lap: &LapRecord) -> f64 {
        match self {
            Line::Sector1 => f64::from(lap.sector1_ms),
            Line::Sector2 => f64::from(lap.sector1_ms) + f64::from(lap.sector2_ms),
            Line::Finish => f64::from(lap.lap_ms),
        }
    }

    fn previous(self) -> Option<Line> {
        match self {
            Line::Finish => Some(Line::Sector2),
            Line::Sector2 => Some(Line::Sector1),
            Line::Sector1 => None,
        }
    }
}

fn elapsed_ms(driver: &DriverSlot, lap_idx: usize, line: Line) -> Option<f64> {
    let lap = driver.laps.get(lap_idx)?;
    let before = match lap_idx.checked_sub(1) {
        Some(prev) => f64::from(driver.laps.get(prev)?.accumulated_ms),
        None => 0.0,
    };
    Some(before + line.partial_ms(lap))
}

/// Seconds `reference` is behind `opponent` at the latest common timing
/// line: positive when the opponent crossed it first. `None` when no common
/// line exists yet.
pub fn race_gap_s(reference: &DriverSlot, opponent: &DriverSlot) -> Option<f64> {
    let last_idx = reference.laps.len().checked_sub(1)?;
    let mut lap_idx = usize::from(reference.lap_number).checked_sub(1)?.min(last_idx);
    let mut line = Line::Finish;
    loop {
        // The opponent has not started this lap yet.
        if usize::from(opponent.lap_number) < lap_idx + 1 {
            lap_idx = lap_idx.checked_sub(1)?;
            line = Line::Finish;
            continue;
        }
        let ours = reference.laps.get(lap_idx)?;
        let theirs = opponent.laps.get(lap_idx)?;
        if line.crossed(ours) && line.crossed(theirs) {
            break;
        }
        match line.previous() {
            Some(prev) => line = prev,
            None => {
                lap_idx = lap_idx.checked_sub(1)?;
                line = Line::Finish;
            }
        }
    }
    let ours = elapsed_ms(reference, lap_idx, line)?;
    let theirs = elapsed_ms(opponent, lap_idx, line)?;
    Some((ours - theirs) / 1000.0)
}

/// Race gap corrected for outstanding time penalties.
pub fn race_delta_to_player(player: &DriverSlot, opponent: &DriverSlot, opponent_penalty_s: u8) -> Option<f32> {
    let gap = race_gap_s(player, opponent)?;
    let penalties = f64::from(opponent_penalty_s) - f64::from(player.penalty_seconds);
    Some(narrow(gap - penalties))
}

/// Gap of `opponent` behind `leader`, or minus the number of laps down.
///
/// 2022 has no laps-down count. 2023 and 2024 report the game's own
/// `telemetry_ms` gap for cars on the lead lap. Every year returns `None`
/// until both cars share a timing line.
pub fn race_delta_to_leader(
    year: GameYear,
    leader: &DriverSlot,
    opponent: &DriverSlot,
    telemetry_ms: u32,
) -> Option<f32> {
    let gap = race_gap_s(leader, opponent)?;
    if year == GameYear::Y2022 {
        return Some(narrow(-gap));
    }
    let mut lapped = i16::from(leader.lap_number) - i16::from(opponent.lap_number);
    if opponent.location_on_track > leader.location_on_track {
        lapped -= 1;
    }
    if lapped > 0 {
        return Some(-f32::from(lapped));
    }
    match year {
        GameYear::Y2023 | GameYear::Y2024 => Some(narrow(f64::from(telemetry_ms) / 1000.0)),
        GameYear::Y2020 | GameYear::Y2022 => Some(narrow(-gap)),
    }
}

/// Fastest-lap difference to the player; 0 while either has no lap.
pub fn quali_delta_to_player(player: &DriverSlot, opponent: &DriverSlot) -> f32 {
    fastest_difference(player, opponent).unwrap_or(0.0)
}

/// Fastest-lap difference to the leader. `Some(0.0)` when the opponent has
/// no lap, `None` when the value should be left as it is.
pub fn quali_delta_to_leader(leader: &DriverSlot, opponent: &DriverSlot) -> Option<f32> {
    if leader.fastest_lap.lap_ms == 0 {
        return None;
    }
    if opponent.fastest_lap.lap_ms == 0 {
        return Some(0.0);
    }
    fastest_difference(leader, opponent).filter(|d| *d > 0.0)
}

fn fastest_difference(reference: &DriverSlot, opponent: &DriverSlot) -> Option<f32> {
    let ours = reference.fastest_lap.lap_ms;
    let theirs = opponent.fastest_lap.lap_ms;
    if ours == 0 || theirs == 0 {
        return None;
    }
    Some(narrow((f64::from(theirs) - f64::from(ours)) / 1000.0))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "gaps are displayed at millisecond precision"
)]
fn narrow(seconds: f64) -> f32 {
    seconds as f32
}

/// True when two deltas differ by more than float noise.
pub(crate) fn differs(a: f32, b: f32) -> bool {
    (a - b).abs() > f32::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn driver(lap_number: u8, laps: &[(u32, u32, u32)]) -> DriverSlot {
        let mut d = DriverSlot::new(0);
        d.lap_number = lap_number;
        let mut acc = 0;
        for (slot, (s1, s2, lap)) in d.laps.iter_mut().zip(laps) {
            slot.sector1_ms = *s1;
            slot.sector2_ms = *s2;
            slot.lap_ms = *lap;
            acc += *lap;
            if *lap != 0 {
                slot.accumulated_ms = acc;
            }
        }
        d
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn no_common_line_yields_none() {
        let a = driver(1, &[]);
        let b = driver(1, &[]);
        assert_eq!(race_gap_s(&a, &b), None);
    }

    #[test]
    fn sector1_gap_on_first_lap() -> TestResult {
        let a = driver(1, &[(30_000, 0, 0)]);
        let b = driver(1, &[(30_500, 0, 0)]);
        let gap = race_gap_s(&a, &b).ok_or("no gap")?;
        assert!(close(gap, -0.5), "{gap}");
        Ok(())
    }

    #[test]
    fn finished_lap_gap_uses_lap_time() -> TestResult {
        let a = driver(2, &[(30_000, 30_000, 90_000)]);
        let b = driver(2, &[(30_500, 30_000, 91_500)]);
        let gap = race_gap_s(&a, &b).ok_or("no gap")?;
        assert!(close(gap, -1.5), "{gap}");
        Ok(())
    }

    #[test]
    fn later_lap_adds_accumulated_time() -> TestResult {
        let a = driver(2, &[(30_000, 30_000, 90_000), (29_000, 0, 0)]);
        let b = driver(2, &[(30_000, 30_000, 91_000), (29_500, 0, 0)]);
        let gap = race_gap_s(&a, &b).ok_or("no gap")?;
        assert!(close(gap, -1.5), "{gap}");
        Ok(())
    }

    #[test]
    fn opponent_a_lap_behind_is_compared_on_its_lap() -> TestResult {
        let a = driver(3, &[(30_000, 30_000, 90_000), (30_000, 30_000, 90_000), (30_000, 0, 0)]);
        let b = driver(2, &[(31_000, 31_000, 95_000), (31_000, 0, 0)]);
        let gap = race_gap_s(&a, &b).ok_or("no gap")?;
        // Lap 2 sector 1: 120.0 vs 126.0
        assert!(close(gap, -6.0), "{gap}");
        Ok(())
    }

    #[test]
    fn penalties_shift_player_delta() -> TestResult {
        let player = driver(2, &[(30_000, 30_000, 90_000)]);
        let opponent = driver(2, &[(30_000, 30_000, 89_000)]);
        let d = race_delta_to_player(&player, &opponent, 5).ok_or("no delta")?;
        assert!((d - -4.0).abs() < 1e-4, "{d}");
        Ok(())
    }

    fn lapped_pair() -> (DriverSlot, DriverSlot) {
        let mut leader = driver(3, &[(1, 1, 90_000), (1, 1, 90_000), (1, 0, 0)]);
        let mut backmarker = driver(2, &[(1, 1, 95_000), (1, 0, 0)]);
        leader.location_on_track = 100.0;
        backmarker.location_on_track = 50.0;
        (leader, backmarker)
    }

    #[test]
    fn lapped_car_reports_laps_down() -> TestResult {
        let (leader, mut backmarker) = lapped_pair();
        for year in [GameYear::Y2020, GameYear::Y2023, GameYear::Y2024] {
            let d = race_delta_to_leader(year, &leader, &backmarker, 7_000).ok_or("no delta")?;
            assert!((d - -1.0).abs() < f32::EPSILON, "{year}: {d}");
        }
        backmarker.location_on_track = 150.0;
        let d = race_delta_to_leader(GameYear::Y2020, &leader, &backmarker, 7_000).ok_or("no delta")?;
        assert!((d - 5.0).abs() < 1e-4, "{d}");
        Ok(())
    }

    #[test]
    fn leader_delta_2022_has_no_laps_down() -> TestResult {
        let (leader, backmarker) = lapped_pair();
        let d = race_delta_to_leader(GameYear::Y2022, &leader, &backmarker, 7_000).ok_or("no delta")?;
        // Lap 2 sector 1 gap, even though the car is a lap down.
        assert!((d - 5.0).abs() < 1e-4, "{d}");
        Ok(())
    }

    #[test]
    fn leader_delta_2023_uses_game_gap_on_lead_lap() -> TestResult {
        let leader = driver(2, &[(30_000, 30_000, 90_000)]);
        let second = driver(2, &[(30_500, 30_000, 91_500)]);
        for year in [GameYear::Y2023, GameYear::Y2024] {
            let d = race_delta_to_leader(year, &leader, &second, 1_234).ok_or("no delta")?;
            assert!((d - 1.234).abs() < 1e-4, "{year}: {d}");
        }
        let d = race_delta_to_leader(GameYear::Y2020, &leader, &second, 1_234).ok_or("no delta")?;
        assert!((d - 1.5).abs() < 1e-4, "{d}");
        Ok(())
    }

    #[test]
    fn leader_delta_waits_for_a_common_line() {
        let leader = driver(1, &[]);
        let second = driver(1, &[]);
        assert_eq!(race_delta_to_leader(GameYear::Y2024, &leader, &second, 1_000), None);
    }

    #[test]
    fn quali_deltas() {
        let mut leader = DriverSlot::new(0);
        let mut other = DriverSlot::new(1);
        assert!(quali_delta_to_player(&leader, &other).abs() < f32::EPSILON);
        assert_eq!(quali_delta_to_leader(&leader, &other), None);
        leader.fastest_lap.lap_ms = 80_000;
        assert_eq!(quali_delta_to_leader(&leader, &other), Some(0.0));
        other.fastest_lap.lap_ms = 80_750;
        assert!((quali_delta_to_player(&leader, &other) - 0.75).abs() < 1e-4);
        assert!(quali_delta_to_leader(&leader, &other).is_some_and(|d| (d - 0.75).abs() < 1e-4));
        other.fastest_lap.lap_ms = 79_000;
        assert_eq!(quali_delta_to_leader(&leader, &other), None);
    }
}
