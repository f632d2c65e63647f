//! Property tests for gap computation.
//!
//! Cars are generated with consistent lap records: every lap before the
//! current one is closed, and the current lap has crossed zero, one or two
//! sector lines.

use proptest::prelude::*;
use racing_timing_engine::DriverSlot;
use racing_timing_engine::delta::{quali_delta_to_player, race_delta_to_player, race_gap_s};

#[derive(Debug, Clone)]
struct Progress {
    closed: Vec<(u32, u32, u32)>,
    current: (u32, u32),
    sectors_done: u8,
}

fn lap_times() -> impl Strategy<Value = (u32, u32, u32)> {
    (20_000u32..40_000, 20_000u32..40_000, 20_000u32..40_000)
        .prop_map(|(s1, s2, s3)| (s1, s2, s1 + s2 + s3))
}

fn progress() -> impl Strategy<Value = Progress> {
    (
        proptest::collection::vec(lap_times(), 0..6),
        (20_000u32..40_000, 20_000u32..40_000),
        0u8..=2,
    )
        .prop_map(|(closed, current, sectors_done)| Progress {
            closed,
            current,
            sectors_done,
        })
}

fn build(id: usize, progress: &Progress) -> DriverSlot {
    let mut driver = DriverSlot::new(id);
    let mut accumulated = 0u32;
    for (slot, (s1, s2, lap)) in driver.laps.iter_mut().zip(&progress.closed) {
        slot.sector1_ms = *s1;
        slot.sector2_ms = *s2;
        slot.lap_ms = *lap;
        accumulated += *lap;
        slot.accumulated_ms = accumulated;
    }
    let current = progress.closed.len();
    if let Some(slot) = driver.laps.get_mut(current) {
        if progress.sectors_done >= 1 {
            slot.sector1_ms = progress.current.0;
        }
        if progress.sectors_done >= 2 {
            slot.sector2_ms = progress.current.1;
        }
    }
    driver.current_lap = current;
    driver.lap_number = u8::try_from(current + 1).unwrap_or(u8::MAX);
    driver
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Swapping reference and opponent flips the sign of the gap.
    #[test]
    fn prop_race_gap_is_antisymmetric(a in progress(), b in progress()) {
        let first = build(0, &a);
        let second = build(1, &b);
        let forward = race_gap_s(&first, &second);
        let backward = race_gap_s(&second, &first);
        prop_assert_eq!(forward.is_some(), backward.is_some());
        if let (Some(f), Some(r)) = (forward, backward) {
            prop_assert!((f + r).abs() < 1e-9, "{} vs {}", f, r);
        }
    }

    /// A car compared with itself is level at its latest line.
    #[test]
    fn prop_race_gap_to_self_is_zero(a in progress()) {
        let car = build(0, &a);
        let crossed_any = !a.closed.is_empty() || a.sectors_done > 0;
        match race_gap_s(&car, &car) {
            Some(gap) => prop_assert!(gap.abs() < 1e-9),
            None => prop_assert!(!crossed_any),
        }
    }

    /// Outstanding penalties shift the delta by exactly their difference.
    #[test]
    fn prop_penalties_shift_delta(
        a in progress(),
        b in progress(),
        ours in 0u8..30,
        theirs in 0u8..30,
    ) {
        let mut player = build(0, &a);
        let opponent = build(1, &b);
        let clean = race_delta_to_player(&player, &opponent, 0);
        player.penalty_seconds = ours;
        let penalised = race_delta_to_player(&player, &opponent, theirs);
        prop_assert_eq!(clean.is_some(), penalised.is_some());
        if let (Some(c), Some(p)) = (clean, penalised) {
            let shift = f32::from(theirs) - f32::from(ours);
            prop_assert!((c - p - shift).abs() < 1e-2, "{} {} {}", c, p, shift);
        }
    }

    /// Qualifying deltas are antisymmetric between two timed cars.
    #[test]
    fn prop_quali_delta_is_antisymmetric(x in 60_000u32..120_000, y in 60_000u32..120_000) {
        let mut first = DriverSlot::new(0);
        let mut second = DriverSlot::new(1);
        first.fastest_lap.lap_ms = x;
        second.fastest_lap.lap_ms = y;
        let forward = quali_delta_to_player(&first, &second);
        let backward = quali_delta_to_player(&second, &first);
        prop_assert!((forward + backward).abs() < 1e-3);
    }
}
