//! Driver status transitions, per game generation.
//!
//! Priority: result status (retirements, disqualification) beats pit status,
//! which beats driver status. Each generation numbers these codes differently.

use crate::driver::DriverStatus;
use racing_timing_wire::GameYear;

/// The three lap-data codes the state machine reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusInput {
    pub result_status: u8,
    pub pit_status: u8,
    pub driver_status: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: DriverStatus,
    /// The car is in the pit box this tick.
    pub pitting: bool,
}

/// Whether `result_status` marks an active car.
pub fn is_present(year: GameYear, result_status: u8) -> bool {
    match year {
        GameYear::Y2022 => matches!(result_status, 2 | 3),
        _ => matches!(result_status, 1..=3),
    }
}

/// Next status for one car.
///
/// `last_penalty_retired` upgrades a retirement to DNF in 2023/2024: the game
/// reports a car parked by the stewards as retired.
pub fn next_status(
    year: GameYear,
    current: DriverStatus,
    input: StatusInput,
    last_penalty_retired: bool,
) -> Transition {
    if let Some(status) = result_override(year, current, input.result_status, last_penalty_retired)
    {
        return Transition {
            status,
            pitting: false,
        };
    }
    match input.pit_status {
        1 => Transition {
            status: DriverStatus::Pitlane,
            pitting: false,
        },
        2 => Transition {
            status: DriverStatus::Pitting,
            pitting: true,
        },
        _ => Transition {
            status: from_driver_status(year, input.driver_status),
            pitting: false,
        },
    }
}

fn result_override(
    year: GameYear,
    current: DriverStatus,
    result_status: u8,
    last_penalty_retired: bool,
) -> Option<DriverStatus> {
    let retired = || {
        if current == DriverStatus::Dnf || last_penalty_retired {
            DriverStatus::Dnf
        } else {
            DriverStatus::Retired
        }
    };
    match (year, result_status) {
        (GameYear::Y2020, 4) => Some(DriverStatus::Dsq),
        (GameYear::Y2020, 5) => Some(DriverStatus::Garage),
        (GameYear::Y2020, 6) => Some(retired()),
        (GameYear::Y2022, 4) => Some(DriverStatus::Dsq),
        (GameYear::Y2022, 5..=7) => Some(DriverStatus::Dnf),
        (GameYear::Y2023 | GameYear::Y2024, 4) => Some(DriverStatus::Dnf),
        (GameYear::Y2023 | GameYear::Y2024, 5) => Some(DriverStatus::Dsq),
        (GameYear::Y2023 | GameYear::Y2024, 6) => Some(DriverStatus::Garage),
        (GameYear::Y2023 | GameYear::Y2024, 7) => Some(retired()),
        _ => None,
    }
}

fn from_driver_status(year: GameYear, driver_status: u8) -> DriverStatus {
    match (year, driver_status) {
        (GameYear::Y2022, 1..=4) => DriverStatus::OnTrack,
        (_, 1 | 4) => DriverStatus::OnTrack,
        (_, 2) => DriverStatus::InLap,
        (_, 3) => DriverStatus::OutLap,
        _ => DriverStatus::Garage,
    }
}

/// True when `from -> to` leaves the pit lane onto the track.
pub fn is_pit_exit(year: GameYear, from: DriverStatus, to: DriverStatus) -> bool {
    if from != DriverStatus::Pitlane {
        return false;
    }
    match year {
        GameYear::Y2022 => to == DriverStatus::OnTrack,
        _ => matches!(to, DriverStatus::OnTrack | DriverStatus::OutLap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(result_status: u8, pit_status: u8, driver_status: u8) -> StatusInput {
        StatusInput {
            result_status,
            pit_status,
            driver_status,
        }
    }

    #[test]
    fn presence_rule_per_year() {
        assert!(is_present(GameYear::Y2024, 1));
        assert!(!is_present(GameYear::Y2022, 1));
        assert!(is_present(GameYear::Y2022, 2));
        assert!(!is_present(GameYear::Y2023, 0));
        assert!(!is_present(GameYear::Y2020, 4));
    }

    #[test]
    fn pit_status_beats_driver_status() {
        let t = next_status(GameYear::Y2024, DriverStatus::OnTrack, input(2, 1, 1), false);
        assert_eq!(t.status, DriverStatus::Pitlane);
        let t = next_status(GameYear::Y2024, DriverStatus::Pitlane, input(2, 2, 1), false);
        assert_eq!(t.status, DriverStatus::Pitting);
        assert!(t.pitting);
    }

    #[test]
    fn driver_status_mapping_2024() {
        let map = |code| next_status(GameYear::Y2024, DriverStatus::Garage, input(2, 0, code), false).status;
        assert_eq!(map(0), DriverStatus::Garage);
        assert_eq!(map(1), DriverStatus::OnTrack);
        assert_eq!(map(2), DriverStatus::InLap);
        assert_eq!(map(3), DriverStatus::OutLap);
        assert_eq!(map(4), DriverStatus::OnTrack);
        assert_eq!(map(9), DriverStatus::Garage);
    }

    #[test]
    fn driver_status_2022_collapses_to_on_track() {
        for code in 1..=4 {
            let t = next_status(GameYear::Y2022, DriverStatus::Garage, input(2, 0, code), false);
            assert_eq!(t.status, DriverStatus::OnTrack, "code {code}");
        }
    }

    #[test]
    fn result_codes_differ_between_generations() {
        let r = |year, code| next_status(year, DriverStatus::OnTrack, input(code, 0, 1), false).status;
        assert_eq!(r(GameYear::Y2022, 4), DriverStatus::Dsq);
        assert_eq!(r(GameYear::Y2022, 6), DriverStatus::Dnf);
        assert_eq!(r(GameYear::Y2023, 4), DriverStatus::Dnf);
        assert_eq!(r(GameYear::Y2023, 5), DriverStatus::Dsq);
        assert_eq!(r(GameYear::Y2024, 6), DriverStatus::Garage);
        assert_eq!(r(GameYear::Y2024, 7), DriverStatus::Retired);
        assert_eq!(r(GameYear::Y2020, 4), DriverStatus::Dsq);
        assert_eq!(r(GameYear::Y2020, 6), DriverStatus::Retired);
    }

    #[test]
    fn dnf_is_not_downgraded_to_retired() {
        let t = next_status(GameYear::Y2024, DriverStatus::Dnf, input(7, 0, 0), false);
        assert_eq!(t.status, DriverStatus::Dnf);
    }

    #[test]
    fn retired_penalty_turns_retirement_into_dnf() {
        let t = next_status(GameYear::Y2023, DriverStatus::OnTrack, input(7, 0, 0), true);
        assert_eq!(t.status, DriverStatus::Dnf);
    }

    #[test]
    fn pit_exit_targets() {
        use DriverStatus::*;
        assert!(is_pit_exit(GameYear::Y2024, Pitlane, OnTrack));
        assert!(is_pit_exit(GameYear::Y2024, Pitlane, OutLap));
        assert!(!is_pit_exit(GameYear::Y2022, Pitlane, OutLap));
        assert!(!is_pit_exit(GameYear::Y2024, Pitting, OnTrack));
        assert!(!is_pit_exit(GameYear::Y2024, Pitlane, Pitting));
    }
}
