//! Protocol appendix ids: teams, tracks, session types, tyre compounds and
//! penalty codes.

use crate::registry::GameYear;
use serde::{Deserialize, Serialize};

// ── Teams ─────────────────────────────────────────────────────────────────────

/// Constructor slot by `teamId`. Ids 10 and above (classic cars, F2, custom
/// teams) collapse into [`Team::Classic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Mercedes,
    Ferrari,
    RedBull,
    Williams,
    AstonMartin,
    Alpine,
    RacingBulls,
    Haas,
    McLaren,
    Sauber,
    #[default]
    Classic,
}

impl Team {
    pub const fn from_id(id: u8) -> Self {
        match id {
            0 => Team::Mercedes,
            1 => Team::Ferrari,
            2 => Team::RedBull,
            3 => Team::Williams,
            4 => Team::AstonMartin,
            5 => Team::Alpine,
            6 => Team::RacingBulls,
            7 => Team::Haas,
            8 => Team::McLaren,
            9 => Team::Sauber,
            _ => Team::Classic,
        }
    }

    /// Team name as shown in the given game year. The slot keeps its id while
    /// the entrant changes name between seasons.
    pub const fn display_name(self, year: GameYear) -> &'static str {
        match (self, year) {
            (Team::Mercedes, _) => "Mercedes",
            (Team::Ferrari, _) => "Ferrari",
            (Team::RedBull, _) => "Red Bull",
            (Team::Williams, _) => "Williams",
            (Team::AstonMartin, GameYear::Y2020) => "Racing Point",
            (Team::AstonMartin, _) => "Aston Martin",
            (Team::Alpine, GameYear::Y2020) => "Renault",
            (Team::Alpine, _) => "Alpine",
            (Team::RacingBulls, GameYear::Y2024) => "RB",
            (Team::RacingBulls, _) => "Alpha Tauri",
            (Team::Haas, _) => "Haas",
            (Team::McLaren, _) => "McLaren",
            (Team::Sauber, GameYear::Y2024) => "Sauber",
            (Team::Sauber, _) => "Alfa Romeo",
            (Team::Classic, _) => "Car",
        }
    }
}

// ── Tracks ────────────────────────────────────────────────────────────────────

/// Maps `trackId` to a display name. Unknown ids return `"Unknown"`.
pub fn track_name(track_id: i8) -> &'static str {
    const NAMES: &[&str] = &[
        "Melbourne",         // 0
        "Paul Ricard",       // 1
        "Shanghai",          // 2
        "Sakhir (Bahrain)",  // 3
        "Catalunya",         // 4
        "Monaco",            // 5
        "Montreal",          // 6
        "Silverstone",       // 7
        "Hockenheim",        // 8
        "Hungaroring",       // 9
        "Spa",               // 10
        "Monza",             // 11
        "Singapore",         // 12
        "Suzuka",            // 13
        "Abu Dhabi",         // 14
        "Texas",             // 15
        "Brazil",            // 16
        "Austria",           // 17
        "Sochi",             // 18
        "Mexico",            // 19
        "Baku (Azerbaijan)", // 20
        "Sakhir Short",      // 21
        "Silverstone Short", // 22
        "Texas Short",       // 23
        "Suzuka Short",      // 24
        "Hanoi",             // 25
        "Zandvoort",         // 26
        "Imola",             // 27
        "Portimao",          // 28
        "Jeddah",            // 29
        "Miami",             // 30
        "Las Vegas",         // 31
        "Losail",            // 32
    ];
    usize::try_from(track_id)
        .ok()
        .and_then(|idx| NAMES.get(idx).copied())
        .unwrap_or("Unknown")
}

// ── Session types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SessionType {
    #[default]
    Unknown,
    Practice1,
    Practice2,
    Practice3,
    ShortPractice,
    Qualifying1,
    Qualifying2,
    Qualifying3,
    ShortQualifying,
    OneShotQualifying,
    SprintShootout1,
    SprintShootout2,
    SprintShootout3,
    ShortSprintShootout,
    OneShotSprintShootout,
    Race,
    Race2,
    Race3,
    TimeTrial,
}

impl SessionType {
    /// Decode `sessionType`; 2024 inserted the sprint shootouts before the races.
    pub const fn from_raw(year: GameYear, raw: u8) -> Self {
        use SessionType::*;
        match (year, raw) {
            (_, 1) => Practice1,
            (_, 2) => Practice2,
            (_, 3) => Practice3,
            (_, 4) => ShortPractice,
            (_, 5) => Qualifying1,
            (_, 6) => Qualifying2,
            (_, 7) => Qualifying3,
            (_, 8) => ShortQualifying,
            (_, 9) => OneShotQualifying,
            (GameYear::Y2024, 10) => SprintShootout1,
            (GameYear::Y2024, 11) => SprintShootout2,
            (GameYear::Y2024, 12) => SprintShootout3,
            (GameYear::Y2024, 13) => ShortSprintShootout,
            (GameYear::Y2024, 14) => OneShotSprintShootout,
            (GameYear::Y2024, 15) => Race,
            (GameYear::Y2024, 16) => Race2,
            (GameYear::Y2024, 17) => Race3,
            (GameYear::Y2024, 18) => TimeTrial,
            (GameYear::Y2020, 12) => TimeTrial,
            (_, 10) => Race,
            (_, 11) => Race2,
            (_, 12) => Race3,
            (_, 13) => TimeTrial,
            _ => Unknown,
        }
    }

    /// Sessions timed on fastest laps rather than race distance.
    pub const fn is_practice_or_qualifying(self) -> bool {
        matches!(
            self,
            SessionType::Practice1
                | SessionType::Practice2
                | SessionType::Practice3
                | SessionType::ShortPractice
                | SessionType::Qualifying1
                | SessionType::Qualifying2
                | SessionType::Qualifying3
                | SessionType::ShortQualifying
        )
    }
}

// ── Tyres ─────────────────────────────────────────────────────────────────────

/// Visual compound as shown on the car (`visualTyreCompound`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum VisualTyre {
    /// Not observed; also used as a history marker for a missed stint.
    #[default]
    Unknown,
    SuperSoft,
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Other(u8),
}

impl VisualTyre {
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => VisualTyre::Unknown,
            16 | 20 => VisualTyre::Soft,
            17 | 21 => VisualTyre::Medium,
            18 | 22 => VisualTyre::Hard,
            19 => VisualTyre::SuperSoft,
            7 => VisualTyre::Intermediate,
            8 | 15 => VisualTyre::Wet,
            other => VisualTyre::Other(other),
        }
    }
}

/// Human-readable name for an `actualTyreCompound` code.
pub fn actual_tyre_name(compound: u8) -> &'static str {
    match compound {
        7 => "Intermediate",
        8 => "Wet",
        9 => "Dry (classic)",
        10 => "Wet (classic)",
        11 => "Super Soft",
        12 => "Soft",
        13 => "Medium",
        14 => "Hard",
        15 => "Wet (F2)",
        16 => "C5",
        17 => "C4",
        18 => "C3",
        19 => "C2",
        20 => "C1",
        21 => "C0",
        _ => "Unknown",
    }
}

// ── Penalties ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PenaltyType {
    DriveThrough,
    StopGo,
    GridPenalty,
    PenaltyReminder,
    TimePenalty,
    Warning,
    Disqualified,
    RemovedFromFormationLap,
    ParkedTooLongTimer,
    TyreRegulations,
    ThisLapInvalidated,
    ThisAndNextLapInvalidated,
    ThisLapInvalidatedWithoutReason,
    ThisAndNextLapInvalidatedWithoutReason,
    ThisAndPreviousLapInvalidated,
    ThisAndPreviousLapInvalidatedWithoutReason,
    Retired,
    BlackFlagTimer,
    Other(u8),
}

impl PenaltyType {
    pub const fn from_raw(raw: u8) -> Self {
        use PenaltyType::*;
        match raw {
            0 => DriveThrough,
            1 => StopGo,
            2 => GridPenalty,
            3 => PenaltyReminder,
            4 => TimePenalty,
            5 => Warning,
            6 => Disqualified,
            7 => RemovedFromFormationLap,
            8 => ParkedTooLongTimer,
            9 => TyreRegulations,
            10 => ThisLapInvalidated,
            11 => ThisAndNextLapInvalidated,
            12 => ThisLapInvalidatedWithoutReason,
            13 => ThisAndNextLapInvalidatedWithoutReason,
            14 => ThisAndPreviousLapInvalidated,
            15 => ThisAndPreviousLapInvalidatedWithoutReason,
            16 => Retired,
            17 => BlackFlagTimer,
            other => Other(other),
        }
    }

    /// Penalties that are discharged by a pit visit.
    pub const fn is_servable_in_pits(self) -> bool {
        matches!(
            self,
            PenaltyType::DriveThrough
                | PenaltyType::StopGo
                | PenaltyType::Disqualified
                | PenaltyType::Retired
        )
    }
}

/// `infringementType` code. Only the codes the timing logic branches on are
/// named; the rest are carried as raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InfringementType {
    BlockingBySlowDriving,
    BlockingByWrongWayDriving,
    ReversingOffTheStartLine,
    BigCollision,
    SmallCollision,
    CornerCuttingGainedTime,
    IgnoringBlueFlags,
    IgnoringYellowFlags,
    IgnoringDriveThrough,
    PitLaneSpeeding,
    ParkedForTooLong,
    IgnoringTyreRegulations,
    TooManyPenalties,
    MultipleWarnings,
    ApproachingDisqualification,
    JumpStart,
    Other(u8),
}

impl InfringementType {
    pub const fn from_raw(raw: u8) -> Self {
        use InfringementType::*;
        match raw {
            0 => BlockingBySlowDriving,
            1 => BlockingByWrongWayDriving,
            2 => ReversingOffTheStartLine,
            3 => BigCollision,
            4 => SmallCollision,
            7 => CornerCuttingGainedTime,
            11 => IgnoringBlueFlags,
            12 => IgnoringYellowFlags,
            13 => IgnoringDriveThrough,
            17 => PitLaneSpeeding,
            18 => ParkedForTooLong,
            19 => IgnoringTyreRegulations,
            20 => TooManyPenalties,
            21 => MultipleWarnings,
            22 => ApproachingDisqualification,
            34 => JumpStart,
            other => Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_labels_follow_the_season() {
        assert_eq!(Team::from_id(9).display_name(GameYear::Y2024), "Sauber");
        assert_eq!(Team::from_id(9).display_name(GameYear::Y2022), "Alfa Romeo");
        assert_eq!(Team::from_id(4).display_name(GameYear::Y2020), "Racing Point");
        assert_eq!(Team::from_id(41).display_name(GameYear::Y2024), "Car");
    }

    #[test]
    fn session_type_numbering_shifted_in_2024() {
        assert_eq!(SessionType::from_raw(GameYear::Y2022, 10), SessionType::Race);
        assert_eq!(SessionType::from_raw(GameYear::Y2024, 10), SessionType::SprintShootout1);
        assert_eq!(SessionType::from_raw(GameYear::Y2024, 15), SessionType::Race);
        assert_eq!(SessionType::from_raw(GameYear::Y2020, 12), SessionType::TimeTrial);
        assert!(SessionType::Qualifying2.is_practice_or_qualifying());
        assert!(!SessionType::Race.is_practice_or_qualifying());
    }

    #[test]
    fn track_lookup_handles_negative_and_unknown_ids() {
        assert_eq!(track_name(7), "Silverstone");
        assert_eq!(track_name(-1), "Unknown");
        assert_eq!(track_name(99), "Unknown");
    }

    #[test]
    fn only_pit_penalties_are_servable() {
        assert!(PenaltyType::from_raw(0).is_servable_in_pits());
        assert!(PenaltyType::from_raw(16).is_servable_in_pits());
        assert!(!PenaltyType::from_raw(4).is_servable_in_pits());
        assert_eq!(InfringementType::from_raw(17), InfringementType::PitLaneSpeeding);
    }
}
