//! Per-game-year wire registry: packet ids, header sizes and record sizes.
//!
//! Sizes are composed from entry sizes and checked against the published
//! packet sizes at compile time, so a layout slip fails the build.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Every supported generation reports a fixed 22-slot grid.
pub const NUM_CARS: usize = 22;

/// Header size for 2020 and 2022 formats.
pub const HEADER_SIZE_2020: usize = 24;
/// Header size from 2023 on (adds gameYear and overallFrameIdentifier).
pub const HEADER_SIZE_2023: usize = 29;

/// Smallest header across all profiles.
pub const MIN_HEADER_SIZE: usize = HEADER_SIZE_2020;

/// The only `packetVersion` any supported title has shipped.
pub const PACKET_VERSION: u8 = 1;

/// Car motion entry, identical across all years.
pub const CAR_MOTION_ENTRY_SIZE: usize = 60;
/// Player-only motion trailer carried by 2020/2022 (moved to MotionEx later).
pub const MOTION_PLAYER_TRAILER_SIZE: usize = 120;
/// Decoded prefix of the session payload; the remainder is forecast/assist data.
pub const SESSION_PREFIX_SIZE: usize = 126;
pub const MARSHAL_ZONES: usize = 21;
pub const EVENT_CODE_SIZE: usize = 4;
pub const MAX_HISTORY_LAPS: usize = 100;
pub const MAX_TYRE_STINTS: usize = 8;
pub const NUM_TYRE_SETS: usize = 20;
pub const NAME_SIZE: usize = 48;

// ── Entry sizes per year ──────────────────────────────────────────────────────

pub mod layout_2020 {
    pub const SESSION_PAYLOAD: usize = 227;
    pub const LAP_ENTRY: usize = 53;
    pub const EVENT_DETAILS: usize = 7;
    pub const PARTICIPANT_ENTRY: usize = 54;
    pub const CAR_SETUP_ENTRY: usize = 49;
    pub const CAR_TELEMETRY_ENTRY: usize = 58;
    /// buttonStatus u32, mfdPanelIndex, mfdPanelIndexSecondaryPlayer, suggestedGear.
    pub const CAR_TELEMETRY_TRAILER: usize = 7;
    pub const CAR_STATUS_ENTRY: usize = 60;
    pub const CLASSIFICATION_ENTRY: usize = 37;
    pub const LOBBY_ENTRY: usize = 52;
}

pub mod layout_2022 {
    pub const SESSION_PAYLOAD: usize = 608;
    pub const LAP_ENTRY: usize = 43;
    /// timeTrialPBCarIdx, timeTrialRivalCarIdx.
    pub const LAP_TRAILER: usize = 2;
    pub const EVENT_DETAILS: usize = 12;
    pub const PARTICIPANT_ENTRY: usize = 56;
    pub const CAR_SETUP_ENTRY: usize = 49;
    pub const CAR_TELEMETRY_ENTRY: usize = 60;
    pub const CAR_TELEMETRY_TRAILER: usize = 3;
    pub const CAR_STATUS_ENTRY: usize = 47;
    pub const CLASSIFICATION_ENTRY: usize = 45;
    pub const LOBBY_ENTRY: usize = 53;
    pub const CAR_DAMAGE_ENTRY: usize = 42;
    pub const LAP_HISTORY_ENTRY: usize = 11;
    /// carIdx, numLaps, numTyreStints, best lap and best sector lap numbers.
    pub const HISTORY_PREFIX: usize = 7;
    pub const TYRE_STINT_ENTRY: usize = 3;
}

pub mod layout_2023 {
    pub const SESSION_PAYLOAD: usize = 615;
    pub const LAP_ENTRY: usize = 50;
    pub const PARTICIPANT_ENTRY: usize = 58;
    pub const CAR_STATUS_ENTRY: usize = 55;
    pub const LOBBY_ENTRY: usize = 54;
    pub const LAP_HISTORY_ENTRY: usize = 14;
    pub const TYRE_SET_ENTRY: usize = 10;
    pub const MOTION_EX_PAYLOAD: usize = 188;
}

pub mod layout_2024 {
    pub const SESSION_PAYLOAD: usize = 724;
    pub const LAP_ENTRY: usize = 57;
    pub const PARTICIPANT_ENTRY: usize = 60;
    pub const CAR_SETUP_ENTRY: usize = 50;
    /// nextFrontWingValue.
    pub const CAR_SETUP_TRAILER: usize = 4;
    pub const LOBBY_ENTRY: usize = 58;
    pub const MOTION_EX_PAYLOAD: usize = 208;
    pub const TIME_TRIAL_SET: usize = 24;
}

use layout_2020 as l20;
use layout_2022 as l22;
use layout_2023 as l23;
use layout_2024 as l24;

const fn per_car(entry: usize) -> usize {
    NUM_CARS * entry
}

const MOTION_2020: usize =
    HEADER_SIZE_2020 + per_car(CAR_MOTION_ENTRY_SIZE) + MOTION_PLAYER_TRAILER_SIZE;
const MOTION_2023: usize = HEADER_SIZE_2023 + per_car(CAR_MOTION_ENTRY_SIZE);

const SESSION_2020: usize = HEADER_SIZE_2020 + l20::SESSION_PAYLOAD;
const SESSION_2022: usize = HEADER_SIZE_2020 + l22::SESSION_PAYLOAD;
const SESSION_2023: usize = HEADER_SIZE_2023 + l23::SESSION_PAYLOAD;
const SESSION_2024: usize = HEADER_SIZE_2023 + l24::SESSION_PAYLOAD;

const LAP_2020: usize = HEADER_SIZE_2020 + per_car(l20::LAP_ENTRY);
const LAP_2022: usize = HEADER_SIZE_2020 + per_car(l22::LAP_ENTRY) + l22::LAP_TRAILER;
const LAP_2023: usize = HEADER_SIZE_2023 + per_car(l23::LAP_ENTRY) + l22::LAP_TRAILER;
const LAP_2024: usize = HEADER_SIZE_2023 + per_car(l24::LAP_ENTRY) + l22::LAP_TRAILER;

const EVENT_2020: usize = HEADER_SIZE_2020 + EVENT_CODE_SIZE + l20::EVENT_DETAILS;
const EVENT_2022: usize = HEADER_SIZE_2020 + EVENT_CODE_SIZE + l22::EVENT_DETAILS;
const EVENT_2023: usize = HEADER_SIZE_2023 + EVENT_CODE_SIZE + l22::EVENT_DETAILS;

const PARTICIPANTS_2020: usize = HEADER_SIZE_2020 + 1 + per_car(l20::PARTICIPANT_ENTRY);
const PARTICIPANTS_2022: usize = HEADER_SIZE_2020 + 1 + per_car(l22::PARTICIPANT_ENTRY);
const PARTICIPANTS_2023: usize = HEADER_SIZE_2023 + 1 + per_car(l23::PARTICIPANT_ENTRY);
const PARTICIPANTS_2024: usize = HEADER_SIZE_2023 + 1 + per_car(l24::PARTICIPANT_ENTRY);

const CAR_SETUPS_2020: usize = HEADER_SIZE_2020 + per_car(l20::CAR_SETUP_ENTRY);
const CAR_SETUPS_2023: usize = HEADER_SIZE_2023 + per_car(l22::CAR_SETUP_ENTRY);
const CAR_SETUPS_2024: usize =
    HEADER_SIZE_2023 + per_car(l24::CAR_SETUP_ENTRY) + l24::CAR_SETUP_TRAILER;

const CAR_TELEMETRY_2020: usize =
    HEADER_SIZE_2020 + per_car(l20::CAR_TELEMETRY_ENTRY) + l20::CAR_TELEMETRY_TRAILER;
const CAR_TELEMETRY_2022: usize =
    HEADER_SIZE_2020 + per_car(l22::CAR_TELEMETRY_ENTRY) + l22::CAR_TELEMETRY_TRAILER;
const CAR_TELEMETRY_2023: usize =
    HEADER_SIZE_2023 + per_car(l22::CAR_TELEMETRY_ENTRY) + l22::CAR_TELEMETRY_TRAILER;

const CAR_STATUS_2020: usize = HEADER_SIZE_2020 + per_car(l20::CAR_STATUS_ENTRY);
const CAR_STATUS_2022: usize = HEADER_SIZE_2020 + per_car(l22::CAR_STATUS_ENTRY);
const CAR_STATUS_2023: usize = HEADER_SIZE_2023 + per_car(l23::CAR_STATUS_ENTRY);

const CLASSIFICATION_2020: usize = HEADER_SIZE_2020 + 1 + per_car(l20::CLASSIFICATION_ENTRY);
const CLASSIFICATION_2022: usize = HEADER_SIZE_2020 + 1 + per_car(l22::CLASSIFICATION_ENTRY);
const CLASSIFICATION_2023: usize = HEADER_SIZE_2023 + 1 + per_car(l22::CLASSIFICATION_ENTRY);

const LOBBY_2020: usize = HEADER_SIZE_2020 + 1 + per_car(l20::LOBBY_ENTRY);
const LOBBY_2022: usize = HEADER_SIZE_2020 + 1 + per_car(l22::LOBBY_ENTRY);
const LOBBY_2023: usize = HEADER_SIZE_2023 + 1 + per_car(l23::LOBBY_ENTRY);
const LOBBY_2024: usize = HEADER_SIZE_2023 + 1 + per_car(l24::LOBBY_ENTRY);

const CAR_DAMAGE_2022: usize = HEADER_SIZE_2020 + per_car(l22::CAR_DAMAGE_ENTRY);
const CAR_DAMAGE_2023: usize = HEADER_SIZE_2023 + per_car(l22::CAR_DAMAGE_ENTRY);

const HISTORY_2022: usize = HEADER_SIZE_2020
    + l22::HISTORY_PREFIX
    + MAX_HISTORY_LAPS * l22::LAP_HISTORY_ENTRY
    + MAX_TYRE_STINTS * l22::TYRE_STINT_ENTRY;
const HISTORY_2023: usize = HEADER_SIZE_2023
    + l22::HISTORY_PREFIX
    + MAX_HISTORY_LAPS * l23::LAP_HISTORY_ENTRY
    + MAX_TYRE_STINTS * l22::TYRE_STINT_ENTRY;

/// carIdx, 20 sets, fittedIdx.
const TYRE_SETS_2023: usize = HEADER_SIZE_2023 + 1 + NUM_TYRE_SETS * l23::TYRE_SET_ENTRY + 1;

const MOTION_EX_2023: usize = HEADER_SIZE_2023 + l23::MOTION_EX_PAYLOAD;
const MOTION_EX_2024: usize = HEADER_SIZE_2023 + l24::MOTION_EX_PAYLOAD;

const TIME_TRIAL_2024: usize = HEADER_SIZE_2023 + 3 * l24::TIME_TRIAL_SET;

const _: () = {
    assert!(MOTION_2020 == 1464);
    assert!(MOTION_2023 == 1349);
    assert!(SESSION_2020 == 251);
    assert!(SESSION_2022 == 632);
    assert!(SESSION_2023 == 644);
    assert!(SESSION_2024 == 753);
    assert!(LAP_2020 == 1190);
    assert!(LAP_2022 == 972);
    assert!(LAP_2023 == 1131);
    assert!(LAP_2024 == 1285);
    assert!(EVENT_2020 == 35);
    assert!(EVENT_2022 == 40);
    assert!(EVENT_2023 == 45);
    assert!(PARTICIPANTS_2020 == 1213);
    assert!(PARTICIPANTS_2022 == 1257);
    assert!(PARTICIPANTS_2023 == 1306);
    assert!(PARTICIPANTS_2024 == 1350);
    assert!(CAR_SETUPS_2020 == 1102);
    assert!(CAR_SETUPS_2023 == 1107);
    assert!(CAR_SETUPS_2024 == 1133);
    assert!(CAR_TELEMETRY_2020 == 1307);
    assert!(CAR_TELEMETRY_2022 == 1347);
    assert!(CAR_TELEMETRY_2023 == 1352);
    assert!(CAR_STATUS_2020 == 1344);
    assert!(CAR_STATUS_2022 == 1058);
    assert!(CAR_STATUS_2023 == 1239);
    assert!(CLASSIFICATION_2020 == 839);
    assert!(CLASSIFICATION_2022 == 1015);
    assert!(CLASSIFICATION_2023 == 1020);
    assert!(LOBBY_2020 == 1169);
    assert!(LOBBY_2022 == 1191);
    assert!(LOBBY_2023 == 1218);
    assert!(LOBBY_2024 == 1306);
    assert!(CAR_DAMAGE_2022 == 948);
    assert!(CAR_DAMAGE_2023 == 953);
    assert!(HISTORY_2022 == 1155);
    assert!(HISTORY_2023 == 1460);
    assert!(TYRE_SETS_2023 == 231);
    assert!(MOTION_EX_2023 == 217);
    assert!(MOTION_EX_2024 == 237);
    assert!(TIME_TRIAL_2024 == 101);
};

// ── Game year profile ─────────────────────────────────────────────────────────

/// A wire-format generation. Each one has its own header, record layouts and
/// behavioural quirks; they are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum GameYear {
    Y2020,
    Y2022,
    Y2023,
    Y2024,
}

impl GameYear {
    pub const ALL: [GameYear; 4] = [
        GameYear::Y2020,
        GameYear::Y2022,
        GameYear::Y2023,
        GameYear::Y2024,
    ];

    /// The `packetFormat` value carried in every header.
    pub const fn packet_format(self) -> u16 {
        match self {
            GameYear::Y2020 => 2020,
            GameYear::Y2022 => 2022,
            GameYear::Y2023 => 2023,
            GameYear::Y2024 => 2024,
        }
    }

    pub const fn from_packet_format(format: u16) -> Option<Self> {
        match format {
            2020 => Some(GameYear::Y2020),
            2022 => Some(GameYear::Y2022),
            2023 => Some(GameYear::Y2023),
            2024 => Some(GameYear::Y2024),
            _ => None,
        }
    }

    pub const fn header_size(self) -> usize {
        match self {
            GameYear::Y2020 | GameYear::Y2022 => HEADER_SIZE_2020,
            GameYear::Y2023 | GameYear::Y2024 => HEADER_SIZE_2023,
        }
    }

    /// Total on-wire size (header included) of `kind` in this generation, or
    /// `None` when the generation does not define it.
    pub const fn packet_size(self, kind: PacketKind) -> Option<usize> {
        use GameYear::*;
        use PacketKind::*;
        let size = match (self, kind) {
            (Y2020 | Y2022, Motion) => MOTION_2020,
            (Y2023 | Y2024, Motion) => MOTION_2023,
            (Y2020, Session) => SESSION_2020,
            (Y2022, Session) => SESSION_2022,
            (Y2023, Session) => SESSION_2023,
            (Y2024, Session) => SESSION_2024,
            (Y2020, Lap) => LAP_2020,
            (Y2022, Lap) => LAP_2022,
            (Y2023, Lap) => LAP_2023,
            (Y2024, Lap) => LAP_2024,
            (Y2020, Event) => EVENT_2020,
            (Y2022, Event) => EVENT_2022,
            (Y2023 | Y2024, Event) => EVENT_2023,
            (Y2020, Participants) => PARTICIPANTS_2020,
            (Y2022, Participants) => PARTICIPANTS_2022,
            (Y2023, Participants) => PARTICIPANTS_2023,
            (Y2024, Participants) => PARTICIPANTS_2024,
            (Y2020 | Y2022, CarSetups) => CAR_SETUPS_2020,
            (Y2023, CarSetups) => CAR_SETUPS_2023,
            (Y2024, CarSetups) => CAR_SETUPS_2024,
            (Y2020, CarTelemetry) => CAR_TELEMETRY_2020,
            (Y2022, CarTelemetry) => CAR_TELEMETRY_2022,
            (Y2023 | Y2024, CarTelemetry) => CAR_TELEMETRY_2023,
            (Y2020, CarStatus) => CAR_STATUS_2020,
            (Y2022, CarStatus) => CAR_STATUS_2022,
            (Y2023 | Y2024, CarStatus) => CAR_STATUS_2023,
            (Y2020, FinalClassification) => CLASSIFICATION_2020,
            (Y2022, FinalClassification) => CLASSIFICATION_2022,
            (Y2023 | Y2024, FinalClassification) => CLASSIFICATION_2023,
            (Y2020, LobbyInfo) => LOBBY_2020,
            (Y2022, LobbyInfo) => LOBBY_2022,
            (Y2023, LobbyInfo) => LOBBY_2023,
            (Y2024, LobbyInfo) => LOBBY_2024,
            (Y2022, CarDamage) => CAR_DAMAGE_2022,
            (Y2023 | Y2024, CarDamage) => CAR_DAMAGE_2023,
            (Y2022, SessionHistory) => HISTORY_2022,
            (Y2023 | Y2024, SessionHistory) => HISTORY_2023,
            (Y2023 | Y2024, TyreSets) => TYRE_SETS_2023,
            (Y2023, MotionEx) => MOTION_EX_2023,
            (Y2024, MotionEx) => MOTION_EX_2024,
            (Y2024, TimeTrial) => TIME_TRIAL_2024,
            _ => return None,
        };
        Some(size)
    }

    /// Packet kinds this generation defines, in packet-id order.
    pub fn packet_kinds(self) -> impl Iterator<Item = PacketKind> {
        PacketKind::ALL
            .into_iter()
            .filter(move |kind| self.packet_size(*kind).is_some())
    }
}

impl From<GameYear> for u16 {
    fn from(year: GameYear) -> Self {
        year.packet_format()
    }
}

impl TryFrom<u16> for GameYear {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        GameYear::from_packet_format(value)
            .ok_or_else(|| format!("unsupported game year {value} (expected 2020, 2022, 2023 or 2024)"))
    }
}

impl fmt::Display for GameYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F1 {}", self.packet_format())
    }
}

impl std::str::FromStr for GameYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches("f1_").trim_start_matches("F1 ");
        let value: u16 = trimmed
            .parse()
            .map_err(|err| format!("invalid game year '{s}': {err}"))?;
        GameYear::try_from(value)
    }
}

// ── Packet kinds ──────────────────────────────────────────────────────────────

/// Packet kind as identified by the header's `packetId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PacketKind {
    Motion,
    Session,
    Lap,
    Event,
    Participants,
    CarSetups,
    CarTelemetry,
    CarStatus,
    FinalClassification,
    LobbyInfo,
    CarDamage,
    SessionHistory,
    TyreSets,
    MotionEx,
    TimeTrial,
    /// Too short, unsupported format, undefined id or truncated record.
    Unknown,
}

impl PacketKind {
    pub const ALL: [PacketKind; 15] = [
        PacketKind::Motion,
        PacketKind::Session,
        PacketKind::Lap,
        PacketKind::Event,
        PacketKind::Participants,
        PacketKind::CarSetups,
        PacketKind::CarTelemetry,
        PacketKind::CarStatus,
        PacketKind::FinalClassification,
        PacketKind::LobbyInfo,
        PacketKind::CarDamage,
        PacketKind::SessionHistory,
        PacketKind::TyreSets,
        PacketKind::MotionEx,
        PacketKind::TimeTrial,
    ];

    pub const fn from_id(id: u8) -> Option<Self> {
        let kind = match id {
            0 => PacketKind::Motion,
            1 => PacketKind::Session,
            2 => PacketKind::Lap,
            3 => PacketKind::Event,
            4 => PacketKind::Participants,
            5 => PacketKind::CarSetups,
            6 => PacketKind::CarTelemetry,
            7 => PacketKind::CarStatus,
            8 => PacketKind::FinalClassification,
            9 => PacketKind::LobbyInfo,
            10 => PacketKind::CarDamage,
            11 => PacketKind::SessionHistory,
            12 => PacketKind::TyreSets,
            13 => PacketKind::MotionEx,
            14 => PacketKind::TimeTrial,
            _ => return None,
        };
        Some(kind)
    }

    /// Wire id, or `None` for [`PacketKind::Unknown`].
    pub const fn id(self) -> Option<u8> {
        let id = match self {
            PacketKind::Motion => 0,
            PacketKind::Session => 1,
            PacketKind::Lap => 2,
            PacketKind::Event => 3,
            PacketKind::Participants => 4,
            PacketKind::CarSetups => 5,
            PacketKind::CarTelemetry => 6,
            PacketKind::CarStatus => 7,
            PacketKind::FinalClassification => 8,
            PacketKind::LobbyInfo => 9,
            PacketKind::CarDamage => 10,
            PacketKind::SessionHistory => 11,
            PacketKind::TyreSets => 12,
            PacketKind::MotionEx => 13,
            PacketKind::TimeTrial => 14,
            PacketKind::Unknown => return None,
        };
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn packet_ids_round_trip_through_kind() {
        for id in 0..=14u8 {
            let kind = PacketKind::from_id(id);
            assert_eq!(kind.and_then(PacketKind::id), Some(id));
        }
        assert_eq!(PacketKind::from_id(15), None);
        assert_eq!(PacketKind::Unknown.id(), None);
    }

    #[test]
    fn generation_coverage_matches_protocol_history() {
        assert_eq!(GameYear::Y2020.packet_kinds().count(), 10);
        assert_eq!(GameYear::Y2022.packet_kinds().count(), 12);
        assert_eq!(GameYear::Y2023.packet_kinds().count(), 14);
        assert_eq!(GameYear::Y2024.packet_kinds().count(), 15);
        assert_eq!(GameYear::Y2020.packet_size(PacketKind::CarDamage), None);
        assert_eq!(GameYear::Y2023.packet_size(PacketKind::TimeTrial), None);
    }

    #[test]
    fn sizes_from_the_documented_tables() {
        assert_eq!(GameYear::Y2020.packet_size(PacketKind::Participants), Some(1213));
        assert_eq!(GameYear::Y2020.packet_size(PacketKind::CarStatus), Some(1344));
        assert_eq!(GameYear::Y2024.packet_size(PacketKind::Lap), Some(1285));
        assert_eq!(GameYear::Y2023.packet_size(PacketKind::CarStatus), Some(1239));
    }

    #[test]
    fn game_year_parses_from_config_spellings() -> TestResult {
        assert_eq!("2024".parse::<GameYear>()?, GameYear::Y2024);
        assert_eq!("f1_2022".parse::<GameYear>()?, GameYear::Y2022);
        assert!("2021".parse::<GameYear>().is_err());
        Ok(())
    }
}
