//! Session (id 1), Event (id 3), Participants (id 4) and LobbyInfo (id 9).

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::{
    EVENT_CODE_SIZE, GameYear, MARSHAL_ZONES, NAME_SIZE, NUM_CARS, SESSION_PREFIX_SIZE,
    layout_2020, layout_2022, layout_2023, layout_2024,
};
use serde::Serialize;

// ── Session ───────────────────────────────────────────────────────────────────

/// Session prefix shared by all generations. The forecast, assist and
/// link-identifier tail differs per year and is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionPacket {
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    pub track_length: u16,
    pub session_type: u8,
    pub track_id: i8,
    pub formula: u8,
    pub session_time_left: u16,
    pub session_duration: u16,
    pub pit_speed_limit: u8,
    pub game_paused: u8,
    pub is_spectating: u8,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: u8,
    pub num_marshal_zones: u8,
    pub safety_car_status: u8,
    pub network_game: u8,
}

const fn session_payload(year: GameYear) -> usize {
    match year {
        GameYear::Y2020 => layout_2020::SESSION_PAYLOAD,
        GameYear::Y2022 => layout_2022::SESSION_PAYLOAD,
        GameYear::Y2023 => layout_2023::SESSION_PAYLOAD,
        GameYear::Y2024 => layout_2024::SESSION_PAYLOAD,
    }
}

pub(crate) fn decode_session(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<SessionPacket, WireError> {
    let mut s = SessionPacket {
        weather: r.u8()?,                // 0
        track_temperature: r.i8()?,      // 1
        air_temperature: r.i8()?,        // 2
        total_laps: r.u8()?,             // 3
        track_length: r.u16_le()?,       // 4-5
        session_type: r.u8()?,           // 6
        track_id: r.i8()?,               // 7
        formula: r.u8()?,                // 8
        session_time_left: r.u16_le()?,  // 9-10
        session_duration: r.u16_le()?,   // 11-12
        pit_speed_limit: r.u8()?,        // 13
        game_paused: r.u8()?,            // 14
        is_spectating: r.u8()?,          // 15
        spectator_car_index: r.u8()?,    // 16
        sli_pro_native_support: r.u8()?, // 17
        num_marshal_zones: r.u8()?,      // 18
        ..SessionPacket::default()
    };
    r.skip(MARSHAL_ZONES * 5)?; // zoneStart f32 + zoneFlag i8 (19-123)
    s.safety_car_status = r.u8()?; // 124
    s.network_game = r.u8()?; // 125
    r.skip(session_payload(year).saturating_sub(SESSION_PREFIX_SIZE))?;
    Ok(s)
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// Raw event: the 4-character code plus the detail union, zero-padded to the
/// widest (12-byte) layout. Interpretation depends on the code and lives in
/// the timing engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventPacket {
    pub code: [u8; EVENT_CODE_SIZE],
    pub details: [u8; layout_2022::EVENT_DETAILS],
}

impl EventPacket {
    /// Code as text, lossy for non-ASCII bytes.
    pub fn code_str(&self) -> String {
        String::from_utf8_lossy(&self.code).into_owned()
    }

    /// True when no code is present (also after the engine has consumed it).
    pub fn is_empty(&self) -> bool {
        self.code == [0; EVENT_CODE_SIZE]
    }
}

pub(crate) fn decode_event(r: &mut ByteReader<'_>, year: GameYear) -> Result<EventPacket, WireError> {
    let code = r.u8_array::<EVENT_CODE_SIZE>()?;
    let mut details = [0u8; layout_2022::EVENT_DETAILS];
    let width = match year {
        GameYear::Y2020 => layout_2020::EVENT_DETAILS,
        _ => layout_2022::EVENT_DETAILS,
    };
    for b in details.iter_mut().take(width) {
        *b = r.u8()?;
    }
    Ok(EventPacket { code, details })
}

// ── Participants ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Participant {
    pub ai_controlled: bool,
    /// 255 for network humans from 2023; 100+ for humans in 2020/2022.
    pub driver_id: u8,
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: bool,
    pub race_number: u8,
    pub nationality: u8,
    pub name: String,
    /// 0 = restricted, 1 = public.
    pub your_telemetry: u8,
    /// 2023+. Older generations read as `true`.
    pub show_online_names: bool,
    pub tech_level: u16,
    pub platform: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipantsPacket {
    pub num_active_cars: u8,
    pub participants: [Participant; NUM_CARS],
}

fn decode_participant(r: &mut ByteReader<'_>, year: GameYear) -> Result<Participant, WireError> {
    let mut p = Participant {
        ai_controlled: r.bool()?, // 0
        driver_id: r.u8()?,       // 1
        show_online_names: true,
        ..Participant::default()
    };
    if year != GameYear::Y2020 {
        p.network_id = r.u8()?; // 2
    }
    p.team_id = r.u8()?;
    if year != GameYear::Y2020 {
        p.my_team = r.bool()?;
    }
    p.race_number = r.u8()?;
    p.nationality = r.u8()?;
    p.name = r.name::<NAME_SIZE>()?;
    p.your_telemetry = r.u8()?;
    match year {
        GameYear::Y2020 | GameYear::Y2022 => {}
        GameYear::Y2023 => {
            p.show_online_names = r.bool()?;
            p.platform = r.u8()?;
        }
        GameYear::Y2024 => {
            p.show_online_names = r.bool()?;
            p.tech_level = r.u16_le()?;
            p.platform = r.u8()?;
        }
    }
    Ok(p)
}

pub(crate) fn decode_participants(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<ParticipantsPacket, WireError> {
    let mut packet = ParticipantsPacket {
        num_active_cars: r.u8()?,
        ..ParticipantsPacket::default()
    };
    for slot in packet.participants.iter_mut() {
        *slot = decode_participant(r, year)?;
    }
    Ok(packet)
}

// ── Lobby ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LobbyPlayer {
    pub ai_controlled: bool,
    pub team_id: u8,
    pub nationality: u8,
    pub platform: u8,
    pub name: String,
    pub car_number: u8,
    pub your_telemetry: u8,
    pub show_online_names: bool,
    pub tech_level: u16,
    pub ready_status: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LobbyInfoPacket {
    pub num_players: u8,
    pub players: [LobbyPlayer; NUM_CARS],
}

fn decode_lobby_player(r: &mut ByteReader<'_>, year: GameYear) -> Result<LobbyPlayer, WireError> {
    let mut p = LobbyPlayer {
        ai_controlled: r.bool()?,
        team_id: r.u8()?,
        nationality: r.u8()?,
        show_online_names: true,
        ..LobbyPlayer::default()
    };
    if matches!(year, GameYear::Y2023 | GameYear::Y2024) {
        p.platform = r.u8()?;
    }
    p.name = r.name::<NAME_SIZE>()?;
    if year != GameYear::Y2020 {
        p.car_number = r.u8()?;
    }
    if year == GameYear::Y2024 {
        p.your_telemetry = r.u8()?;
        p.show_online_names = r.bool()?;
        p.tech_level = r.u16_le()?;
    }
    p.ready_status = r.u8()?;
    Ok(p)
}

pub(crate) fn decode_lobby(
    r: &mut ByteReader<'_>,
    year: GameYear,
) -> Result<LobbyInfoPacket, WireError> {
    let mut packet = LobbyInfoPacket {
        num_players: r.u8()?,
        ..LobbyInfoPacket::default()
    };
    for slot in packet.players.iter_mut() {
        *slot = decode_lobby_player(r, year)?;
    }
    Ok(packet)
}
