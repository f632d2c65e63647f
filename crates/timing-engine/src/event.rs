//! Event packet interpretation.
//!
//! The detail union is keyed by the 4-character code. Offsets within the
//! detail bytes:
//!
//! | Code                   | Layout                                             |
//! |------------------------|----------------------------------------------------|
//! | `FTLP`                 | vehicleIdx u8, lapTime f32                         |
//! | `RTMT` `TMPT` `RCWN`   | vehicleIdx u8                                      |
//! | `PENA`                 | penaltyType, infringementType, vehicleIdx,         |
//! |                        | otherVehicleIdx, time, lapNum, placesGained (u8s)  |
//! | `SPTP`                 | vehicleIdx u8, speed f32                           |
//! | `BUTN`                 | buttonStatus u32                                   |

use racing_timing_wire::ByteReader;
use racing_timing_wire::appendix::{InfringementType, PenaltyType};
use racing_timing_wire::packets::EventPacket;
use serde::Serialize;

/// UDP Action 1 in the `BUTN` bitmask.
pub const UDP_ACTION_1: u32 = 0x0010_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    SessionStarted,
    SessionEnded,
    FastestLap,
    Retirement,
    DrsEnabled,
    DrsDisabled,
    TeamMateInPits,
    ChequeredFlag,
    RaceWinner,
    PenaltyIssued,
    SpeedTrapTriggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PenaltyDetails {
    pub penalty_type: PenaltyType,
    pub infringement_type: InfringementType,
    pub other_vehicle_idx: u8,
    /// Seconds gained, as reported.
    pub time: u8,
    pub lap_num: u8,
    pub places_gained: u8,
    pub served: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EventDetail {
    None,
    FastestLap { lap_time_s: f32 },
    SpeedTrap { speed_kmh: f32 },
    Penalty(PenaltyDetails),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionEvent {
    /// Session time at which the event was applied.
    pub time: f32,
    pub event_type: EventType,
    pub car_index: u8,
    pub detail: EventDetail,
}

impl SessionEvent {
    pub fn penalty(&self) -> Option<&PenaltyDetails> {
        match &self.detail {
            EventDetail::Penalty(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn penalty_mut(&mut self) -> Option<&mut PenaltyDetails> {
        match &mut self.detail {
            EventDetail::Penalty(p) => Some(p),
            _ => None,
        }
    }
}

/// Result of reading one event packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodedEvent {
    Session(SessionEvent),
    /// `BUTN`: the raw button bitmask.
    Buttons(u32),
    /// Empty or unrecognised code.
    Ignored,
}

/// `BUTN`, also accepted with its first byte zeroed (2023 alignment slip).
pub fn is_button_code(code: &[u8; 4]) -> bool {
    matches!(code, b"BUTN" | b"\0UTN")
}

pub fn decode_event(event: &EventPacket, session_time: f32) -> DecodedEvent {
    if is_button_code(&event.code) {
        let mut r = ByteReader::new(&event.details);
        return r.u32_le().map_or(DecodedEvent::Ignored, DecodedEvent::Buttons);
    }
    if event.is_empty() {
        return DecodedEvent::Ignored;
    }
    decode_session_event(event, session_time).map_or(DecodedEvent::Ignored, DecodedEvent::Session)
}

fn decode_session_event(event: &EventPacket, time: f32) -> Option<SessionEvent> {
    let mut r = ByteReader::new(&event.details);
    let simple = |event_type, car_index| SessionEvent {
        time,
        event_type,
        car_index,
        detail: EventDetail::None,
    };
    let decoded = match &event.code {
        b"SSTA" => simple(EventType::SessionStarted, 0),
        b"SEND" => simple(EventType::SessionEnded, 0),
        b"DRSE" => simple(EventType::DrsEnabled, 0),
        b"DRSD" => simple(EventType::DrsDisabled, 0),
        b"CHQF" => simple(EventType::ChequeredFlag, 0),
        b"RTMT" => simple(EventType::Retirement, r.u8().ok()?),
        b"TMPT" => simple(EventType::TeamMateInPits, r.u8().ok()?),
        b"RCWN" => simple(EventType::RaceWinner, r.u8().ok()?),
        b"FTLP" => {
            let car_index = r.u8().ok()?;
            let lap_time_s = r.f32_le().ok()?;
            SessionEvent {
                time,
                event_type: EventType::FastestLap,
                car_index,
                detail: EventDetail::FastestLap { lap_time_s },
            }
        }
        b"SPTP" => {
            let car_index = r.u8().ok()?;
            let speed_kmh = r.f32_le().ok()?;
            SessionEvent {
                time,
                event_type: EventType::SpeedTrapTriggered,
                car_index,
                detail: EventDetail::SpeedTrap { speed_kmh },
            }
        }
        b"PENA" => {
            let penalty_type = PenaltyType::from_raw(r.u8().ok()?);
            let infringement_type = InfringementType::from_raw(r.u8().ok()?);
            let car_index = r.u8().ok()?;
            let details = PenaltyDetails {
                penalty_type,
                infringement_type,
                other_vehicle_idx: r.u8().ok()?,
                time: r.u8().ok()?,
                lap_num: r.u8().ok()?,
                places_gained: r.u8().ok()?,
                served: false,
            };
            SessionEvent {
                time,
                event_type: EventType::PenaltyIssued,
                car_index,
                detail: EventDetail::Penalty(details),
            }
        }
        _ => return None,
    };
    Some(decoded)
}
