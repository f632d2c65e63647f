//! Typed packet records, one module per packet family.
//!
//! Each record is unified across generations: fields a year does not carry
//! read as zero (or the documented neutral value).

pub mod car;
pub mod motion;
pub mod session;
pub mod timing;

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::{GameYear, PacketKind};
use serde::Serialize;

pub use car::{
    CarDamage, CarDamagePacket, CarSetup, CarSetupsPacket, CarStatus, CarStatusPacket,
    CarTelemetry, CarTelemetryPacket, TyreSet, TyreSetsPacket,
};
pub use motion::{CarMotion, MotionExPacket, MotionPacket};
pub use session::{
    EventPacket, LobbyInfoPacket, LobbyPlayer, Participant, ParticipantsPacket, SessionPacket,
};
pub use timing::{
    ClassificationRecord, FinalClassificationPacket, LapEntry, LapHistory, LapPacket,
    SessionHistoryPacket, TimeTrialDataSet, TimeTrialPacket, TyreStintHistory,
};

/// A decoded packet payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum Packet {
    Motion(MotionPacket),
    Session(SessionPacket),
    Lap(LapPacket),
    Event(EventPacket),
    Participants(ParticipantsPacket),
    CarSetups(CarSetupsPacket),
    CarTelemetry(CarTelemetryPacket),
    CarStatus(CarStatusPacket),
    FinalClassification(FinalClassificationPacket),
    LobbyInfo(LobbyInfoPacket),
    CarDamage(CarDamagePacket),
    SessionHistory(SessionHistoryPacket),
    TyreSets(TyreSetsPacket),
    MotionEx(MotionExPacket),
    TimeTrial(TimeTrialPacket),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Motion(_) => PacketKind::Motion,
            Packet::Session(_) => PacketKind::Session,
            Packet::Lap(_) => PacketKind::Lap,
            Packet::Event(_) => PacketKind::Event,
            Packet::Participants(_) => PacketKind::Participants,
            Packet::CarSetups(_) => PacketKind::CarSetups,
            Packet::CarTelemetry(_) => PacketKind::CarTelemetry,
            Packet::CarStatus(_) => PacketKind::CarStatus,
            Packet::FinalClassification(_) => PacketKind::FinalClassification,
            Packet::LobbyInfo(_) => PacketKind::LobbyInfo,
            Packet::CarDamage(_) => PacketKind::CarDamage,
            Packet::SessionHistory(_) => PacketKind::SessionHistory,
            Packet::TyreSets(_) => PacketKind::TyreSets,
            Packet::MotionEx(_) => PacketKind::MotionEx,
            Packet::TimeTrial(_) => PacketKind::TimeTrial,
        }
    }
}

/// Decode the payload that follows the header. `payload` must be exactly the
/// registered payload length for `kind` in `year`.
pub fn decode_payload(
    kind: PacketKind,
    year: GameYear,
    payload: &[u8],
) -> Result<Packet, WireError> {
    let mut r = ByteReader::new(payload);
    let packet = match kind {
        PacketKind::Motion => Packet::Motion(motion::decode_motion(&mut r, year)?),
        PacketKind::Session => Packet::Session(session::decode_session(&mut r, year)?),
        PacketKind::Lap => Packet::Lap(timing::decode_lap(&mut r, year)?),
        PacketKind::Event => Packet::Event(session::decode_event(&mut r, year)?),
        PacketKind::Participants => {
            Packet::Participants(session::decode_participants(&mut r, year)?)
        }
        PacketKind::CarSetups => Packet::CarSetups(car::decode_car_setups(&mut r, year)?),
        PacketKind::CarTelemetry => {
            Packet::CarTelemetry(car::decode_car_telemetry(&mut r, year)?)
        }
        PacketKind::CarStatus => Packet::CarStatus(car::decode_car_status(&mut r, year)?),
        PacketKind::FinalClassification => {
            Packet::FinalClassification(timing::decode_final_classification(&mut r, year)?)
        }
        PacketKind::LobbyInfo => Packet::LobbyInfo(session::decode_lobby(&mut r, year)?),
        PacketKind::CarDamage => Packet::CarDamage(car::decode_car_damage(&mut r)?),
        PacketKind::SessionHistory => {
            Packet::SessionHistory(timing::decode_session_history(&mut r, year)?)
        }
        PacketKind::TyreSets => Packet::TyreSets(car::decode_tyre_sets(&mut r)?),
        PacketKind::MotionEx => Packet::MotionEx(motion::decode_motion_ex(&mut r, year)?),
        PacketKind::TimeTrial => Packet::TimeTrial(timing::decode_time_trial(&mut r)?),
        PacketKind::Unknown => {
            return Err(WireError::UnknownPacketId {
                id: u8::MAX,
                format: year.packet_format(),
            });
        }
    };
    if r.remaining() != 0 {
        return Err(WireError::LayoutMismatch {
            decoded: r.position(),
            expected: payload.len(),
        });
    }
    Ok(packet)
}
