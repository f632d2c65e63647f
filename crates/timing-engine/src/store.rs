//! Latest decoded snapshot of every packet kind.

use racing_timing_wire::packets::{
    CarDamagePacket, CarSetupsPacket, CarStatusPacket, CarTelemetryPacket, EventPacket,
    FinalClassificationPacket, LapPacket, LobbyInfoPacket, MotionExPacket, MotionPacket,
    ParticipantsPacket, SessionHistoryPacket, SessionPacket, TimeTrialPacket, TyreSetsPacket,
};
use racing_timing_wire::{Frame, Packet, PacketHeader};

/// A packet together with the header it arrived with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot<T> {
    pub header: PacketHeader,
    pub packet: T,
}

/// Each kind is overwritten in place; nothing older than the latest packet
/// is kept. Session history arrives one car per packet, so only the most
/// recent car's history is held here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketStore {
    pub motion: Snapshot<MotionPacket>,
    pub session: Snapshot<SessionPacket>,
    pub lap: Snapshot<LapPacket>,
    pub event: Snapshot<EventPacket>,
    pub participants: Snapshot<ParticipantsPacket>,
    pub car_setups: Snapshot<CarSetupsPacket>,
    pub car_telemetry: Snapshot<CarTelemetryPacket>,
    pub car_status: Snapshot<CarStatusPacket>,
    pub final_classification: Snapshot<FinalClassificationPacket>,
    pub lobby: Snapshot<LobbyInfoPacket>,
    pub car_damage: Snapshot<CarDamagePacket>,
    pub session_history: Snapshot<SessionHistoryPacket>,
    pub tyre_sets: Snapshot<TyreSetsPacket>,
    pub motion_ex: Snapshot<MotionExPacket>,
    pub time_trial: Snapshot<TimeTrialPacket>,
}

impl PacketStore {
    /// Overwrite the snapshot for the frame's kind.
    pub fn store(&mut self, frame: Frame) {
        let header = frame.header;
        match frame.packet {
            Packet::Motion(packet) => self.motion = Snapshot { header, packet },
            Packet::Session(packet) => self.session = Snapshot { header, packet },
            Packet::Lap(packet) => self.lap = Snapshot { header, packet },
            Packet::Event(packet) => self.event = Snapshot { header, packet },
            Packet::Participants(packet) => self.participants = Snapshot { header, packet },
            Packet::CarSetups(packet) => self.car_setups = Snapshot { header, packet },
            Packet::CarTelemetry(packet) => self.car_telemetry = Snapshot { header, packet },
            Packet::CarStatus(packet) => self.car_status = Snapshot { header, packet },
            Packet::FinalClassification(packet) => {
                self.final_classification = Snapshot { header, packet };
            }
            Packet::LobbyInfo(packet) => self.lobby = Snapshot { header, packet },
            Packet::CarDamage(packet) => self.car_damage = Snapshot { header, packet },
            Packet::SessionHistory(packet) => self.session_history = Snapshot { header, packet },
            Packet::TyreSets(packet) => self.tyre_sets = Snapshot { header, packet },
            Packet::MotionEx(packet) => self.motion_ex = Snapshot { header, packet },
            Packet::TimeTrial(packet) => self.time_trial = Snapshot { header, packet },
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racing_timing_wire::packets::LapEntry;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn store_overwrites_only_its_kind() -> TestResult {
        let mut store = PacketStore::default();
        let mut lap = LapPacket::default();
        *lap.cars.get_mut(0).ok_or("car 0")? = LapEntry {
            car_position: 3,
            ..LapEntry::default()
        };
        let header = PacketHeader {
            packet_id: 2,
            frame_identifier: 9,
            ..PacketHeader::default()
        };
        store.store(Frame {
            header,
            packet: Packet::Lap(lap.clone()),
        });
        assert_eq!(store.lap.packet, lap);
        assert_eq!(store.lap.header.frame_identifier, 9);
        assert_eq!(store.session, Snapshot::default());

        store.reset();
        assert_eq!(store, PacketStore::default());
        Ok(())
    }
}
