//! Common packet header.

use crate::error::WireError;
use crate::reader::ByteReader;
use crate::registry::GameYear;
use serde::Serialize;

/// Header fields, unified across the 24-byte (2020/2022) and 29-byte
/// (2023/2024) layouts. Fields the older layout lacks read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    pub overall_frame_identifier: u32,
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Player slot, or `None` for spectator/visitor modes (index 255).
    pub fn player_index(&self) -> Option<usize> {
        let idx = usize::from(self.player_car_index);
        (idx < crate::NUM_CARS).then_some(idx)
    }
}

/// Parse the header using the layout of `year`.
pub fn parse_header(raw: &[u8], year: GameYear) -> Result<PacketHeader, WireError> {
    let need = year.header_size();
    if raw.len() < need {
        return Err(WireError::TooShort {
            need,
            got: raw.len(),
        });
    }
    let mut r = ByteReader::new(raw);
    let mut h = PacketHeader {
        packet_format: r.u16_le()?, // 0-1
        ..PacketHeader::default()
    };
    match year {
        GameYear::Y2020 | GameYear::Y2022 => {
            h.game_major_version = r.u8()?; // 2
            h.game_minor_version = r.u8()?; // 3
            h.packet_version = r.u8()?; // 4
            h.packet_id = r.u8()?; // 5
            h.session_uid = r.u64_le()?; // 6-13
            h.session_time = r.f32_le()?; // 14-17
            h.frame_identifier = r.u32_le()?; // 18-21
            h.overall_frame_identifier = h.frame_identifier;
            h.player_car_index = r.u8()?; // 22
            h.secondary_player_car_index = r.u8()?; // 23
        }
        GameYear::Y2023 | GameYear::Y2024 => {
            h.game_year = r.u8()?; // 2
            h.game_major_version = r.u8()?; // 3
            h.game_minor_version = r.u8()?; // 4
            h.packet_version = r.u8()?; // 5
            h.packet_id = r.u8()?; // 6
            h.session_uid = r.u64_le()?; // 7-14
            h.session_time = r.f32_le()?; // 15-18
            h.frame_identifier = r.u32_le()?; // 19-22
            h.overall_frame_identifier = r.u32_le()?; // 23-26
            h.player_car_index = r.u8()?; // 27
            h.secondary_player_car_index = r.u8()?; // 28
        }
    }
    Ok(h)
}
