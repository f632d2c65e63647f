//! Packet demultiplexer.
//!
//! [`decode`] takes one packet off the front of a buffer. It never fails:
//! anything it cannot decode is reported as [`PacketKind::Unknown`] with the
//! number of bytes the caller must skip. When the packet boundary cannot be
//! known (short header, foreign format, undefined id, truncated record) the
//! whole remaining buffer is consumed so the caller's loop terminates.

use crate::error::WireError;
use crate::header::{PacketHeader, parse_header};
use crate::packets::{Packet, decode_payload};
use crate::registry::{GameYear, PACKET_VERSION, PacketKind};
use tracing::debug;

/// A header plus its decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: PacketHeader,
    pub packet: Packet,
}

/// Result of one demultiplexer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Bytes to advance; never zero for a non-empty buffer.
    pub consumed: usize,
    pub kind: PacketKind,
    /// `None` unless a full record was decoded.
    pub frame: Option<Frame>,
    /// Why nothing was decoded.
    pub skipped: Option<WireError>,
}

impl Decoded {
    fn skip_all(buf: &[u8], err: WireError) -> Self {
        debug!(error = %err, len = buf.len(), "skipping undecodable buffer tail");
        Self {
            consumed: buf.len(),
            kind: PacketKind::Unknown,
            frame: None,
            skipped: Some(err),
        }
    }

    pub fn is_too_short(&self) -> bool {
        matches!(self.skipped, Some(WireError::TooShort { .. }))
    }
}

/// Decode the packet at the start of `buf` using the `year` layout.
pub fn decode(year: GameYear, buf: &[u8]) -> Decoded {
    let header = match parse_header(buf, year) {
        Ok(h) => h,
        Err(err) => return Decoded::skip_all(buf, err),
    };

    if header.packet_format != year.packet_format() || header.packet_version != PACKET_VERSION {
        return Decoded::skip_all(
            buf,
            WireError::UnsupportedFormat {
                format: header.packet_format,
                version: header.packet_version,
                expected: year.packet_format(),
            },
        );
    }

    let Some((kind, size)) = PacketKind::from_id(header.packet_id)
        .and_then(|kind| year.packet_size(kind).map(|size| (kind, size)))
    else {
        return Decoded::skip_all(
            buf,
            WireError::UnknownPacketId {
                id: header.packet_id,
                format: header.packet_format,
            },
        );
    };

    let Some(payload) = buf.get(year.header_size()..size) else {
        return Decoded::skip_all(
            buf,
            WireError::TooShort {
                need: size,
                got: buf.len(),
            },
        );
    };

    match decode_payload(kind, year, payload) {
        Ok(packet) => Decoded {
            consumed: size,
            kind,
            frame: Some(Frame { header, packet }),
            skipped: None,
        },
        Err(err) => Decoded::skip_all(buf, err),
    }
}

/// Iterator that drains a datagram, yielding one [`Decoded`] per step.
pub struct Demultiplexer<'a> {
    year: GameYear,
    buf: &'a [u8],
}

impl<'a> Demultiplexer<'a> {
    pub fn new(year: GameYear, buf: &'a [u8]) -> Self {
        Self { year, buf }
    }
}

impl Iterator for Demultiplexer<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        if self.buf.is_empty() {
            return None;
        }
        let step = decode(self.year, self.buf);
        let advance = step.consumed.clamp(1, self.buf.len());
        self.buf = self.buf.get(advance..).unwrap_or_default();
        Some(step)
    }
}
