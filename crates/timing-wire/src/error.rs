//! Decoder error type.
//!
//! These errors never leave [`crate::decode`]: the demultiplexer converts
//! each of them into a consumed-byte count and an unknown packet kind. The
//! per-record functions return them directly so tools and tests can see why
//! a buffer was rejected.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("out of bounds: {what} at offset {offset}")]
    OutOfBounds { what: &'static str, offset: usize },

    #[error("buffer too short: need {need} bytes, got {got}")]
    TooShort { need: usize, got: usize },

    #[error("unsupported packet format {format} (version {version}) for profile {expected}")]
    UnsupportedFormat {
        format: u16,
        version: u8,
        expected: u16,
    },

    #[error("layout mismatch: decoded {decoded} of {expected} payload bytes")]
    LayoutMismatch { decoded: usize, expected: usize },

    #[error("packet id {id} is not defined for format {format}")]
    UnknownPacketId { id: u8, format: u16 },
}
