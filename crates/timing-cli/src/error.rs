//! Error types for f1timing

use racing_timing_config::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to bind UDP socket at {addr} (is another process using this port?)")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read capture '{}'", .path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("capture is truncated at byte {offset}")]
    TruncatedCapture { offset: usize },

    #[error("league '{0}' not found in the mapping file")]
    UnknownLeague(String),

    #[error("mapping file holds no leagues")]
    NoLeagues,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Bind { .. } => 2,
            CliError::Capture { .. } | CliError::TruncatedCapture { .. } => 3,
            CliError::UnknownLeague(_) | CliError::NoLeagues | CliError::Config(_) => 4,
        }
    }
}
