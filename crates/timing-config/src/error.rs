use racing_timing_wire::appendix::Team;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON mapping file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML mapping file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported mapping file extension {extension:?} (expected json, yaml or yml)")]
    UnknownExtension { extension: String },

    #[error("league {league:?}: duplicate mapping for team {team:?} number {number}")]
    DuplicateMapping {
        league: String,
        team: Option<Team>,
        number: u8,
    },

    #[error("league {league:?}: driver {name:?} has car number {number}, expected 1..=99")]
    InvalidDriverNumber {
        league: String,
        name: String,
        number: u8,
    },
}
