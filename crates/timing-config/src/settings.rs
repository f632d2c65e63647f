//! Engine and listener settings with environment overrides.

use racing_timing_wire::GameYear;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_UDP_PORT: u16 = 20777;
pub const DEFAULT_PLACEHOLDER_DETECT_AFTER_S: f32 = 3.0;
/// Well above the largest packet of any generation; datagrams beyond this
/// are dropped before decoding.
pub const DEFAULT_MAX_DATAGRAM_BYTES: usize = 512 * 1024;

pub const ENV_GAME_YEAR: &str = "F1TIMING_GAME_YEAR";
pub const ENV_UDP_PORT: &str = "F1TIMING_UDP_PORT";
pub const ENV_MAX_DATAGRAM_BYTES: &str = "F1TIMING_MAX_DATAGRAM_BYTES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Wire profile; packets of any other format are skipped.
    pub game_year: GameYear,
    pub udp_port: u16,
    /// Session time after which the multiplayer placeholder name is detected.
    pub placeholder_detect_after_s: f32,
    pub max_datagram_bytes: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            game_year: GameYear::Y2024,
            udp_port: DEFAULT_UDP_PORT,
            placeholder_detect_after_s: DEFAULT_PLACEHOLDER_DETECT_AFTER_S,
            max_datagram_bytes: DEFAULT_MAX_DATAGRAM_BYTES,
        }
    }
}

impl EngineSettings {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`. Unparsable or zero values keep the
    /// current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_GAME_YEAR) {
            match raw.parse::<GameYear>() {
                Ok(year) => self.game_year = year,
                Err(err) => warn!(error = %err, var = ENV_GAME_YEAR, "ignoring game year override"),
            }
        }
        self.udp_port = parse_positive(lookup(ENV_UDP_PORT), self.udp_port);
        self.max_datagram_bytes =
            parse_positive(lookup(ENV_MAX_DATAGRAM_BYTES), self.max_datagram_bytes);
        self
    }
}

fn parse_positive<T>(raw: Option<String>, fallback: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(fallback)
}
