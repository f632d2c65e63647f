//! Subcommand arguments and dispatch.

pub mod decode;
pub mod listen;
pub mod standings;

use clap::Args;
use racing_timing_config::EngineSettings;
use racing_timing_wire::GameYear;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// UDP port to bind (default from F1TIMING_UDP_PORT, else 20777)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Game year of the incoming packets
    #[arg(short, long)]
    pub year: Option<GameYear>,

    /// Driver name-mapping file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub mappings: Option<PathBuf>,

    /// League to use from the mapping file (first one if omitted)
    #[arg(short, long, requires = "mappings")]
    pub league: Option<String>,

    /// Also write every received datagram to this capture file
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Stop after this many seconds
    #[arg(long)]
    pub duration: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct CaptureArgs {
    /// Capture file of length-prefixed datagrams
    pub file: PathBuf,

    /// Game year of the captured packets
    #[arg(short, long)]
    pub year: Option<GameYear>,
}

/// Environment settings with the command-line year applied.
pub fn settings_for(year: Option<GameYear>) -> EngineSettings {
    let mut settings = EngineSettings::from_env();
    if let Some(year) = year {
        settings.game_year = year;
    }
    settings
}
