//! f1timing - live timing for F1 UDP telemetry
//!
//! Listens for the game's UDP broadcast and keeps a live timing board, or
//! works offline on captures recorded with `listen --record`.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod capture;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CaptureArgs, ListenArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "f1timing")]
#[command(about = "Live timing for F1 2020-2024 UDP telemetry")]
#[command(version)]
#[command(long_about = "
f1timing decodes the UDP telemetry broadcast by F1 2020, 2022, 2023 and 2024
and reconstructs lap and sector times, gaps, tyre history, penalties and
driver status for every car.

The game year defaults to F1TIMING_GAME_YEAR, else 2024.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for live telemetry
    Listen(ListenArgs),

    /// Print every packet of a capture as a JSON line
    Decode(CaptureArgs),

    /// Replay a capture and print the resulting standings
    Standings(CaptureArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let fallback = format!(
        "f1timing={level},racing_timing_wire={level},racing_timing_config={level},racing_timing_engine={level}"
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, cli.json).await,
        Commands::Decode(args) => commands::decode::execute(args),
        Commands::Standings(args) => commands::standings::execute(args, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racing_timing_wire::GameYear;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_listen_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["f1timing", "listen"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert_eq!(args.port, None);
        assert_eq!(args.year, None);
        assert!(args.mappings.is_none());
        Ok(())
    }

    #[test]
    fn parse_listen_with_options() -> TestResult {
        let cli = Cli::try_parse_from([
            "f1timing", "-vv", "listen", "--port", "20888", "--year", "2022", "--mappings",
            "league.yaml", "--league", "Sunday",
        ])?;
        assert_eq!(cli.verbose, 2);
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert_eq!(args.port, Some(20888));
        assert_eq!(args.year, Some(GameYear::Y2022));
        assert_eq!(args.league.as_deref(), Some("Sunday"));
        Ok(())
    }

    #[test]
    fn league_requires_mappings() {
        assert!(Cli::try_parse_from(["f1timing", "listen", "--league", "Sunday"]).is_err());
    }

    #[test]
    fn unsupported_year_is_rejected() {
        assert!(Cli::try_parse_from(["f1timing", "decode", "cap.bin", "--year", "2021"]).is_err());
    }

    #[test]
    fn parse_standings_json() -> TestResult {
        let cli = Cli::try_parse_from(["f1timing", "standings", "cap.bin", "--json", "-y", "2023"])?;
        assert!(cli.json);
        let Commands::Standings(args) = cli.command else {
            return Err("expected standings".into());
        };
        assert_eq!(args.file, std::path::PathBuf::from("cap.bin"));
        assert_eq!(args.year, Some(GameYear::Y2023));
        Ok(())
    }
}
