//! Replay a capture through the engine and print where it ends up.

use crate::capture;
use crate::commands::{CaptureArgs, settings_for};
use crate::error::CliError;
use crate::output;
use anyhow::Result;
use racing_timing_engine::TimingEngine;
use tracing::info;

pub fn execute(args: &CaptureArgs, json: bool) -> Result<()> {
    let data = std::fs::read(&args.file).map_err(|source| CliError::Capture {
        path: args.file.clone(),
        source,
    })?;

    let mut engine = TimingEngine::new(settings_for(args.year));
    let mut datagrams = 0u64;
    for datagram in capture::datagrams(&data) {
        engine.apply(datagram?);
        datagrams = datagrams.saturating_add(1);
    }
    info!(
        datagrams,
        drivers = engine.standings().len(),
        events = engine.events().len(),
        "capture replayed"
    );

    output::print_standings(&engine, json)?;
    if !json {
        output::print_classification(&engine, false)?;
    }
    Ok(())
}
