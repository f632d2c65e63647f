//! Dump a capture as one JSON line per decoded packet.

use crate::capture;
use crate::commands::{CaptureArgs, settings_for};
use crate::error::CliError;
use anyhow::Result;
use racing_timing_wire::{Demultiplexer, Packet, PacketHeader};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

#[derive(Serialize)]
struct FrameLine<'a> {
    header: &'a PacketHeader,
    packet: &'a Packet,
}

pub fn execute(args: &CaptureArgs) -> Result<()> {
    let year = settings_for(args.year).game_year;
    let data = std::fs::read(&args.file).map_err(|source| CliError::Capture {
        path: args.file.clone(),
        source,
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut decoded = 0u64;
    let mut skipped = 0u64;
    for datagram in capture::datagrams(&data) {
        for step in Demultiplexer::new(year, datagram?) {
            match step.frame {
                Some(frame) => {
                    let line = FrameLine {
                        header: &frame.header,
                        packet: &frame.packet,
                    };
                    serde_json::to_writer(&mut out, &line)?;
                    writeln!(out)?;
                    decoded = decoded.saturating_add(1);
                }
                None => {
                    debug!(kind = ?step.kind, consumed = step.consumed, reason = ?step.skipped, "skipped bytes");
                    skipped = skipped.saturating_add(1);
                }
            }
        }
    }
    out.flush()?;
    info!(%year, decoded, skipped, "capture decoded");
    Ok(())
}
