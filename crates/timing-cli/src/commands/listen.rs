//! Live listener: UDP socket into the timing engine.

use crate::capture;
use crate::commands::{ListenArgs, settings_for};
use crate::error::CliError;
use crate::output;
use anyhow::{Context, Result, anyhow};
use racing_timing_config::{load_mapping_sets, select_league};
use racing_timing_engine::{Change, TimingEngine};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tracing::{debug, info, trace};

/// Largest payload a UDP datagram can carry.
const MAX_UDP_DATAGRAM: usize = 65_536;
const RECV_POLL: Duration = Duration::from_millis(250);

pub async fn execute(args: &ListenArgs, json: bool) -> Result<()> {
    let mut settings = settings_for(args.year);
    if let Some(port) = args.port {
        settings.udp_port = port;
    }
    let mut engine = TimingEngine::new(settings.clone());

    if let Some(path) = &args.mappings {
        let sets = load_mapping_sets(path).map_err(CliError::from)?;
        if sets.is_empty() {
            return Err(CliError::NoLeagues.into());
        }
        let league = select_league(sets, args.league.as_deref())
            .ok_or_else(|| CliError::UnknownLeague(args.league.clone().unwrap_or_default()))?;
        info!(league = %league.league_name, drivers = league.mappings.len(), "name mappings loaded");
        engine.set_name_mappings(Some(league));
    }

    let bind_addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, settings.udp_port));
    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|source| CliError::Bind {
            addr: bind_addr,
            source,
        })?;
    info!(addr = %bind_addr, year = %settings.game_year, "listening for telemetry");

    let mut record = match &args.record {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create capture file '{}'", path.display())
        })?)),
        None => None,
    };

    let deadline = args
        .duration
        .and_then(|secs| Instant::now().checked_add(Duration::from_secs(secs.max(1))));
    let mut buf = vec![0u8; MAX_UDP_DATAGRAM];
    let mut received = 0u64;

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        let recv = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                info!("interrupted");
                break;
            }
            recv = tokio::time::timeout(RECV_POLL, socket.recv_from(&mut buf)) => recv,
        };
        let (len, source) = match recv {
            Ok(Ok(value)) => value,
            Ok(Err(error)) => return Err(anyhow!("receive failed: {error}")),
            Err(_elapsed) => continue,
        };
        let Some(datagram) = buf.get(..len) else {
            continue;
        };
        received = received.saturating_add(1);
        if let Some(out) = record.as_mut() {
            capture::write_datagram(out, datagram).context("failed to write capture")?;
        }

        let changes = engine.apply(datagram);
        if changes.is_empty() {
            continue;
        }
        debug!(from = %source, len, changes = changes.len(), "datagram applied");
        for change in &changes {
            trace!(?change, "change");
        }

        if changes.contains(&Change::Reset) {
            info!(session_uid = engine.session_uid(), "session reset");
        }
        if engine.take_udp_action() {
            output::print_standings(&engine, json)?;
        }
        if changes.contains(&Change::ClassificationAvailable) {
            output::print_standings(&engine, json)?;
            output::print_classification(&engine, json)?;
        }
    }

    if let Some(mut out) = record {
        out.flush().context("failed to flush capture")?;
    }
    info!(received, "listener stopped");
    Ok(())
}
