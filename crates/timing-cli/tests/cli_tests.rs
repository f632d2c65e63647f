//! Integration tests for the f1timing binary.
//!
//! Captures are assembled from the wire crate's packet fixtures and written
//! to a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use racing_timing_wire::GameYear;
use racing_timing_wire::fixtures::{HeaderFixture, lap_packet, session_packet};
use racing_timing_wire::packets::{LapEntry, SessionPacket};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn f1timing() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("f1timing")?)
}

fn write_capture(dir: &TempDir, datagrams: &[Vec<u8>]) -> Result<PathBuf, std::io::Error> {
    let mut bytes = Vec::new();
    for datagram in datagrams {
        let len = u32::try_from(datagram.len()).unwrap_or(u32::MAX);
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(datagram);
    }
    let path = dir.path().join("session.cap");
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn race_capture(dir: &TempDir) -> Result<PathBuf, std::io::Error> {
    let year = GameYear::Y2024;
    let h = HeaderFixture {
        session_time: 1.0,
        frame: 1,
        ..HeaderFixture::default()
    };
    let session = SessionPacket {
        track_id: 7,
        session_type: 15,
        total_laps: 3,
        ..SessionPacket::default()
    };
    let car = |position: u8| LapEntry {
        car_position: position,
        current_lap_num: 1,
        result_status: 2,
        driver_status: 4,
        ..LapEntry::default()
    };
    write_capture(
        dir,
        &[
            session_packet(year, &h, &session),
            lap_packet(year, &h, &[car(2), car(1)]),
        ],
    )
}

#[test]
fn decode_prints_one_line_per_packet() -> TestResult {
    let dir = TempDir::new()?;
    let path = race_capture(&dir)?;
    let output = f1timing()?
        .args(["decode", "--year", "2024"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: Value = serde_json::from_str(lines.first().ok_or("no first line")?)?;
    let kind = first.get("packet").and_then(|p| p.get("kind"));
    assert_eq!(kind.and_then(Value::as_str), Some("Session"));
    assert!(lines.last().is_some_and(|l| l.contains("\"kind\":\"Lap\"")));
    Ok(())
}

#[test]
fn standings_json_reports_roster() -> TestResult {
    let dir = TempDir::new()?;
    let path = race_capture(&dir)?;
    let output = f1timing()?
        .args(["standings", "--json", "--year", "2024"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&output)?;
    let track = report.get("session").and_then(|s| s.get("track_name"));
    assert_eq!(track.and_then(Value::as_str), Some("Silverstone"));
    let standings = report
        .get("standings")
        .and_then(Value::as_array)
        .ok_or("standings array")?;
    let ids: Vec<u64> = standings
        .iter()
        .filter_map(|d| d.get("id").and_then(Value::as_u64))
        .collect();
    assert_eq!(ids, vec![1, 0]);
    Ok(())
}

#[test]
fn standings_table_lists_drivers() -> TestResult {
    let dir = TempDir::new()?;
    let path = race_capture(&dir)?;
    f1timing()?
        .arg("standings")
        .arg(&path)
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Silverstone").and(predicate::str::contains("OnTrack")));
    Ok(())
}

#[test]
fn truncated_capture_exits_with_capture_code() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.cap");
    let mut bytes = 100u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 10]);
    std::fs::write(&path, bytes)?;
    f1timing()?
        .arg("decode")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("truncated"));
    Ok(())
}

#[test]
fn missing_capture_exits_with_capture_code() -> TestResult {
    let dir = TempDir::new()?;
    f1timing()?
        .arg("standings")
        .arg(dir.path().join("nope.cap"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to read capture"));
    Ok(())
}

#[test]
fn json_errors_are_machine_readable() -> TestResult {
    let dir = TempDir::new()?;
    let output = f1timing()?
        .args(["--json", "decode"])
        .arg(dir.path().join("nope.cap"))
        .assert()
        .code(3)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value.get("success").and_then(Value::as_bool), Some(false));
    Ok(())
}
