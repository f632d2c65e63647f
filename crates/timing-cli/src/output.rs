//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use racing_timing_engine::{ClassificationEntry, DriverSlot, SessionEvent, SessionInfo, TimingEngine};
use serde::Serialize;
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "causes": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Everything the engine knows at one point in time.
#[derive(Serialize)]
pub struct Report<'a> {
    pub session_uid: u64,
    pub session: &'a SessionInfo,
    pub standings: Vec<&'a DriverSlot>,
    pub classification: Option<&'a [ClassificationEntry]>,
    pub events: &'a [SessionEvent],
}

impl<'a> Report<'a> {
    pub fn of(engine: &'a TimingEngine) -> Self {
        Self {
            session_uid: engine.session_uid(),
            session: engine.session(),
            standings: engine.standings(),
            classification: engine.classification(),
            events: engine.events(),
        }
    }
}

/// `m:ss.mmm`, or `-` when no time is set.
pub fn lap_time(ms: u32) -> String {
    if ms == 0 {
        return "-".to_string();
    }
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}

/// Gap column: race gaps below zero count laps down.
fn gap(driver: &DriverSlot, qualifying: bool) -> String {
    if driver.position == 1 {
        return "Leader".to_string();
    }
    if !qualifying && driver.delta_to_leader < 0.0 {
        return format!("+{:.0} L", -driver.delta_to_leader);
    }
    format!("+{:.3}", driver.delta_to_leader)
}

/// Print the live standings.
pub fn print_standings(engine: &TimingEngine, json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Report::of(engine))?);
        return Ok(());
    }
    let session = engine.session();
    let qualifying = session.is_qualifying_mode();
    println!(
        "{} {:?}, lap {}/{}",
        session.track_name.bold(),
        session.session_type,
        session.current_lap,
        session.total_laps
    );
    let header = format!(
        "{:>3}  {:>3}  {:<24} {:<14} {:>4}  {:>9}  {:>9}  {:<10}",
        "Pos", "No", "Driver", "Team", "Lap", "Best", "Gap", "Status"
    );
    println!("{}", header.bold());
    let year = engine.year();
    for driver in engine.standings() {
        let status = format!("{:?}", driver.status);
        println!(
            "{:>3}  {:>3}  {:<24} {:<14} {:>4}  {:>9}  {:>9}  {:<10}",
            driver.position,
            driver.race_number,
            driver.name,
            driver.team.display_name(year),
            driver.lap_number,
            lap_time(driver.fastest_lap.lap_ms),
            gap(driver, qualifying),
            status,
        );
    }
    Ok(())
}

/// Print the final classification, if the game has sent one.
pub fn print_classification(engine: &TimingEngine, json: bool) -> serde_json::Result<()> {
    let Some(entries) = engine.classification() else {
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    println!("{}", "Final classification".bold());
    for entry in entries {
        let name = engine
            .driver(entry.car_index)
            .map_or("?", |d| d.name.as_str());
        let stints: Vec<String> = entry
            .tyre_stints
            .iter()
            .map(|s| format!("{:?}", s.visual))
            .collect();
        println!(
            "{:>3}  {:<24} {:>3} pts  {:>9.3}  {}",
            entry.position,
            name,
            entry.points,
            entry.best_lap_time_s,
            stints.join(" "),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lap_time_formats_minutes_and_millis() {
        assert_eq!(lap_time(0), "-");
        assert_eq!(lap_time(90_000), "1:30.000");
        assert_eq!(lap_time(61_005), "1:01.005");
        assert_eq!(lap_time(59_999), "0:59.999");
    }

    #[test]
    fn gap_shows_laps_down_in_races() {
        let mut driver = DriverSlot::new(3);
        driver.position = 4;
        driver.delta_to_leader = -2.0;
        assert_eq!(gap(&driver, false), "+2 L");
        driver.delta_to_leader = 1.25;
        assert_eq!(gap(&driver, false), "+1.250");
        driver.position = 1;
        assert_eq!(gap(&driver, true), "Leader");
    }
}
