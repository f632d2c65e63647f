//! File-based loader tests.

use racing_timing_config::{ConfigError, load_mapping_sets, select_league};
use racing_timing_wire::appendix::Team;
use std::io::Write;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn loads_json_file_by_extension() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("namemappings.json");
    std::fs::write(
        &path,
        r#"[{"LeagueName":"KRF1 - 2","Mappings":[
            {"Team":null,"Name":"Leopard","DriverNumber":91},
            {"Team":null,"Name":"SimonLaui","DriverNumber":86}]}]"#,
    )?;
    let sets = load_mapping_sets(&path)?;
    let set = select_league(sets, Some("krf1 - 2")).ok_or("league missing")?;
    assert_eq!(set.lookup(Team::Williams, 86).map(|m| m.name.as_str()), Some("SimonLaui"));
    Ok(())
}

#[test]
fn loads_yaml_file_by_extension() -> TestResult {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    writeln!(file, "- LeagueName: Test")?;
    writeln!(file, "  Mappings:")?;
    writeln!(file, "    - {{ Name: Rookie, Team: Haas, DriverNumber: 20 }}")?;
    let sets = load_mapping_sets(file.path())?;
    assert_eq!(sets.len(), 1);
    let set = sets.first().ok_or("no league")?;
    assert_eq!(set.lookup(Team::Haas, 20).map(|m| m.name.as_str()), Some("Rookie"));
    Ok(())
}

#[test]
fn missing_file_reports_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.json");
    let err = load_mapping_sets(&path).err().ok_or("load should fail")?;
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
    Ok(())
}

#[test]
fn malformed_json_is_a_json_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"LeagueName\": ")?;
    assert!(matches!(load_mapping_sets(&path), Err(ConfigError::Json(_))));
    Ok(())
}
