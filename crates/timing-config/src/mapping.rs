//! Driver name mappings.
//!
//! A mapping file holds a list of leagues, each with its own table of
//! `{name, team, number, tag}` entries. Field names follow the files written
//! by earlier tools (`LeagueName`, `Mappings`, `DriverNumber`); the team is
//! accepted as a name (`"RedBull"`) or as the numeric team id.

use crate::error::ConfigError;
use racing_timing_wire::appendix::Team;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One league's name table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMappingSet {
    #[serde(rename = "LeagueName", default)]
    pub league_name: String,
    #[serde(rename = "Mappings", default)]
    pub mappings: Vec<DriverNameMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverNameMapping {
    #[serde(rename = "Name")]
    pub name: String,
    /// `None` matches the number in any team.
    #[serde(rename = "Team", default, deserialize_with = "team_field")]
    pub team: Option<Team>,
    #[serde(rename = "DriverNumber", alias = "DriverNr")]
    pub driver_number: u8,
    #[serde(rename = "Tag", default)]
    pub tag: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TeamRepr {
    Id(u8),
    Name(Team),
}

fn team_field<'de, D>(deserializer: D) -> Result<Option<Team>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<TeamRepr>::deserialize(deserializer)?;
    Ok(repr.map(|r| match r {
        TeamRepr::Id(id) => Team::from_id(id),
        TeamRepr::Name(team) => team,
    }))
}

impl NameMappingSet {
    /// Team and number first, then a number-only entry.
    pub fn lookup(&self, team: Team, driver_number: u8) -> Option<&DriverNameMapping> {
        self.mappings
            .iter()
            .find(|m| m.team == Some(team) && m.driver_number == driver_number)
            .or_else(|| {
                self.mappings
                    .iter()
                    .find(|m| m.team.is_none() && m.driver_number == driver_number)
            })
    }

    /// Reject numbers outside 1..=99 and repeated team+number pairs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for m in &self.mappings {
            if !(1..=99).contains(&m.driver_number) {
                return Err(ConfigError::InvalidDriverNumber {
                    league: self.league_name.clone(),
                    name: m.name.clone(),
                    number: m.driver_number,
                });
            }
            if !seen.insert((m.team, m.driver_number)) {
                return Err(ConfigError::DuplicateMapping {
                    league: self.league_name.clone(),
                    team: m.team,
                    number: m.driver_number,
                });
            }
        }
        Ok(())
    }
}

/// Serialization used for a mapping file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    Json,
    Yaml,
}

impl MappingFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(MappingFormat::Json),
            "yaml" | "yml" => Ok(MappingFormat::Yaml),
            _ => Err(ConfigError::UnknownExtension { extension }),
        }
    }
}

/// Parse and validate every league in `text`.
pub fn parse_mapping_sets(
    text: &str,
    format: MappingFormat,
) -> Result<Vec<NameMappingSet>, ConfigError> {
    let sets: Vec<NameMappingSet> = match format {
        MappingFormat::Json => serde_json::from_str(text)?,
        MappingFormat::Yaml => serde_yaml::from_str(text)?,
    };
    for set in &sets {
        set.validate()?;
    }
    Ok(sets)
}

/// Load a mapping file, choosing the parser by extension.
pub fn load_mapping_sets(path: &Path) -> Result<Vec<NameMappingSet>, ConfigError> {
    let format = MappingFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sets = parse_mapping_sets(&text, format)?;
    debug!(path = %path.display(), leagues = sets.len(), "loaded name mappings");
    Ok(sets)
}

/// Pick a league by name (case-insensitive), or the first one when `league`
/// is `None`.
pub fn select_league(sets: Vec<NameMappingSet>, league: Option<&str>) -> Option<NameMappingSet> {
    match league {
        Some(name) => sets
            .into_iter()
            .find(|s| s.league_name.eq_ignore_ascii_case(name)),
        None => sets.into_iter().next(),
    }
}
