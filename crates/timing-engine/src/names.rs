//! Display-name resolution.
//!
//! A league mapping file wins over everything. Without a match, offline
//! (AI or local) drivers keep their telemetry name. Online players whose name
//! the game hides, either behind a shared placeholder or through the 2023+
//! privacy flag, get a "Team (number)" label.

use racing_timing_config::NameMappingSet;
use racing_timing_wire::GameYear;
use racing_timing_wire::appendix::Team;
use racing_timing_wire::packets::Participant;
use std::collections::HashMap;

/// Multiplayer placeholder detection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// Not looked for yet this session.
    #[default]
    Pending,
    /// Looked for and none found.
    Unmatched,
    Name(String),
}

impl Placeholder {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Placeholder::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub mapped_name: Option<String>,
    pub tag: Option<String>,
}

/// Network humans are flagged through the driver id.
pub fn is_online_player(year: GameYear, driver_id: u8) -> bool {
    match year {
        GameYear::Y2020 | GameYear::Y2022 => driver_id >= 100,
        GameYear::Y2023 | GameYear::Y2024 => driver_id == 255,
    }
}

/// Label shown for a driver whose real name is not available.
pub fn anonymous_label(year: GameYear, team: Team, race_number: u8) -> String {
    format!("{} ({race_number})", team.display_name(year))
}

pub fn resolve(
    year: GameYear,
    mappings: Option<&NameMappingSet>,
    placeholder: &Placeholder,
    participant: &Participant,
) -> ResolvedName {
    let team = Team::from_id(participant.team_id);
    if let Some(mapping) = mappings.and_then(|set| set.lookup(team, participant.race_number)) {
        return ResolvedName {
            name: mapping.name.clone(),
            mapped_name: Some(mapping.name.clone()),
            tag: mapping.tag.clone(),
        };
    }

    let hidden = is_online_player(year, participant.driver_id)
        && (placeholder.as_name() == Some(participant.name.as_str())
            || !participant.show_online_names);
    let name = if hidden {
        anonymous_label(year, team, participant.race_number)
    } else {
        participant.name.clone()
    };
    ResolvedName {
        name,
        mapped_name: None,
        tag: None,
    }
}

/// The name most present cars share, if at least two do. Ties go to the
/// name seen first in slot order.
pub fn detect_placeholder<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.into_iter().filter(|n| !n.is_empty()) {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for name in order {
        let count = counts.get(name).copied().unwrap_or(0);
        if count >= 2 && best.is_none_or(|(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use racing_timing_config::DriverNameMapping;

    fn participant(name: &str, driver_id: u8, team_id: u8, race_number: u8) -> Participant {
        Participant {
            name: name.to_string(),
            driver_id,
            team_id,
            race_number,
            show_online_names: true,
            ..Participant::default()
        }
    }

    fn league() -> NameMappingSet {
        NameMappingSet {
            league_name: "Sunday League".to_string(),
            mappings: vec![
                DriverNameMapping {
                    name: "Alex Stone".to_string(),
                    team: Some(Team::Ferrari),
                    driver_number: 16,
                    tag: Some("STO".to_string()),
                },
                DriverNameMapping {
                    name: "Sam Reyes".to_string(),
                    team: None,
                    driver_number: 44,
                    tag: None,
                },
            ],
        }
    }

    #[test]
    fn mapping_wins_over_telemetry_name() {
        let set = league();
        let p = participant("Player", 255, 1, 16);
        let r = resolve(GameYear::Y2024, Some(&set), &Placeholder::Pending, &p);
        assert_eq!(r.name, "Alex Stone");
        assert_eq!(r.mapped_name.as_deref(), Some("Alex Stone"));
        assert_eq!(r.tag.as_deref(), Some("STO"));
    }

    #[test]
    fn number_only_mapping_matches_any_team() {
        let set = league();
        let p = participant("Player", 255, 8, 44);
        let r = resolve(GameYear::Y2023, Some(&set), &Placeholder::Pending, &p);
        assert_eq!(r.name, "Sam Reyes");
        assert_eq!(r.tag, None);
    }

    #[test]
    fn ai_keeps_telemetry_name() {
        let p = participant("VERSTAPPEN", 9, 2, 1);
        let r = resolve(GameYear::Y2024, None, &Placeholder::Name("VERSTAPPEN".into()), &p);
        assert_eq!(r.name, "VERSTAPPEN");
    }

    #[test]
    fn placeholder_name_becomes_team_label() {
        let p = participant("Player", 110, 6, 22);
        let r = resolve(GameYear::Y2022, None, &Placeholder::Name("Player".into()), &p);
        assert_eq!(r.name, "Alpha Tauri (22)");
        let r = resolve(GameYear::Y2022, None, &Placeholder::Unmatched, &p);
        assert_eq!(r.name, "Player");
    }

    #[test]
    fn hidden_online_name_2024() {
        let mut p = participant("gamertag", 255, 6, 30);
        p.show_online_names = false;
        let r = resolve(GameYear::Y2024, None, &Placeholder::Pending, &p);
        assert_eq!(r.name, "RB (30)");
    }

    #[test]
    fn online_marker_per_year() {
        assert!(is_online_player(GameYear::Y2020, 100));
        assert!(!is_online_player(GameYear::Y2022, 99));
        assert!(is_online_player(GameYear::Y2023, 255));
        assert!(!is_online_player(GameYear::Y2024, 100));
    }

    #[test]
    fn placeholder_needs_two_occurrences() {
        assert_eq!(detect_placeholder(["A", "B", "C"]), None);
        assert_eq!(detect_placeholder(["A", "Player", "B", "Player"]), Some("Player".to_string()));
        assert_eq!(detect_placeholder(["", "", "", "X"]), None);
    }

    #[test]
    fn placeholder_tie_goes_to_first_seen() {
        assert_eq!(detect_placeholder(["B", "A", "A", "B"]), Some("B".to_string()));
        assert_eq!(detect_placeholder(["B", "A", "A", "B", "A"]), Some("A".to_string()));
    }
}
