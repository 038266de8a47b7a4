//! Player rosters stored as JSON: `{"Alice": ["Tank", "Healer"], ...}`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::{Result, RoleFlowError};
use crate::model::Agent;

/// Every entry of the roster object in file order. Repeated names are kept
/// so that network building can reject them.
struct Roster(Vec<Agent>);

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = Roster;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping player names to role lists")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Roster, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut agents = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, preferences)) = map.next_entry::<String, Vec<String>>()? {
                    agents.push(Agent { id, preferences });
                }
                Ok(Roster(agents))
            }
        }

        deserializer.deserialize_map(RosterVisitor)
    }
}

/// Parse a roster. Players come back in file order, duplicates included.
pub fn parse_agents(content: &str) -> Result<Vec<Agent>> {
    let Roster(agents) = serde_json::from_str(content)?;
    Ok(agents)
}

pub fn load_agents(path: &Path) -> Result<Vec<Agent>> {
    let content = fs::read_to_string(path)?;
    let agents = parse_agents(&content).map_err(|e| RoleFlowError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), players = agents.len(), "roster loaded");
    Ok(agents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::compute_assignment;
    use crate::model::Category;
    use tempfile::TempDir;

    #[test]
    fn test_parse_roster() {
        let agents = parse_agents(
            r#"{
                "Zed": ["Melee"],
                "Alice": ["Tank", "Healer"],
                "Bob": []
            }"#,
        )
        .unwrap();

        let ids: Vec<_> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["Zed", "Alice", "Bob"]);
        assert_eq!(agents[1].preferences, ["Tank", "Healer"]);
        assert!(agents[2].preferences.is_empty());
    }

    #[test]
    fn test_repeated_player_is_kept_and_rejected() {
        let agents = parse_agents(r#"{"A": ["X"], "A": ["Y"]}"#).unwrap();
        assert_eq!(agents, vec![Agent::new("A", ["X"]), Agent::new("A", ["Y"])]);

        let categories = vec![Category::new("X", 1), Category::new("Y", 1)];
        match compute_assignment(&agents, &categories) {
            Err(RoleFlowError::DuplicateAgent { agent }) => assert_eq!(agent, "A"),
            other => panic!("unexpected result: {:?}", other.map(|(a, _)| a)),
        }
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(matches!(
            parse_agents(r#"["Alice", "Bob"]"#),
            Err(RoleFlowError::Json(_))
        ));
        assert!(parse_agents(r#"{"Alice": "Tank"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("players.json");
        fs::write(&path, r#"{"Alice": ["Tank"]}"#)?;

        let agents = load_agents(&path)?;
        assert_eq!(agents, vec![Agent::new("Alice", ["Tank"])]);

        fs::write(&path, "{not json")?;
        assert!(matches!(
            load_agents(&path),
            Err(RoleFlowError::ConfigParse { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_agents(Path::new("/nonexistent/players.json")).unwrap_err();
        assert!(matches!(err, RoleFlowError::Io(_)));
    }
}
