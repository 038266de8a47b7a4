use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoleFlowError};
use crate::model::Category;
use crate::solver::PathSearch;

pub const CONFIG_FILE: &str = "roles.toml";

/// Roles used when no config file exists.
pub const DEFAULT_ROLES: &[(&str, i64)] = &[
    ("Tank", 2),
    ("Healer", 2),
    ("Ranged", 1),
    ("Caster", 1),
    ("Melee", 2),
];

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# role-flow configuration file

# Roles and how many players each one takes.
# A role set to 0 stays in the table but is never assigned.
[roles]
Tank = 2
Healer = 2
Ranged = 1
Caster = 1
Melee = 2

[solver]
# Shortest-path routine for each augmentation: "dijkstra" or "bellman-ford".
# Both give the same total cost.
algorithm = "dijkstra"
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Role name -> capacity. Iterated in name order.
    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, i64>,

    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub algorithm: PathSearch,
}

fn default_roles() -> BTreeMap<String, i64> {
    DEFAULT_ROLES
        .iter()
        .map(|(name, capacity)| (name.to_string(), *capacity))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            solver: SolverConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| RoleFlowError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Default config location inside `dir`
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Write the commented template to `path` unless a file is already there
    pub fn init(path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !path.exists() {
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path.to_path_buf())
    }

    /// Roles as build input, in name order.
    pub fn categories(&self) -> Vec<Category> {
        self.roles
            .iter()
            .map(|(name, capacity)| Category::new(name.clone(), *capacity))
            .collect()
    }

    /// Get a config value by dot-notation key (`roles.<name>`, `solver.algorithm`)
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "solver.algorithm" => Some(self.solver.algorithm.to_string()),
            _ => {
                let role = key.strip_prefix("roles.")?;
                self.roles.get(role).map(|c| c.to_string())
            }
        }
    }

    /// Set a config value by dot-notation key. Setting `roles.<name>` adds the
    /// role if it is new.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || RoleFlowError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        if key == "solver.algorithm" {
            self.solver.algorithm = match value.trim() {
                "dijkstra" => PathSearch::Dijkstra,
                "bellman-ford" => PathSearch::BellmanFord,
                _ => return Err(invalid()),
            };
            return Ok(());
        }

        match key.strip_prefix("roles.") {
            Some(role) if !role.is_empty() => {
                let capacity: i64 = value.trim().parse().map_err(|_| invalid())?;
                if capacity < 0 {
                    return Err(invalid());
                }
                self.roles.insert(role.to_string(), capacity);
                Ok(())
            }
            _ => Err(RoleFlowError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .roles
            .iter()
            .map(|(name, capacity)| (format!("roles.{name}"), capacity.to_string()))
            .collect();
        entries.push((
            "solver.algorithm".to_string(),
            self.solver.algorithm.to_string(),
        ));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_matches_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.roles, defaults.roles);
        assert_eq!(parsed.solver.algorithm, PathSearch::Dijkstra);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&Config::path(temp.path())).unwrap();
        assert_eq!(config.roles.get("Tank"), Some(&2));
        assert_eq!(config.categories().len(), DEFAULT_ROLES.len());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
[solver]
algorithm = "bellman-ford"
"#,
        )
        .unwrap();
        assert_eq!(config.solver.algorithm, PathSearch::BellmanFord);
        assert_eq!(config.roles.len(), DEFAULT_ROLES.len());

        let config = Config::parse("[roles]\nScout = 3\n").unwrap();
        assert_eq!(config.solver.algorithm, PathSearch::Dijkstra);
        assert_eq!(config.categories(), vec![Category::new("Scout", 3)]);
    }

    #[test]
    fn test_parse_error_carries_path() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[roles\nTank = ")?;

        match Config::load(&path) {
            Err(RoleFlowError::ConfigParse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_init_then_save_and_reload() -> Result<()> {
        let temp = TempDir::new()?;
        let path = Config::path(&temp.path().join("nested"));

        Config::init(&path)?;
        assert!(path.exists());

        let mut config = Config::load(&path)?;
        config.set("roles.Bard", "1")?;
        config.set("roles.Tank", "0")?;
        config.save(&path)?;

        let reloaded = Config::load(&path)?;
        assert_eq!(reloaded.get("roles.Bard").as_deref(), Some("1"));
        assert_eq!(reloaded.get("roles.Tank").as_deref(), Some("0"));
        Ok(())
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("solver.algorithm", "bellman-ford").unwrap();
        assert_eq!(
            config.get("solver.algorithm").as_deref(),
            Some("bellman-ford")
        );

        assert!(matches!(
            config.set("solver.algorithm", "simplex"),
            Err(RoleFlowError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("roles.Tank", "-1"),
            Err(RoleFlowError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("roster.size", "3"),
            Err(RoleFlowError::ConfigKeyNotFound { .. })
        ));
        assert_eq!(config.get("roles.Nope"), None);
    }

    #[test]
    fn test_list_includes_every_key() {
        let config = Config::default();
        let keys: Vec<_> = config.list().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"roles.Healer".to_string()));
        assert_eq!(keys.last().map(String::as_str), Some("solver.algorithm"));
        assert_eq!(keys.len(), DEFAULT_ROLES.len() + 1);
    }
}
