//! Configuration schema definitions.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Repository cloned when neither the config nor `--repo` names one.
pub const DEFAULT_REPO_URL: &str = "https://github.com/ricardoguimaraes2021/GearLog.git";

/// Root structure of `gearlog-setup.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Git URL of the GearLog repository.
    pub repo_url: String,

    /// Branch to clone. Uses the remote default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Where the repository is cloned. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Log file path. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Defaults offered by the database prompts.
    pub database: DatabaseConfig,

    /// Minimum version overrides keyed by tool name (`php: "8.2"`).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub requirements: HashMap<String, String>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch: None,
            install_dir: None,
            log_file: None,
            database: DatabaseConfig::default(),
            requirements: HashMap::new(),
        }
    }
}

/// Database prompt defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub username: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "gearlog".to_string(),
            username: "root".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: SetupConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SetupConfig::default());
        assert_eq!(config.repo_url, DEFAULT_REPO_URL);
        assert_eq!(config.database.name, "gearlog");
        assert_eq!(config.database.username, "root");
    }

    #[test]
    fn partial_database_section_keeps_other_default() {
        let config: SetupConfig = serde_yaml::from_str("database:\n  name: inventory\n").unwrap();
        assert_eq!(config.database.name, "inventory");
        assert_eq!(config.database.username, "root");
    }

    #[test]
    fn parses_full_document() {
        let yaml = r#"
repo_url: git@example.com:team/gearlog.git
branch: develop
install_dir: ~/code/gearlog
log_file: /tmp/setup.log
database:
  name: gl
  username: app
requirements:
  php: "8.2"
  node: "20"
"#;
        let config: SetupConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.branch.as_deref(), Some("develop"));
        assert_eq!(config.install_dir, Some(PathBuf::from("~/code/gearlog")));
        assert_eq!(config.requirements["php"], "8.2");
        assert_eq!(config.requirements["node"], "20");
    }

    #[test]
    fn serializing_defaults_omits_optional_fields() {
        let yaml = serde_yaml::to_string(&SetupConfig::default()).unwrap();
        assert!(yaml.contains("repo_url"));
        assert!(!yaml.contains("branch"));
        assert!(!yaml.contains("requirements"));
    }
}
