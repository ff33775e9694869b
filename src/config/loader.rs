//! Configuration file discovery and loading.
//!
//! The first file found wins; files are not merged:
//! 1. `--config <path>` (must exist)
//! 2. `./gearlog-setup.yml`
//! 3. `~/.gearlog-setup/config.yml`
//!
//! With no file at all, built-in defaults are used.

use crate::config::schema::SetupConfig;
use crate::config::validator::validate;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "gearlog-setup.yml";

/// Per-user state directory: `~/.gearlog-setup`.
pub fn user_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gearlog-setup"))
}

/// Default log file: `~/.gearlog-setup/setup.log`.
pub fn default_log_file() -> Option<PathBuf> {
    user_dir().map(|dir| dir.join("setup.log"))
}

/// Find the config file to load, if any.
///
/// An explicit path is returned as-is so a missing file is reported
/// instead of silently falling back to defaults.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }

    let user = user_dir()?.join("config.yml");
    if user.is_file() {
        Some(user)
    } else {
        None
    }
}

/// Parse YAML content into a [`SetupConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load, expand and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| SetupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut config = parse_config(&content, path)?;
    config.install_dir = config.install_dir.map(|p| expand_home(&p));
    config.log_file = config.log_file.map(|p| expand_home(&p));
    validate(&config)?;
    Ok(config)
}

/// Discover and load configuration, falling back to defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<SetupConfig> {
    match discover(explicit, cwd) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(SetupConfig::default())
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
