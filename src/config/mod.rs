//! Configuration loading and application env files.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Line-preserving `.env` editing in [`env_file`]
//!
//! # Example
//!
//! ```
//! use gearlog_setup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("gearlog-setup.yml"), "branch: main").unwrap();
//!
//! let config = load_config(None, temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.branch, Some("main".to_string()));
//! ```

pub mod env_file;
pub mod loader;
pub mod schema;
pub mod validator;

pub use env_file::{EnvFile, EnvSource, BASIC_BACKEND_ENV};
pub use loader::{
    default_log_file, discover, expand_home, load_config, load_config_file, parse_config,
    user_dir, PROJECT_CONFIG_FILE,
};
pub use schema::{DatabaseConfig, SetupConfig, DEFAULT_REPO_URL};
pub use validator::{effective_requirements, validate, validate_config, ValidationError};
