//! gearlog-setup - Bootstrap a GearLog development environment.
//!
//! Installs the toolchain GearLog needs (PHP, Composer, MySQL, Node.js)
//! through the host's package manager, then clones the repository and sets
//! up the Laravel backend and the React frontend.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and `.env` editing
//! - [`error`] - Error types and result aliases
//! - [`project`] - Clone, backend, database and frontend setup
//! - [`requirements`] - Tool probing, install strategies and the dependency resolver
//! - [`shell`] - Command execution, platform detection and Ctrl-C handling
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use gearlog_setup::requirements::{builtin_requirements, Version};
//!
//! let node = builtin_requirements()
//!     .into_iter()
//!     .find(|r| r.name == "node")
//!     .unwrap();
//!
//! let installed = Version::parse_tolerant("v16.14.0").unwrap();
//! assert!(!installed.meets(node.minimum));
//! assert!(Version::parse_tolerant("v20.1.0").unwrap().meets(node.minimum));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod project;
pub mod requirements;
pub mod shell;
pub mod ui;

pub use error::{Result, SetupError};
