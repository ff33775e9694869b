//! External tool requirements: probing, install strategies and the resolver.
//!
//! # Modules
//!
//! - [`version`] - Tolerant version parsing and comparison
//! - [`registry`] - The tools GearLog needs and where to get them
//! - [`probe`] - Locating executables and reading their versions
//! - [`host`] - Platform, package manager and privilege detection
//! - [`strategy`] - Platform-keyed install strategies
//! - [`installer`] - Running install steps
//! - [`resolver`] - `ensure(tool)`: probe, install, re-probe
//! - [`status`] - Status, outcome and report types

pub mod host;
pub mod installer;
pub mod probe;
pub mod registry;
pub mod resolver;
pub mod status;
pub mod strategy;
pub mod version;

pub use host::{Host, PackageManager};
pub use installer::{InstallResult, Installer, SystemInstaller};
pub use probe::{probe, SystemLocator, ToolLocator};
pub use registry::{apply_overrides, builtin_requirements, Platform, ToolRequirement};
pub use resolver::DependencyResolver;
pub use status::{InstallDetail, InstallOutcome, InstallReport, ToolStatus};
pub use strategy::{InstallPlan, InstallStep, Strategy, StrategyTable};
pub use version::Version;
