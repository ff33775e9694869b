//! Tool requirement definitions.
//!
//! Defines which external tools GearLog needs, the minimum version of each,
//! how to ask the tool for its version, and which package provides it on
//! every supported package manager.

use crate::requirements::strategy::{composer_installer_plan, InstallPlan};
use crate::requirements::version::Version;
use crate::requirements::Host;
use std::collections::HashMap;

/// Platform family used to pick an install strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Human-readable name for messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::MacOS => "macOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        }
    }
}

/// Package names per package manager. Empty means "not available there".
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    pub brew: &'static [&'static str],
    pub apt: &'static [&'static str],
    /// Used for both dnf and yum.
    pub rpm: &'static [&'static str],
    pub winget: Option<&'static str>,
    pub choco: Option<&'static str>,
    /// Script that configures an apt repository before install.
    pub apt_repo_script: Option<&'static str>,
    /// Script that configures an rpm repository before install.
    pub rpm_repo_script: Option<&'static str>,
}

/// Service started after a successful install.
#[derive(Debug, Clone)]
pub struct ServiceStart {
    /// Homebrew service name (`brew services start <name>`).
    pub brew_service: &'static str,
    /// systemd unit (`systemctl start <unit>`).
    pub systemd_unit: &'static str,
}

/// A tool requirement: what must be on PATH and at which version.
#[derive(Debug, Clone)]
pub struct ToolRequirement {
    /// Registry key (e.g., "php", "node").
    pub name: &'static str,
    /// Display name (e.g., "Node.js").
    pub display_name: &'static str,
    /// Executable looked up on PATH.
    pub command: &'static str,
    /// Arguments that make the executable print its version.
    pub version_args: &'static [&'static str],
    /// Minimum acceptable version.
    pub minimum: Version,
    /// Packages providing the tool.
    pub packages: PackageSet,
    /// Service to start once installed.
    pub service: Option<ServiceStart>,
    /// Plan used when no package manager can provide the tool.
    pub fallback: Option<fn(&Host) -> Option<InstallPlan>>,
    /// Where to download the tool manually.
    pub download_url: &'static str,
}

impl ToolRequirement {
    /// Label used in summaries, e.g. "PHP 8.3+".
    pub fn label(&self) -> String {
        if self.minimum == Version::new(0, 0) {
            self.display_name.to_string()
        } else {
            format!("{} {}+", self.display_name, self.minimum)
        }
    }

    /// Guidance shown when the tool cannot be installed automatically.
    pub fn manual_hint(&self) -> String {
        format!(
            "Please install {} manually from: {}",
            self.label(),
            self.download_url
        )
    }
}

/// The tools GearLog needs, in install order.
pub fn builtin_requirements() -> Vec<ToolRequirement> {
    vec![
        ToolRequirement {
            name: "php",
            display_name: "PHP",
            command: "php",
            version_args: &["-v"],
            minimum: Version::new(8, 3),
            packages: PackageSet {
                brew: &["php@8.3"],
                apt: &[
                    "php8.3",
                    "php8.3-cli",
                    "php8.3-mysql",
                    "php8.3-xml",
                    "php8.3-mbstring",
                    "php8.3-curl",
                    "php8.3-zip",
                ],
                rpm: &[
                    "php83",
                    "php83-cli",
                    "php83-mysqlnd",
                    "php83-xml",
                    "php83-mbstring",
                    "php83-curl",
                    "php83-zip",
                ],
                winget: Some("PHP.PHP.8.3"),
                choco: Some("php"),
                ..Default::default()
            },
            service: None,
            fallback: None,
            download_url: "https://windows.php.net/download/",
        },
        ToolRequirement {
            name: "composer",
            display_name: "Composer",
            command: "composer",
            version_args: &["--version"],
            minimum: Version::new(2, 0),
            packages: PackageSet {
                brew: &["composer"],
                choco: Some("composer"),
                ..Default::default()
            },
            service: None,
            fallback: Some(composer_installer_plan),
            download_url: "https://getcomposer.org/download/",
        },
        ToolRequirement {
            name: "mysql",
            display_name: "MySQL",
            command: "mysql",
            version_args: &["--version"],
            minimum: Version::new(5, 7),
            packages: PackageSet {
                brew: &["mysql"],
                apt: &["mysql-server"],
                rpm: &["mysql-server"],
                winget: Some("Oracle.MySQL"),
                choco: Some("mysql"),
                ..Default::default()
            },
            service: Some(ServiceStart {
                brew_service: "mysql",
                systemd_unit: "mysql",
            }),
            fallback: None,
            download_url: "https://dev.mysql.com/downloads/installer/",
        },
        ToolRequirement {
            name: "node",
            display_name: "Node.js",
            command: "node",
            version_args: &["-v"],
            minimum: Version::new(18, 0),
            packages: PackageSet {
                brew: &["node"],
                apt: &["nodejs"],
                rpm: &["nodejs"],
                winget: Some("OpenJS.NodeJS.LTS"),
                choco: Some("nodejs-lts"),
                apt_repo_script: Some("https://deb.nodesource.com/setup_20.x"),
                rpm_repo_script: Some("https://rpm.nodesource.com/setup_20.x"),
            },
            service: None,
            fallback: None,
            download_url: "https://nodejs.org/",
        },
    ]
}

/// Apply minimum-version overrides from configuration.
///
/// Unknown tool names are rejected so typos in config surface early.
pub fn apply_overrides(
    requirements: &mut [ToolRequirement],
    overrides: &HashMap<String, Version>,
) -> Result<(), String> {
    for (name, minimum) in overrides {
        let Some(req) = requirements.iter_mut().find(|r| r.name == name) else {
            let known: Vec<&str> = requirements.iter().map(|r| r.name).collect();
            return Err(format!(
                "unknown requirement '{}' (known: {})",
                name,
                known.join(", ")
            ));
        };
        req.minimum = *minimum;
    }
    Ok(())
}
