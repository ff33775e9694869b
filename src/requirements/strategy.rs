//! Install strategies keyed by platform.
//!
//! A strategy turns a [`ToolRequirement`] and the detected [`Host`] into an
//! [`InstallPlan`]: the ordered commands that should make the tool available.
//! Strategies only build plans; running them is the
//! [`Installer`](crate::requirements::Installer)'s job.

use crate::requirements::host::{Host, PackageManager};
use crate::requirements::registry::{Platform, ToolRequirement};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// One command of an install plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    pub program: String,
    pub args: Vec<String>,
    /// A failing required step fails the whole install.
    pub required: bool,
}

impl InstallStep {
    /// A required step.
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            required: true,
        }
    }

    /// A step whose failure is only logged.
    pub fn best_effort(program: &str, args: &[&str]) -> Self {
        Self {
            required: false,
            ..Self::new(program, args)
        }
    }

    /// Prefix the step with `sudo` when the host needs it.
    pub fn privileged(mut self, host: &Host) -> Self {
        if let Some(prefix) = host.privilege_prefix() {
            self.args.insert(0, std::mem::take(&mut self.program));
            self.program = prefix.to_string();
        }
        self
    }

    fn with_args(mut self, extra: &[&str]) -> Self {
        self.args.extend(extra.iter().map(|a| a.to_string()));
        self
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Ordered commands that install one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallPlan {
    /// What drives the install (e.g., "apt-get", "Homebrew").
    pub via: String,
    pub steps: Vec<InstallStep>,
    /// Run after a successful install; failures only warn.
    pub post_install: Vec<InstallStep>,
    /// Files to delete once the plan has run.
    pub cleanup: Vec<PathBuf>,
    /// Shown to the operator after a successful install.
    pub note: Option<String>,
}

/// Result of asking a strategy for a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Plan(InstallPlan),
    /// Nothing on this host can install the tool.
    Unavailable { guidance: String },
}

/// Builds an install strategy for one platform.
pub type StrategyFn = fn(&ToolRequirement, &Host) -> Strategy;

/// Capability table: one strategy function per platform.
pub struct StrategyTable {
    entries: HashMap<Platform, StrategyFn>,
}

impl StrategyTable {
    /// Table with the built-in macOS, Linux and Windows strategies.
    pub fn builtin() -> Self {
        Self::empty()
            .with(Platform::MacOS, macos_strategy)
            .with(Platform::Linux, linux_strategy)
            .with(Platform::Windows, windows_strategy)
    }

    /// Table with no strategies; every lookup is `Unavailable`.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) the strategy for a platform.
    pub fn with(mut self, platform: Platform, strategy: StrategyFn) -> Self {
        self.entries.insert(platform, strategy);
        self
    }

    /// Build the plan for `requirement` on `host`.
    pub fn plan_for(&self, requirement: &ToolRequirement, host: &Host) -> Strategy {
        match self.entries.get(&host.platform) {
            Some(strategy) => strategy(requirement, host),
            None => Strategy::Unavailable {
                guidance: format!(
                    "Automatic installation is not supported on {}. {}",
                    host.platform.name(),
                    requirement.manual_hint()
                ),
            },
        }
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn fallback_or(requirement: &ToolRequirement, host: &Host, guidance: String) -> Strategy {
    match requirement.fallback.and_then(|f| f(host)) {
        Some(plan) => Strategy::Plan(plan),
        None => Strategy::Unavailable { guidance },
    }
}

fn brew_plan(requirement: &ToolRequirement) -> InstallPlan {
    let mut steps = Vec::new();
    let mut install = InstallStep::new("brew", &["install"]);
    install = install.with_args(requirement.packages.brew);
    steps.push(install);

    let post_install = requirement
        .service
        .as_ref()
        .map(|svc| {
            vec![InstallStep::best_effort(
                "brew",
                &["services", "start", svc.brew_service],
            )]
        })
        .unwrap_or_default();

    // Versioned formulae (php@8.3) are keg-only and not linked onto PATH.
    let note = requirement
        .packages
        .brew
        .iter()
        .find(|p| p.contains('@'))
        .map(|keg| {
            format!(
                "Add {} to PATH: echo 'export PATH=\"$(brew --prefix {})/bin:$PATH\"' >> {}",
                keg,
                keg,
                crate::shell::shell_profile()
            )
        });

    InstallPlan {
        via: "Homebrew".to_string(),
        steps,
        post_install,
        cleanup: Vec::new(),
        note,
    }
}

/// macOS: Homebrew, then the tool's fallback.
pub fn macos_strategy(requirement: &ToolRequirement, host: &Host) -> Strategy {
    if host.has(PackageManager::Homebrew) && !requirement.packages.brew.is_empty() {
        return Strategy::Plan(brew_plan(requirement));
    }
    let guidance = if host.has(PackageManager::Homebrew) {
        requirement.manual_hint()
    } else {
        format!(
            "Homebrew is required to install {} on macOS. Install Homebrew from: https://brew.sh",
            requirement.label()
        )
    };
    fallback_or(requirement, host, guidance)
}

fn repo_script_steps(requirement: &ToolRequirement, host: &Host, url: &str) -> Vec<InstallStep> {
    if !host.has_curl {
        tracing::warn!(
            "curl not found; skipping repository setup for {}",
            requirement.display_name
        );
        return Vec::new();
    }
    let script = std::env::temp_dir().join(format!("gearlog-{}-setup.sh", requirement.name));
    let script = script.to_string_lossy().to_string();
    vec![
        InstallStep::best_effort("curl", &["-fsSL", url, "-o", &script]),
        InstallStep::best_effort("bash", &[&script]).privileged(host),
    ]
}

fn systemd_steps(requirement: &ToolRequirement, host: &Host) -> Vec<InstallStep> {
    requirement
        .service
        .as_ref()
        .map(|svc| {
            vec![
                InstallStep::best_effort("systemctl", &["start", svc.systemd_unit])
                    .privileged(host),
                InstallStep::best_effort("systemctl", &["enable", svc.systemd_unit])
                    .privileged(host),
            ]
        })
        .unwrap_or_default()
}

/// Linux: apt-get, dnf, yum, Linuxbrew, then the tool's fallback.
pub fn linux_strategy(requirement: &ToolRequirement, host: &Host) -> Strategy {
    let packages = &requirement.packages;

    if host.has(PackageManager::Apt) && !packages.apt.is_empty() {
        let mut steps = packages
            .apt_repo_script
            .map(|url| repo_script_steps(requirement, host, url))
            .unwrap_or_default();
        steps.push(InstallStep::best_effort("apt-get", &["update"]).privileged(host));
        steps.push(
            InstallStep::new("apt-get", &["install", "-y"])
                .with_args(packages.apt)
                .privileged(host),
        );
        return Strategy::Plan(InstallPlan {
            via: "apt-get".to_string(),
            steps,
            post_install: systemd_steps(requirement, host),
            ..Default::default()
        });
    }

    for pm in [PackageManager::Dnf, PackageManager::Yum] {
        if host.has(pm) && !packages.rpm.is_empty() {
            let mut steps = packages
                .rpm_repo_script
                .map(|url| repo_script_steps(requirement, host, url))
                .unwrap_or_default();
            steps.push(
                InstallStep::new(pm.command(), &["install", "-y"])
                    .with_args(packages.rpm)
                    .privileged(host),
            );
            return Strategy::Plan(InstallPlan {
                via: pm.command().to_string(),
                steps,
                post_install: systemd_steps(requirement, host),
                ..Default::default()
            });
        }
    }

    if host.has(PackageManager::Homebrew) && !packages.brew.is_empty() {
        return Strategy::Plan(brew_plan(requirement));
    }

    fallback_or(
        requirement,
        host,
        format!(
            "Unsupported Linux distribution. {}",
            requirement.manual_hint()
        ),
    )
}

/// Windows: winget, Chocolatey, then the tool's fallback.
pub fn windows_strategy(requirement: &ToolRequirement, host: &Host) -> Strategy {
    let packages = &requirement.packages;
    let note = Some("Open a new terminal so PATH changes take effect.".to_string());

    if let (true, Some(id)) = (host.has(PackageManager::Winget), packages.winget) {
        return Strategy::Plan(InstallPlan {
            via: "winget".to_string(),
            steps: vec![InstallStep::new(
                "winget",
                &[
                    "install",
                    "--id",
                    id,
                    "-e",
                    "--silent",
                    "--accept-package-agreements",
                    "--accept-source-agreements",
                ],
            )],
            note,
            ..Default::default()
        });
    }

    if let (true, Some(pkg)) = (host.has(PackageManager::Chocolatey), packages.choco) {
        return Strategy::Plan(InstallPlan {
            via: "Chocolatey".to_string(),
            steps: vec![InstallStep::new("choco", &["install", pkg, "-y"])],
            note,
            ..Default::default()
        });
    }

    fallback_or(
        requirement,
        host,
        format!(
            "Windows installation not automated (winget or Chocolatey not found). {}",
            requirement.manual_hint()
        ),
    )
}

/// Composer's official installer, used where no package provides Composer.
///
/// Needs PHP on PATH at run time. Installs system-wide when root or sudo is
/// available, otherwise into `~/.local/bin`.
pub fn composer_installer_plan(host: &Host) -> Option<InstallPlan> {
    if host.platform == Platform::Windows {
        return None;
    }

    let setup = std::env::temp_dir().join("composer-setup.php");
    let setup_str = setup.to_string_lossy().to_string();
    let download = format!(
        "copy('https://getcomposer.org/installer', '{}');",
        setup_str
    );

    let system_wide = host.elevated || host.has_sudo;
    let (install_dir, note) = if system_wide {
        ("/usr/local/bin".to_string(), None)
    } else {
        let dir = dirs::home_dir()?.join(".local").join("bin");
        let dir = dir.to_string_lossy().to_string();
        let note = format!("Composer was installed to {}; make sure it is on PATH.", dir);
        (dir, Some(note))
    };
    let install_dir_arg = format!("--install-dir={}", install_dir);

    let mut steps = vec![InstallStep::new("php", &["-r", &download])];
    if !system_wide {
        steps.push(InstallStep::best_effort("mkdir", &["-p", &install_dir]));
    }
    steps.push(
        InstallStep::new(
            "php",
            &[&setup_str, &install_dir_arg, "--filename=composer"],
        )
        .privileged(host),
    );

    Some(InstallPlan {
        via: "official installer".to_string(),
        steps,
        post_install: Vec::new(),
        cleanup: vec![setup],
        note,
    })
}
