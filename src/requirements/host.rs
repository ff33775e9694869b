//! Host detection: platform, package managers, privileges.

use crate::requirements::probe::ToolLocator;
use crate::requirements::registry::Platform;
use std::fmt;

/// A system package manager the installer knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Homebrew,
    Apt,
    Dnf,
    Yum,
    Winget,
    Chocolatey,
}

impl PackageManager {
    /// Executable name looked up on PATH.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Homebrew => "brew",
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Winget => "winget",
            PackageManager::Chocolatey => "choco",
        }
    }

    /// Package managers worth looking for on a platform, in preference order.
    pub fn candidates(platform: Platform) -> &'static [PackageManager] {
        match platform {
            Platform::MacOS => &[PackageManager::Homebrew],
            Platform::Linux => &[
                PackageManager::Apt,
                PackageManager::Dnf,
                PackageManager::Yum,
                PackageManager::Homebrew,
            ],
            Platform::Windows => &[PackageManager::Winget, PackageManager::Chocolatey],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// What the resolver knows about the machine it runs on.
#[derive(Debug, Clone)]
pub struct Host {
    pub platform: Platform,
    /// Package managers found on PATH, in preference order.
    pub package_managers: Vec<PackageManager>,
    /// Running as root / administrator.
    pub elevated: bool,
    /// `sudo` is available for privilege escalation.
    pub has_sudo: bool,
    /// `curl` is available for repository setup scripts.
    pub has_curl: bool,
}

impl Host {
    /// Detect the current host using `locator` for PATH lookups.
    pub fn detect(locator: &dyn ToolLocator) -> Self {
        let platform = Platform::current();
        let package_managers = PackageManager::candidates(platform)
            .iter()
            .copied()
            .filter(|pm| locator.locate(pm.command()).is_some())
            .collect::<Vec<_>>();

        let host = Self {
            platform,
            package_managers,
            elevated: crate::shell::is_elevated(),
            has_sudo: platform != Platform::Windows && locator.locate("sudo").is_some(),
            has_curl: locator.locate("curl").is_some(),
        };
        tracing::info!(
            "Host: {} (package managers: {:?}, elevated: {})",
            host.platform.name(),
            host.package_managers,
            host.elevated
        );
        host
    }

    /// Whether a package manager was found.
    pub fn has(&self, pm: PackageManager) -> bool {
        self.package_managers.contains(&pm)
    }

    /// Prefix for commands that need root on Unix hosts.
    pub fn privilege_prefix(&self) -> Option<&'static str> {
        if self.platform != Platform::Windows && !self.elevated && self.has_sudo {
            Some("sudo")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    struct OnlyThese(&'static [&'static str]);

    impl ToolLocator for OnlyThese {
        fn locate(&self, command: &str) -> Option<PathBuf> {
            self.0
                .contains(&command)
                .then(|| PathBuf::from("/usr/bin").join(command))
        }
        fn capture(&self, _program: &Path, _args: &[&str]) -> Option<String> {
            None
        }
    }

    fn linux_host(elevated: bool, has_sudo: bool) -> Host {
        Host {
            platform: Platform::Linux,
            package_managers: vec![PackageManager::Apt],
            elevated,
            has_sudo,
            has_curl: true,
        }
    }

    #[test]
    fn candidates_are_platform_specific() {
        assert_eq!(
            PackageManager::candidates(Platform::MacOS),
            &[PackageManager::Homebrew]
        );
        assert!(PackageManager::candidates(Platform::Windows).contains(&PackageManager::Winget));
        assert_eq!(
            PackageManager::candidates(Platform::Linux)[0],
            PackageManager::Apt
        );
    }

    #[test]
    fn detect_only_keeps_package_managers_on_path() {
        let host = Host::detect(&OnlyThese(&["brew", "apt-get", "choco", "curl"]));
        for pm in &host.package_managers {
            assert!(["brew", "apt-get", "choco"].contains(&pm.command()));
        }
        assert!(host.has_curl);
    }

    #[test]
    fn detect_with_empty_path_finds_nothing() {
        let host = Host::detect(&OnlyThese(&[]));
        assert!(host.package_managers.is_empty());
        assert!(!host.has_sudo);
        assert!(!host.has_curl);
    }

    #[test]
    fn sudo_prefix_when_not_elevated() {
        assert_eq!(linux_host(false, true).privilege_prefix(), Some("sudo"));
    }

    #[test]
    fn no_sudo_prefix_when_root() {
        assert_eq!(linux_host(true, true).privilege_prefix(), None);
    }

    #[test]
    fn no_sudo_prefix_without_sudo() {
        assert_eq!(linux_host(false, false).privilege_prefix(), None);
    }

    #[test]
    fn package_manager_display_is_command() {
        assert_eq!(PackageManager::Apt.to_string(), "apt-get");
    }
}
