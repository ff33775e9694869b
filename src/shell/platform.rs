//! Platform and environment detection.

use std::path::Path;

const CI_VARIABLES: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`.
pub fn is_ci() -> bool {
    ci_detected(|name| std::env::var_os(name).is_some())
}

fn ci_detected(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARIABLES.iter().any(|name| is_set(name))
}

/// Check if running as root.
///
/// Only Unix is checked. Windows installers elevate through their own UAC
/// prompt, so there is nothing to warn about there.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Profile file the user's login shell reads, for PATH hints.
pub fn shell_profile() -> &'static str {
    let shell = std::env::var("SHELL").unwrap_or_default();
    profile_for_shell(&shell)
}

fn profile_for_shell(shell: &str) -> &'static str {
    let name = Path::new(shell)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    match name {
        "zsh" => "~/.zshrc",
        "bash" => "~/.bashrc",
        "fish" => "~/.config/fish/config.fish",
        _ if cfg!(target_os = "macos") => "~/.zshrc",
        _ => "~/.profile",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_for_known_shells() {
        assert_eq!(profile_for_shell("/bin/zsh"), "~/.zshrc");
        assert_eq!(profile_for_shell("/usr/bin/bash"), "~/.bashrc");
        assert_eq!(profile_for_shell("/usr/bin/fish"), "~/.config/fish/config.fish");
    }

    #[test]
    fn profile_for_unknown_shell_is_platform_default() {
        let expected = if cfg!(target_os = "macos") {
            "~/.zshrc"
        } else {
            "~/.profile"
        };
        assert_eq!(profile_for_shell(""), expected);
    }

    #[test]
    fn ci_detected_from_known_variables() {
        assert!(ci_detected(|name| name == "GITHUB_ACTIONS"));
        assert!(ci_detected(|name| name == "JENKINS_URL"));
        assert!(!ci_detected(|_| false));
        assert!(!ci_detected(|name| name == "BUILD_NUMBER"));
    }
}
