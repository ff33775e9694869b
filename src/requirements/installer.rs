//! The Installer capability: runs install steps with a uniform result.

use crate::requirements::status::InstallDetail;
use crate::requirements::strategy::InstallStep;
use crate::shell::{self, CommandOptions};
use std::path::Path;

/// Outcome of running one install step.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallResult {
    pub succeeded: bool,
    pub message: String,
    pub detail: Option<InstallDetail>,
}

impl InstallResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            detail: None,
        }
    }

    pub fn failed(message: impl Into<String>, command: &str, exit_code: Option<i32>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
            detail: Some(InstallDetail {
                command: command.to_string(),
                exit_code,
            }),
        }
    }
}

/// Runs install steps on behalf of the resolver.
pub trait Installer {
    /// Run one step. Never fails; errors are folded into the result.
    fn run(&self, step: &InstallStep) -> InstallResult;

    /// Remove a temporary file left by a plan.
    fn cleanup(&self, path: &Path);
}

/// `Installer` that runs real processes with the terminal attached, so
/// package managers can show progress and `sudo` can ask for a password.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInstaller;

impl Installer for SystemInstaller {
    fn run(&self, step: &InstallStep) -> InstallResult {
        let line = step.to_string();
        tracing::info!("Running: {}", line);

        match shell::execute(&step.program, &step.args, &CommandOptions::inherited(None)) {
            Ok(result) if result.success => InstallResult::ok(format!("{} succeeded", line)),
            Ok(result) => {
                let code = result
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                InstallResult::failed(
                    format!("{} failed (exit {})", line, code),
                    &line,
                    result.exit_code,
                )
            }
            Err(e) => InstallResult::failed(format!("{}: {}", line, e), &line, None),
        }
    }

    fn cleanup(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_failed_result() {
        let step = InstallStep::new("gearlog-no-such-installer", &["install"]);
        let result = SystemInstaller.run(&step);
        assert!(!result.succeeded);
        let detail = result.detail.unwrap();
        assert_eq!(detail.command, "gearlog-no-such-installer install");
        assert_eq!(detail.exit_code, None);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_carries_code() {
        let step = InstallStep::new("sh", &["-c", "exit 7"]);
        let result = SystemInstaller.run(&step);
        assert!(!result.succeeded);
        assert!(result.message.contains("exit 7"));
        assert_eq!(result.detail.unwrap().exit_code, Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_succeeds() {
        let result = SystemInstaller.run(&InstallStep::new("true", &[]));
        assert!(result.succeeded);
        assert!(result.detail.is_none());
    }

    #[test]
    fn cleanup_removes_file_and_ignores_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("composer-setup.php");
        std::fs::write(&file, "<?php").unwrap();
        SystemInstaller.cleanup(&file);
        assert!(!file.exists());
        SystemInstaller.cleanup(&file);
    }
}
