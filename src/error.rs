//! Error types for setup operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Dependency installation never returns an error: failures are recorded
//!   as [`InstallOutcome`](crate::requirements::InstallOutcome)s and the run continues
//! - Critical project steps (clone, core package install) return
//!   `SetupError::StepFailed` and abort the run
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A critical setup step failed and the run cannot continue.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// External command could not be started or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The operator declined to continue or sent an interrupt.
    #[error("Setup cancelled by user")]
    Cancelled,

    /// A prompt could not be answered (non-interactive, no default).
    #[error("Cannot answer prompt '{key}': {message}")]
    PromptUnavailable { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Shorthand for a critical step failure.
    pub fn step(step: &str, message: impl Into<String>) -> Self {
        SetupError::StepFailed {
            step: step.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SetupError::ConfigParseError {
            path: PathBuf::from("/gearlog-setup.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/gearlog-setup.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn config_validation_error_displays_message() {
        let err = SetupError::ConfigValidationError {
            message: "unknown requirement 'ruby'".into(),
        };
        assert!(err.to_string().contains("unknown requirement 'ruby'"));
    }

    #[test]
    fn step_failed_displays_step_and_message() {
        let err = SetupError::step("clone", "git exited with code 128");
        let msg = err.to_string();
        assert!(msg.contains("clone"));
        assert!(msg.contains("git exited with code 128"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SetupError::CommandFailed {
            command: "composer install".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("composer install"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn cancelled_has_operator_message() {
        assert_eq!(SetupError::Cancelled.to_string(), "Setup cancelled by user");
    }

    #[test]
    fn prompt_unavailable_displays_key() {
        let err = SetupError::PromptUnavailable {
            key: "db_password".into(),
            message: "no default".into(),
        };
        assert!(err.to_string().contains("db_password"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: SetupError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, SetupError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
