//! Requirement status and outcome types.
//!
//! A [`ToolStatus`] is computed fresh on every probe. An [`InstallOutcome`]
//! records what happened when a requirement was ensured, and the
//! [`InstallReport`] aggregates outcomes for the final summary.

use crate::requirements::version::Version;
use serde::Serialize;
use std::path::PathBuf;

/// The result of probing a single tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolStatus {
    /// Executable found and its version could be read.
    pub present: bool,
    /// First non-empty line of the version output, as printed by the tool.
    pub detected_version: Option<String>,
    /// Parsed `major.minor`.
    pub version: Option<Version>,
    /// Resolved executable path.
    pub path: Option<PathBuf>,
    /// Present and at or above the minimum version.
    pub meets_minimum: bool,
}

impl ToolStatus {
    /// Status for a tool that is not on PATH.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Short description for status listings.
    pub fn describe(&self) -> String {
        match (&self.detected_version, &self.path) {
            (Some(v), _) if self.present => v.clone(),
            (_, Some(path)) => format!("found at {} (version unreadable)", path.display()),
            _ => "not found".to_string(),
        }
    }
}

/// Structured detail about a failed install command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallDetail {
    /// The command line that failed.
    pub command: String,
    /// Exit code (None if it could not be started or was killed).
    pub exit_code: Option<i32>,
}

/// The recorded result of ensuring one requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallOutcome {
    /// Requirement label (e.g., "PHP 8.3+").
    pub tool: String,
    /// Whether the requirement is satisfied after this attempt.
    pub succeeded: bool,
    /// Human-readable message or guidance.
    pub message: String,
    /// Whether an install action was attempted.
    pub attempted_install: bool,
    /// Detail about the failing command, if any.
    pub detail: Option<InstallDetail>,
}

impl InstallOutcome {
    pub fn success(tool: &str, message: impl Into<String>, attempted_install: bool) -> Self {
        Self {
            tool: tool.to_string(),
            succeeded: true,
            message: message.into(),
            attempted_install,
            detail: None,
        }
    }

    pub fn failure(tool: &str, message: impl Into<String>, attempted_install: bool) -> Self {
        Self {
            tool: tool.to_string(),
            succeeded: false,
            message: message.into(),
            attempted_install,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: InstallDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Aggregated outcomes for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<InstallOutcome>,
}

impl InstallReport {
    pub fn push(&mut self, outcome: InstallOutcome) {
        self.outcomes.push(outcome);
    }

    /// Labels of requirements that are satisfied.
    pub fn installed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded)
            .map(|o| o.tool.as_str())
            .collect()
    }

    /// Labels of requirements that could not be satisfied.
    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| o.tool.as_str())
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }
}
