//! GearLog project setup: the full bootstrap run.
//!
//! [`run_setup`] drives the sequence:
//!
//! 1. Privilege check (root is warned about, never blocked)
//! 2. Dependency resolution for every [`ToolRequirement`]
//! 3. Repository clone ([`clone`])
//! 4. PHP extension check ([`php_ini`])
//! 5. Backend ([`backend`], including [`database`])
//! 6. Frontend ([`frontend`])
//! 7. Closing [`instructions`]
//!
//! Dependency failures are reported and the run continues. Clone, backend
//! and frontend failures abort with [`SetupError::StepFailed`]. The cancel
//! check is consulted between steps and after each external command.

pub mod backend;
pub mod clone;
pub mod database;
pub mod frontend;
pub mod instructions;
pub mod php_ini;
pub mod runner;

use std::path::PathBuf;

use crate::config::DatabaseConfig;
use crate::error::{Result, SetupError};
use crate::requirements::{
    DependencyResolver, Host, InstallReport, Platform, ToolRequirement,
};
use crate::ui::{Prompt, SummaryRow, UserInterface};

pub use clone::{default_install_dir, CloneOutcome};
pub use database::DatabaseSettings;
pub use runner::{CommandRunner, SystemRunner};

/// Fail with [`SetupError::Cancelled`] once `cancelled` reports an interrupt.
pub(crate) fn checkpoint(cancelled: fn() -> bool) -> Result<()> {
    if cancelled() {
        tracing::warn!("Interrupt received, stopping setup");
        Err(SetupError::Cancelled)
    } else {
        Ok(())
    }
}

/// Inputs of a full setup run.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub repo_url: String,
    pub branch: Option<String>,
    pub install_dir: PathBuf,
    pub database: DatabaseConfig,
    pub skip_deps: bool,
    pub skip_frontend: bool,
}

/// What a completed run did.
#[derive(Debug)]
pub struct SetupSummary {
    pub report: InstallReport,
    pub project_dir: PathBuf,
    pub clone: CloneOutcome,
    pub database: DatabaseSettings,
    pub php_extensions: Vec<String>,
}

/// Warn when running as root. Only an interactive operator is asked
/// whether to go on; unattended runs continue.
pub fn confirm_privileges(ui: &mut dyn UserInterface, host: &Host) -> Result<()> {
    if !host.elevated || host.platform == Platform::Windows {
        return Ok(());
    }
    ui.warning("Running as root is not recommended. Some commands may fail.");
    if !ui.is_interactive() {
        tracing::warn!("Running as root in non-interactive mode");
        return Ok(());
    }
    let answer = ui.prompt(&Prompt::confirm(
        "continue_as_root",
        "Continue anyway?",
        false,
    ))?;
    if answer.is_yes() {
        tracing::warn!("Continuing as root");
        Ok(())
    } else {
        Err(SetupError::Cancelled)
    }
}

/// Ensure every requirement and report failures without stopping.
pub fn install_dependencies(
    resolver: &DependencyResolver<'_>,
    ui: &mut dyn UserInterface,
    requirements: &[ToolRequirement],
) -> InstallReport {
    ui.show_header("Checking Dependencies");
    let report = resolver.ensure_all(requirements, ui);

    let rows: Vec<SummaryRow> = report
        .outcomes
        .iter()
        .map(|o| SummaryRow::new(&o.tool, o.succeeded, &o.message))
        .collect();
    ui.show_summary("Dependencies", &rows);

    if !report.all_succeeded() {
        ui.warning("Some dependencies failed to install automatically.");
        ui.message("Please install them manually and run this setup again.");
        ui.error(&format!("Failed: {}", report.failed().join(", ")));
    }
    report
}

/// Run the whole bootstrap.
pub fn run_setup(
    resolver: &DependencyResolver<'_>,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    requirements: &[ToolRequirement],
    options: &SetupOptions,
    cancelled: fn() -> bool,
) -> Result<SetupSummary> {
    ui.show_header("GearLog Automated Setup");
    let host = resolver.host();
    ui.message(&format!("Detected system: {}", host.platform.name()));
    confirm_privileges(ui, host)?;

    let report = if options.skip_deps {
        ui.message("Skipping dependency checks");
        InstallReport::default()
    } else {
        install_dependencies(resolver, ui, requirements)
    };
    checkpoint(cancelled)?;

    ui.show_header("Setting Up Project");
    let project_dir = options.install_dir.clone();
    let clone = clone::clone_repository(
        runner,
        ui,
        &options.repo_url,
        options.branch.as_deref(),
        &project_dir,
        cancelled,
    )?;
    checkpoint(cancelled)?;

    let php_extensions = match requirements.iter().find(|r| r.name == "php") {
        Some(php) => {
            let status = resolver.check(php);
            if status.present {
                let php_dir = status.path.as_deref().and_then(|p| p.parent());
                php_ini::enable_required_extensions(runner, ui, php_dir)
            } else {
                Vec::new()
            }
        }
        None => Vec::new(),
    };

    let database = backend::setup_backend(
        runner,
        ui,
        &project_dir.join("backend"),
        &options.database,
        cancelled,
    )?;
    checkpoint(cancelled)?;

    if options.skip_frontend {
        ui.message("Skipping frontend setup");
    } else {
        frontend::setup_frontend(runner, ui, &project_dir.join("frontend"), cancelled)?;
        checkpoint(cancelled)?;
    }

    instructions::show_instructions(ui, &project_dir, host.platform);

    Ok(SetupSummary {
        report,
        project_dir,
        clone,
        database,
        php_extensions,
    })
}
