//! React frontend setup.

use std::path::Path;

use crate::config::{EnvFile, EnvSource};
use crate::error::{Result, SetupError};
use crate::project::checkpoint;
use crate::project::runner::{run_step, CommandRunner, StepCommand};
use crate::ui::UserInterface;

/// Install npm dependencies and create `.env` from `.env.example`.
pub fn setup_frontend(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    frontend: &Path,
    cancelled: fn() -> bool,
) -> Result<()> {
    ui.show_header("Setting Up Frontend");

    if !frontend.is_dir() {
        return Err(SetupError::step(
            "frontend",
            format!("Frontend directory not found: {}", frontend.display()),
        ));
    }

    let npm = StepCommand::new("Installing npm dependencies", "npm", &["install"]).in_dir(frontend);
    let installed = run_step(runner, ui, &npm);
    checkpoint(cancelled)?;
    if !installed {
        return Err(SetupError::step("frontend", "Failed to install npm dependencies"));
    }

    if EnvFile::from_template(frontend, None)? == EnvSource::Example {
        ui.success("Frontend .env file created");
    }
    Ok(())
}
