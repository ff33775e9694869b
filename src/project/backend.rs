//! Laravel backend setup.

use std::path::Path;

use crate::config::{DatabaseConfig, EnvFile, EnvSource, BASIC_BACKEND_ENV};
use crate::error::{Result, SetupError};
use crate::project::database::{configure_database, DatabaseSettings};
use crate::project::checkpoint as check;
use crate::project::runner::{run_step, CommandRunner, StepCommand};
use crate::ui::UserInterface;

/// Run the backend steps in `backend`.
///
/// Only a missing directory and a failed `composer install` are fatal.
/// Key generation, migrations and the storage link only warn.
pub fn setup_backend(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    backend: &Path,
    database: &DatabaseConfig,
    cancelled: fn() -> bool,
) -> Result<DatabaseSettings> {
    ui.show_header("Setting Up Backend");

    if !backend.is_dir() {
        return Err(SetupError::step(
            "backend",
            format!("Backend directory not found: {}", backend.display()),
        ));
    }

    let composer = StepCommand::new("Installing PHP dependencies", "composer", &["install"])
        .in_dir(backend);
    let installed = run_step(runner, ui, &composer);
    check(cancelled)?;
    if !installed {
        return Err(SetupError::step(
            "backend",
            "Failed to install Composer dependencies",
        ));
    }

    match EnvFile::from_template(backend, Some(BASIC_BACKEND_ENV))? {
        EnvSource::Existing => ui.message("Keeping existing .env file"),
        EnvSource::Example => ui.success(".env file created from .env.example"),
        EnvSource::Template => {
            ui.warning(".env.example not found. Created a basic .env file")
        }
        EnvSource::Missing => {}
    }

    let key = StepCommand::new("Generating application key", "php", &["artisan", "key:generate"])
        .in_dir(backend);
    let generated = run_step(runner, ui, &key);
    check(cancelled)?;
    if !generated {
        ui.warning("Could not generate the application key. Run `php artisan key:generate` later.");
    }

    let settings = configure_database(runner, ui, backend, database)?;
    check(cancelled)?;

    let migrate = StepCommand::new("Running database migrations", "php", &["artisan", "migrate", "--seed"])
        .in_dir(backend);
    let migrated = run_step(runner, ui, &migrate);
    check(cancelled)?;
    if !migrated {
        ui.warning("Migrations failed. You may need to create the database manually.");
        ui.show_hint(&format!("Create database: CREATE DATABASE {};", settings.name));
    }

    let link = StepCommand::new("Creating storage symlink", "php", &["artisan", "storage:link"])
        .in_dir(backend);
    let linked = run_step(runner, ui, &link);
    check(cancelled)?;
    if !linked {
        tracing::info!("storage:link failed; the link may already exist");
    }

    Ok(settings)
}
