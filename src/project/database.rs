//! Database settings for the backend.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::{DatabaseConfig, EnvFile};
use crate::error::{Result, SetupError};
use crate::project::runner::{run_step, CommandRunner, StepCommand};
use crate::ui::{Prompt, UserInterface};

static RE_DATABASE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_$]+$").unwrap());

const MAX_NAME_ATTEMPTS: usize = 3;

/// Whether `name` can be used unquoted in `CREATE DATABASE`.
pub fn is_valid_database_name(name: &str) -> bool {
    RE_DATABASE_NAME.is_match(name)
}

/// Credentials chosen by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Ask for the database name, username and password.
pub fn prompt_settings(
    ui: &mut dyn UserInterface,
    defaults: &DatabaseConfig,
) -> Result<DatabaseSettings> {
    let mut name = None;
    for _ in 0..MAX_NAME_ATTEMPTS {
        let answer = ui
            .prompt(&Prompt::input("db_name", "Database name", &defaults.name))?
            .as_string();
        if is_valid_database_name(&answer) {
            name = Some(answer);
            break;
        }
        ui.warning(&format!(
            "'{}' is not a valid database name (letters, digits, '_' and '$' only)",
            answer
        ));
    }
    let Some(name) = name else {
        return Err(SetupError::step("database", "no valid database name given"));
    };

    let username = ui
        .prompt(&Prompt::input(
            "db_username",
            "Database username",
            &defaults.username,
        ))?
        .as_string();
    let password = ui
        .prompt(&Prompt::password("db_password", "Database password"))?
        .as_string();

    Ok(DatabaseSettings {
        name,
        username,
        password,
    })
}

/// Write the `DB_*` keys into the env file at `path`.
pub fn write_env(path: &Path, settings: &DatabaseSettings) -> Result<()> {
    let mut env = EnvFile::load(path)?;
    env.set("DB_DATABASE", &settings.name);
    env.set("DB_USERNAME", &settings.username);
    env.set("DB_PASSWORD", &settings.password);
    env.save(path)
}

/// `mysql` invocation creating the database if it does not exist.
///
/// The password travels in `MYSQL_PWD` so it stays out of the process list
/// and the log.
pub fn create_database_command(settings: &DatabaseSettings) -> StepCommand<'static> {
    let mut command = StepCommand::new("Creating database", "mysql", &[]);
    command.args = vec!["-u".to_string(), settings.username.clone()];
    if !settings.password.is_empty() {
        command = command.with_env("MYSQL_PWD", settings.password.clone());
    }
    command.with_stdin(format!("CREATE DATABASE IF NOT EXISTS {};\n", settings.name))
}

/// Prompt for credentials, write them to `backend/.env` and create the
/// database. Creating the database is best-effort.
pub fn configure_database(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    backend: &Path,
    defaults: &DatabaseConfig,
) -> Result<DatabaseSettings> {
    ui.message("Database configuration:");
    let settings = prompt_settings(ui, defaults)?;

    let env_path = backend.join(".env");
    if env_path.is_file() {
        write_env(&env_path, &settings)?;
        tracing::info!(
            "Wrote database settings (database {}, user {}) to {}",
            settings.name,
            settings.username,
            env_path.display()
        );
    } else {
        ui.warning(&format!(
            "{} not found; database settings were not saved",
            env_path.display()
        ));
    }

    let command = create_database_command(&settings);
    if !run_step(runner, ui, &command) {
        ui.warning(&format!(
            "Could not create database '{}'. Create it manually if migrations fail.",
            settings.name
        ));
    }
    ui.success("Database configured");
    Ok(settings)
}
