//! Configuration validation rules.
//!
//! - Requirement overrides must name a known tool and a parsable version
//! - The default database name must be a safe MySQL identifier
//! - The repository URL must not be empty

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};
use crate::project::database::is_valid_database_name;
use crate::requirements::{apply_overrides, builtin_requirements, ToolRequirement, Version};
use std::collections::HashMap;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &SetupConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.repo_url.trim().is_empty() {
        errors.push(ValidationError {
            field: "repo_url".to_string(),
            message: "repo_url must not be empty".to_string(),
        });
    }

    if !is_valid_database_name(&config.database.name) {
        errors.push(ValidationError {
            field: "database.name".to_string(),
            message: format!(
                "database.name '{}' may only contain letters, digits, '_' and '$'",
                config.database.name
            ),
        });
    }

    errors.extend(validate_requirements(config));
    errors
}

fn validate_requirements(config: &SetupConfig) -> Vec<ValidationError> {
    let known = builtin_requirements();
    let mut errors = Vec::new();

    let mut names: Vec<&String> = config.requirements.keys().collect();
    names.sort();

    for name in names {
        let field = format!("requirements.{}", name);
        if !known.iter().any(|r| r.name == name.as_str()) {
            errors.push(ValidationError {
                field,
                message: format!("unknown requirement '{}'", name),
            });
            continue;
        }
        if let Err(e) = config.requirements[name].parse::<Version>() {
            errors.push(ValidationError {
                field,
                message: format!("requirements.{}: {}", name, e),
            });
        }
    }

    errors
}

/// Validate and fail with every problem joined into one message.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &SetupConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SetupError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

/// Built-in requirements with the configured minimum overrides applied.
pub fn effective_requirements(config: &SetupConfig) -> Result<Vec<ToolRequirement>> {
    let mut overrides = HashMap::new();
    for (name, raw) in &config.requirements {
        let version = raw
            .parse::<Version>()
            .map_err(|message| SetupError::ConfigValidationError { message })?;
        overrides.insert(name.clone(), version);
    }

    let mut requirements = builtin_requirements();
    apply_overrides(&mut requirements, &overrides)
        .map_err(|message| SetupError::ConfigValidationError { message })?;
    Ok(requirements)
}
