//! Command execution for project steps.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, SetupError};
use crate::shell::{display_command, execute, CommandOptions, CommandResult};
use crate::ui::{OutputMode, UserInterface};

/// Runs external commands for the project steps.
pub trait CommandRunner {
    /// Run `program` with `args`. A non-zero exit is an `Ok` result; only a
    /// failure to start is an error.
    fn run(&self, program: &str, args: &[String], options: &CommandOptions)
        -> Result<CommandResult>;
}

/// Runs commands on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        execute(program, args, options)
    }
}

/// One external command run as part of a setup step.
#[derive(Debug, Clone)]
pub struct StepCommand<'a> {
    pub label: &'a str,
    pub program: &'a str,
    pub args: Vec<String>,
    pub cwd: Option<&'a Path>,
    pub stdin: Option<String>,
    /// Extra environment for the child. Values are never logged.
    pub env: HashMap<String, String>,
}

impl<'a> StepCommand<'a> {
    pub fn new(label: &'a str, program: &'a str, args: &[&str]) -> Self {
        Self {
            label,
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
            stdin: None,
            env: HashMap::new(),
        }
    }

    pub fn in_dir(mut self, cwd: &'a Path) -> Self {
        self.cwd = Some(cwd);
        self
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn with_env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// Command line for display.
    pub fn display(&self) -> String {
        display_command(self.program, &self.args)
    }
}

/// Run a step command behind a spinner.
///
/// Verbose mode streams the command's output; other modes capture it and
/// show it in an error block when the command fails. Returns whether the
/// command exited 0. A command that cannot be started counts as a failure.
pub fn run_step(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    command: &StepCommand<'_>,
) -> bool {
    let line = command.display();
    tracing::info!("Running: {}", line);

    let streamed = ui.output_mode() == OutputMode::Verbose;
    let mut options = if streamed {
        CommandOptions::inherited(command.cwd)
    } else {
        CommandOptions::captured(command.cwd)
    };
    if let Some(input) = &command.stdin {
        options = options.with_stdin(input.clone());
    }
    options.env.extend(command.env.clone());

    let mut spinner = ui.start_spinner(&format!("{}...", command.label));
    match runner.run(command.program, &command.args, &options) {
        Ok(result) if result.success => {
            tracing::info!("{} succeeded in {:.1}s", line, result.duration.as_secs_f64());
            spinner.finish_success(command.label);
            true
        }
        Ok(result) => {
            tracing::warn!("{} exited with {:?}", line, result.exit_code);
            spinner.finish_error(&format!("{} failed", command.label));
            if !streamed {
                ui.show_error_block(&line, result.combined_output().trim(), None);
            }
            false
        }
        Err(SetupError::CommandFailed { .. }) => {
            tracing::warn!("Could not start {}", line);
            spinner.finish_error(&format!("{} failed", command.label));
            ui.show_error_block(
                &line,
                "",
                Some(&format!("'{}' was not found on PATH", command.program)),
            );
            false
        }
        Err(e) => {
            tracing::warn!("{}: {}", line, e);
            spinner.finish_error(&format!("{} failed: {}", command.label, e));
            false
        }
    }
}
