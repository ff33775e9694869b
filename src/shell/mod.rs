//! External command execution and process environment.

pub mod command;
pub mod interrupt;
pub mod platform;

pub use command::{display_command, execute, execute_quiet, CommandOptions, CommandResult};
pub use platform::{is_ci, is_elevated, shell_profile};
