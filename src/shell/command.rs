//! External command execution.
//!
//! Commands are spawned directly from an argument vector, never through a
//! shell, so database names and paths are passed verbatim.

use crate::error::{Result, SetupError};
use crate::requirements::probe::{parse_system_path, resolve_command, windows_extensions};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Combined captured output, stdout first.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Text written to the child's stdin, which is then closed.
    pub stdin: Option<String>,
}

impl CommandOptions {
    /// Capture both streams, optionally in `cwd`.
    pub fn captured(cwd: Option<&Path>) -> Self {
        Self {
            cwd: cwd.map(Path::to_path_buf),
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    /// Stream both streams to the terminal, optionally in `cwd`.
    pub fn inherited(cwd: Option<&Path>) -> Self {
        Self {
            cwd: cwd.map(Path::to_path_buf),
            ..Default::default()
        }
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

/// Render a command line for messages and logs.
pub fn display_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        let arg = arg.as_ref();
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// Resolve `program` on PATH so Windows batch shims (`composer.bat`,
/// `npm.cmd`) can be spawned. Falls back to the bare name.
fn resolve_program(program: &str) -> PathBuf {
    if Path::new(program).components().count() > 1 {
        return PathBuf::from(program);
    }
    resolve_command(program, &parse_system_path(), &windows_extensions())
        .unwrap_or_else(|| PathBuf::from(program))
}

/// Execute `program` with `args`.
///
/// A non-zero exit is reported in the result, not as an error. Only a
/// failure to start the process is an error.
pub fn execute<S: AsRef<str>>(
    program: &str,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();
    let line = display_command(program, args);
    tracing::debug!("exec: {}", line);

    let mut cmd = Command::new(resolve_program(program));
    cmd.args(args.iter().map(|a| a.as_ref()));

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(if options.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("failed to start {}: {}", line, e);
        SetupError::CommandFailed {
            command: line.clone(),
            code: None,
        }
    })?;

    if let Some(input) = &options.stdin {
        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin closes the pipe early.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                tracing::debug!("writing stdin for {}: {}", line, e);
            }
        }
    }

    let output = child.wait_with_output().map_err(|_| SetupError::CommandFailed {
        command: line.clone(),
        code: None,
    })?;

    let duration = start.elapsed();
    let result = CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration,
        success: output.status.success(),
    };

    tracing::debug!(
        "exit {:?} after {:.1}s: {}",
        result.exit_code,
        duration.as_secs_f64(),
        line
    );
    if !result.success && !result.stderr.is_empty() {
        tracing::debug!("stderr: {}", result.stderr.trim_end());
    }
    Ok(result)
}

/// Execute a command and collect output without echoing it.
pub fn execute_quiet<S: AsRef<str>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<CommandResult> {
    execute(program, args, &CommandOptions::captured(cwd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_command_quotes_whitespace() {
        assert_eq!(
            display_command("git", &["clone", "https://x/y.git", "/tmp/My Dir"]),
            "git clone https://x/y.git \"/tmp/My Dir\""
        );
        assert_eq!(display_command("mysql", &["-p", ""]), "mysql -p \"\"");
    }

    #[test]
    fn missing_program_is_command_failed() {
        let err = execute_quiet("gearlog-no-such-program", &["--version"], None).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { code: None, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = execute_quiet("sh", &["-c", "echo hello"], None).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = execute_quiet("sh", &["-c", "exit 3"], None).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_env() {
        let mut options = CommandOptions::captured(None);
        options
            .env
            .insert("GEARLOG_TEST_VAR".to_string(), "my_value".to_string());
        let result = execute("sh", &["-c", "echo $GEARLOG_TEST_VAR"], &options).unwrap();
        assert!(result.stdout.contains("my_value"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = execute_quiet("pwd", &[] as &[&str], Some(temp.path())).unwrap();
        let name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&name));
    }

    #[cfg(unix)]
    #[test]
    fn execute_feeds_stdin() {
        let options = CommandOptions::captured(None).with_stdin("CREATE DATABASE x;\n");
        let result = execute("cat", &[] as &[&str], &options).unwrap();
        assert_eq!(result.stdout, "CREATE DATABASE x;\n");
    }

    #[cfg(unix)]
    #[test]
    fn arguments_are_not_shell_expanded() {
        let result = execute_quiet("echo", &["$HOME", "a;b"], None).unwrap();
        assert_eq!(result.stdout.trim(), "$HOME a;b");
    }

    #[test]
    fn combined_output_joins_streams() {
        let result = CommandResult {
            exit_code: Some(1),
            stdout: "out".to_string(),
            stderr: "err\n".to_string(),
            duration: Duration::from_millis(1),
            success: false,
        };
        assert_eq!(result.combined_output(), "out\nerr\n");
    }
}
