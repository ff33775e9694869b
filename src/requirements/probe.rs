//! Tool probing: locating executables and reading their versions.
//!
//! Lookups walk the PATH entries directly instead of shelling out to
//! `which`/`where`, whose behaviour differs between systems. On Windows a bare
//! command name is tried with every `PATHEXT` extension, so `composer`
//! resolves to `composer.bat` and `node` to `node.exe`.

use crate::requirements::registry::ToolRequirement;
use crate::requirements::status::ToolStatus;
use crate::requirements::version::Version;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Extensions tried on Windows when `PATHEXT` is unset.
const DEFAULT_PATHEXT: &[&str] = &[".com", ".exe", ".bat", ".cmd"];

/// Locates executables and captures their version output.
///
/// The resolver only talks to the system through this trait (and
/// [`Installer`](crate::requirements::Installer)), which keeps it testable.
pub trait ToolLocator {
    /// Resolve a command name to an executable path.
    fn locate(&self, command: &str) -> Option<PathBuf>;

    /// Run `program args...` and return its combined output on exit 0.
    fn capture(&self, program: &Path, args: &[&str]) -> Option<String>;
}

/// `ToolLocator` backed by the real PATH and process execution.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocator;

impl ToolLocator for SystemLocator {
    fn locate(&self, command: &str) -> Option<PathBuf> {
        let path = parse_system_path();
        resolve_command(command, &path, &windows_extensions())
    }

    fn capture(&self, program: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            tracing::debug!(
                "{} {:?} exited with {:?}",
                program.display(),
                args,
                output.status.code()
            );
            return None;
        }
        // Some tools (older mysql builds) print their version on stderr.
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Some(text)
    }
}

/// Check whether a file has any execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Split the process PATH into entries.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Extensions to try for bare command names. Empty on non-Windows hosts.
pub fn windows_extensions() -> Vec<String> {
    if !cfg!(windows) {
        return Vec::new();
    }
    parse_pathext(std::env::var_os("PATHEXT"))
}

/// Parse a `PATHEXT` value, falling back to the common defaults.
pub fn parse_pathext(value: Option<OsString>) -> Vec<String> {
    let parsed: Vec<String> = value
        .map(|v| {
            v.to_string_lossy()
                .split(';')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| e.starts_with('.') && e.len() > 1)
                .collect()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        DEFAULT_PATHEXT.iter().map(|e| e.to_string()).collect()
    } else {
        parsed
    }
}

/// Resolve a command against PATH entries.
///
/// Each directory is tried in order. Inside a directory the extended names
/// (`node.exe`, `composer.bat`) are tried before the bare name, since on
/// Windows a bare `composer` is usually a shell script that cannot be spawned
/// directly. A name that already has an extension is only tried as-is.
pub fn resolve_command(
    command: &str,
    path_entries: &[PathBuf],
    extensions: &[String],
) -> Option<PathBuf> {
    let has_extension = Path::new(command).extension().is_some();

    for dir in path_entries {
        if !has_extension {
            for ext in extensions {
                let candidate = dir.join(format!("{}{}", command, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        let candidate = dir.join(command);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Probe a tool: locate it, read its version, compare to the minimum.
///
/// Never fails. An executable whose version output cannot be read or parsed
/// is reported as absent (with its path kept for diagnostics).
pub fn probe(requirement: &ToolRequirement, locator: &dyn ToolLocator) -> ToolStatus {
    let Some(path) = locator.locate(requirement.command) else {
        tracing::debug!("{} not found on PATH", requirement.command);
        return ToolStatus::absent();
    };

    let output = locator.capture(&path, requirement.version_args);
    let parsed = output.as_deref().and_then(Version::parse_tolerant);
    let detected = output
        .as_deref()
        .and_then(|o| o.lines().find(|l| !l.trim().is_empty()))
        .map(|l| l.trim().to_string());

    tracing::debug!(
        "{} at {} reports {:?} (parsed {:?})",
        requirement.command,
        path.display(),
        detected,
        parsed
    );

    ToolStatus {
        present: parsed.is_some(),
        detected_version: detected,
        version: parsed,
        path: Some(path),
        meets_minimum: parsed.is_some_and(|v| v.meets(requirement.minimum)),
    }
}
