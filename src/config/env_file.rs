//! Application `.env` files.
//!
//! Files are edited line by line so comments, blank lines and key order
//! survive. Updates use find-or-append semantics per key.
//!
//! # Example
//!
//! ```
//! use gearlog_setup::config::EnvFile;
//!
//! let mut env = EnvFile::parse("DB_DATABASE=old\nDB_DATABASE=older\n");
//! env.set("DB_DATABASE", "gearlog");
//! assert_eq!(env.render(), "DB_DATABASE=gearlog\n");
//! ```

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Backend environment written when the repository has no `.env.example`.
pub const BASIC_BACKEND_ENV: &str = "\
APP_NAME=GearLog
APP_ENV=local
APP_KEY=
APP_DEBUG=true
APP_URL=http://localhost:8000

FRONTEND_URL=http://localhost:5173

DB_CONNECTION=mysql
DB_HOST=127.0.0.1
DB_PORT=3306
DB_DATABASE=gearlog
DB_USERNAME=root
DB_PASSWORD=

SESSION_DRIVER=database
SESSION_LIFETIME=120
SESSION_DOMAIN=localhost

SANCTUM_STATEFUL_DOMAINS=localhost:5173,127.0.0.1:5173
";

/// Where a `.env` file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSource {
    /// `.env` was already there and was left alone.
    Existing,
    /// Copied from `.env.example`.
    Example,
    /// Written from a built-in template.
    Template,
    /// No `.env`, no example and no template.
    Missing,
}

/// A line-preserving `KEY=value` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<String>,
}

impl EnvFile {
    /// Parse file content. Never fails; lines that are not assignments are
    /// kept verbatim.
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(String::from).collect(),
        }
    }

    /// Load a file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Write the file to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    /// File content, one line per entry, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// All assignments, unquoted. Later duplicates win.
    pub fn values(&self) -> HashMap<String, String> {
        self.lines
            .iter()
            .filter_map(|l| parse_assignment(l))
            .map(|(k, v)| (k.to_string(), unquote(v)))
            .collect()
    }

    /// Value of the first assignment of `key`, unquoted.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines
            .iter()
            .filter_map(|l| parse_assignment(l))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| unquote(v))
    }

    /// Set `key` to `value`.
    ///
    /// The first assignment of `key` is replaced in place and any later
    /// assignments are removed. If there is none, the line is appended.
    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{}={}", key, quote(value));
        let mut replaced = false;

        self.lines.retain_mut(|existing| {
            if parse_assignment(existing).is_some_and(|(k, _)| k == key) {
                if replaced {
                    return false;
                }
                *existing = line.clone();
                replaced = true;
            }
            true
        });

        if !replaced {
            self.lines.push(line);
        }
    }

    /// Create `dir/.env` unless it already exists.
    ///
    /// Copies `dir/.env.example` when present, otherwise writes `fallback`
    /// (if any). An existing `.env` is never overwritten.
    pub fn from_template(dir: &Path, fallback: Option<&str>) -> Result<EnvSource> {
        let env = dir.join(".env");
        if env.exists() {
            return Ok(EnvSource::Existing);
        }

        let example = dir.join(".env.example");
        if example.is_file() {
            fs::copy(&example, &env)?;
            tracing::info!("Copied {} to {}", example.display(), env.display());
            return Ok(EnvSource::Example);
        }

        match fallback {
            Some(template) => {
                fs::write(&env, template)?;
                tracing::info!("Wrote built-in template to {}", env.display());
                Ok(EnvSource::Template)
            }
            None => Ok(EnvSource::Missing),
        }
    }
}

/// Split `KEY=value`, ignoring comments and blank lines.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    let key = key.strip_prefix("export ").map(str::trim).unwrap_or(key);
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Remove surrounding quotes from a value.
///
/// Double-quoted values understand `\"` and `\\`; single-quoted values are
/// literal.
fn unquote(value: &str) -> String {
    if value.len() < 2 {
        return value.to_string();
    }
    if value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    if !(value.starts_with('"') && value.ends_with('"')) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value[1..value.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Double-quote values that a dotenv parser would otherwise split.
fn quote(value: &str) -> String {
    if value.contains(char::is_whitespace) || value.contains('#') || value.contains('"') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
