//! Enabling the PHP extensions the backend needs.
//!
//! Fresh PHP installs (notably on Windows) ship `php.ini-development`
//! with every `extension=` line commented out. Only extensions that
//! `php -m` does not already report are touched.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::Result;
use crate::project::runner::CommandRunner;
use crate::shell::CommandOptions;
use crate::ui::UserInterface;

/// Extensions Laravel and the GearLog backend load.
pub const REQUIRED_EXTENSIONS: &[&str] =
    &["pdo_mysql", "mbstring", "openssl", "curl", "fileinfo", "zip"];

static RE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(;)?\s*extension\s*=\s*(?:php_)?([A-Za-z0-9_]+)(?:\.dll|\.so)?\s*$").unwrap()
});

/// Uncomment `extension=` lines for `names`.
///
/// Returns the new content and the extensions that were enabled. An
/// extension already enabled anywhere in the file is left alone, and only
/// the first commented line per extension is rewritten.
pub fn enable_extensions(content: &str, names: &[&str]) -> (String, Vec<String>) {
    let already: Vec<String> = content
        .lines()
        .filter_map(|l| RE_EXTENSION.captures(l))
        .filter(|c| c.get(1).is_none())
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_lowercase()))
        .collect();

    let mut enabled: Vec<String> = Vec::new();
    let mut lines = Vec::new();

    for line in content.lines() {
        let rewritten = RE_EXTENSION.captures(line).and_then(|caps| {
            caps.get(1)?;
            let name = caps.get(2)?.as_str().to_lowercase();
            let wanted = names.iter().any(|n| n.eq_ignore_ascii_case(&name));
            if !wanted || already.contains(&name) || enabled.contains(&name) {
                return None;
            }
            enabled.push(name);
            Some(line.trim_start().trim_start_matches(';').trim_start().to_string())
        });
        lines.push(rewritten.unwrap_or_else(|| line.to_string()));
    }

    let mut out = lines.join("\n");
    if content.ends_with('\n') {
        out.push('\n');
    }
    (out, enabled)
}

/// What `php --ini` reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniLocation {
    /// "Configuration File (php.ini) Path"
    pub config_dir: Option<PathBuf>,
    /// "Loaded Configuration File", `None` when PHP reports `(none)`.
    pub loaded: Option<PathBuf>,
}

fn ini_value(line: &str, label: &str) -> Option<PathBuf> {
    let value = line.strip_prefix(label)?.trim();
    if value.is_empty() || value == "(none)" {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Parse the output of `php --ini`.
pub fn parse_ini_output(output: &str) -> IniLocation {
    let mut location = IniLocation::default();
    for line in output.lines() {
        let line = line.trim();
        if let Some(dir) = ini_value(line, "Configuration File (php.ini) Path:") {
            location.config_dir = Some(dir);
        } else if let Some(file) = ini_value(line, "Loaded Configuration File:") {
            location.loaded = Some(file);
        }
    }
    location
}

/// Modules listed by `php -m`, lowercased.
pub fn parse_modules(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('['))
        .map(str::to_lowercase)
        .collect()
}

/// The loaded `php.ini`, creating one from the bundled template when PHP
/// runs without any.
///
/// Templates are searched in the reported configuration directory, then
/// next to the PHP executable. Returns `None` when there is nothing to copy.
pub fn ensure_ini(location: &IniLocation, php_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(loaded) = &location.loaded {
        return Ok(Some(loaded.clone()));
    }

    let dirs = location.config_dir.as_deref().into_iter().chain(php_dir);
    for dir in dirs {
        for template in ["php.ini-development", "php.ini-production"] {
            let source = dir.join(template);
            if source.is_file() {
                let target = dir.join("php.ini");
                fs::copy(&source, &target)?;
                tracing::info!("Created {} from {}", target.display(), source.display());
                return Ok(Some(target));
            }
        }
    }
    Ok(None)
}

fn capture(runner: &dyn CommandRunner, args: &[&str]) -> Option<String> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    match runner.run("php", &args, &CommandOptions::captured(None)) {
        Ok(result) if result.success => Some(result.stdout),
        Ok(result) => {
            tracing::debug!("php {} exited with {:?}", args.join(" "), result.exit_code);
            None
        }
        Err(e) => {
            tracing::debug!("php {}: {}", args.join(" "), e);
            None
        }
    }
}

/// Enable any missing [`REQUIRED_EXTENSIONS`] in the loaded `php.ini`.
///
/// Every problem is a warning: a PHP build with the extensions compiled in
/// works without any ini changes. Returns the extensions that were enabled.
pub fn enable_required_extensions(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    php_dir: Option<&Path>,
) -> Vec<String> {
    let Some(modules) = capture(runner, &["-m"]) else {
        ui.warning("Could not list PHP modules; skipping php.ini check");
        return Vec::new();
    };
    let loaded = parse_modules(&modules);
    let missing: Vec<&str> = REQUIRED_EXTENSIONS
        .iter()
        .copied()
        .filter(|ext| !loaded.iter().any(|m| m == ext))
        .collect();
    if missing.is_empty() {
        tracing::info!("All required PHP extensions are loaded");
        return Vec::new();
    }
    tracing::info!("Missing PHP extensions: {}", missing.join(", "));

    let location = capture(runner, &["--ini"])
        .map(|out| parse_ini_output(&out))
        .unwrap_or_default();

    let ini = match ensure_ini(&location, php_dir) {
        Ok(Some(ini)) => ini,
        Ok(None) => {
            ui.warning(&format!(
                "No php.ini found; enable these extensions manually: {}",
                missing.join(", ")
            ));
            return Vec::new();
        }
        Err(e) => {
            ui.warning(&format!("Could not create php.ini: {}", e));
            return Vec::new();
        }
    };

    let content = match fs::read_to_string(&ini) {
        Ok(content) => content,
        Err(e) => {
            ui.warning(&format!("Could not read {}: {}", ini.display(), e));
            return Vec::new();
        }
    };

    let (patched, enabled) = enable_extensions(&content, &missing);
    if enabled.is_empty() {
        ui.warning(&format!(
            "{} has no commented extension lines for: {}",
            ini.display(),
            missing.join(", ")
        ));
        return enabled;
    }

    if let Err(e) = fs::write(&ini, patched) {
        ui.warning(&format!(
            "Could not write {} ({}); enable these extensions manually: {}",
            ini.display(),
            e,
            enabled.join(", ")
        ));
        return Vec::new();
    }

    ui.success(&format!(
        "Enabled PHP extensions in {}: {}",
        ini.display(),
        enabled.join(", ")
    ));
    enabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupError;
    use crate::shell::CommandResult;
    use crate::ui::MockUI;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    const WINDOWS_INI: &str = "\
[PHP]
;extension=bz2
;extension=curl
;extension=fileinfo
;extension=mbstring
;extension=openssl
;extension=pdo_mysql
;extension=zip
";

    #[test]
    fn uncomments_requested_extensions() {
        let (out, enabled) = enable_extensions(WINDOWS_INI, &["curl", "zip"]);
        assert_eq!(enabled, vec!["curl", "zip"]);
        assert!(out.contains("\nextension=curl\n"));
        assert!(out.contains("\nextension=zip\n"));
        assert!(out.contains(";extension=bz2"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn enabling_twice_equals_once() {
        let (once, _) = enable_extensions(WINDOWS_INI, REQUIRED_EXTENSIONS);
        let (twice, enabled_again) = enable_extensions(&once, REQUIRED_EXTENSIONS);
        assert_eq!(once, twice);
        assert!(enabled_again.is_empty());
    }

    #[test]
    fn already_enabled_is_not_reported() {
        let content = "extension=curl\n;extension=curl\n;extension=zip\n";
        let (out, enabled) = enable_extensions(content, &["curl", "zip"]);
        assert_eq!(enabled, vec!["zip"]);
        assert_eq!(out, "extension=curl\n;extension=curl\nextension=zip\n");
    }

    #[test]
    fn accepts_dll_and_so_forms() {
        let content = "; extension = php_pdo_mysql.dll\n;extension=mbstring.so\n";
        let (out, enabled) = enable_extensions(content, &["pdo_mysql", "mbstring"]);
        assert_eq!(enabled, vec!["pdo_mysql", "mbstring"]);
        assert_eq!(out, "extension = php_pdo_mysql.dll\nextension=mbstring.so\n");
    }

    #[test]
    fn only_first_commented_line_is_enabled() {
        let content = ";extension=zip\n;extension=php_zip.dll\n";
        let (out, enabled) = enable_extensions(content, &["zip"]);
        assert_eq!(enabled, vec!["zip"]);
        assert_eq!(out, "extension=zip\n;extension=php_zip.dll\n");
    }

    #[test]
    fn parses_php_ini_output() {
        let output = "\
Configuration File (php.ini) Path: /etc/php/8.3/cli
Loaded Configuration File:         /etc/php/8.3/cli/php.ini
Scan for additional .ini files in: /etc/php/8.3/cli/conf.d
";
        let location = parse_ini_output(output);
        assert_eq!(location.config_dir, Some(PathBuf::from("/etc/php/8.3/cli")));
        assert_eq!(location.loaded, Some(PathBuf::from("/etc/php/8.3/cli/php.ini")));
    }

    #[test]
    fn parses_none_loaded() {
        let output = "Configuration File (php.ini) Path: C:\\php\nLoaded Configuration File:         (none)\n";
        let location = parse_ini_output(output);
        assert_eq!(location.config_dir, Some(PathBuf::from("C:\\php")));
        assert_eq!(location.loaded, None);
    }

    #[test]
    fn parses_module_list() {
        let modules = parse_modules("[PHP Modules]\nCore\ncurl\nPDO\npdo_mysql\n\n[Zend Modules]\n");
        assert_eq!(modules, vec!["core", "curl", "pdo", "pdo_mysql"]);
    }

    #[test]
    fn ensure_ini_prefers_loaded_file() {
        let location = IniLocation {
            config_dir: None,
            loaded: Some(PathBuf::from("/etc/php.ini")),
        };
        assert_eq!(
            ensure_ini(&location, None).unwrap(),
            Some(PathBuf::from("/etc/php.ini"))
        );
    }

    #[test]
    fn ensure_ini_copies_development_template() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("php.ini-production"), "prod").unwrap();
        fs::write(temp.path().join("php.ini-development"), "dev").unwrap();
        let location = IniLocation {
            config_dir: Some(temp.path().to_path_buf()),
            loaded: None,
        };

        let ini = ensure_ini(&location, None).unwrap().unwrap();
        assert_eq!(ini, temp.path().join("php.ini"));
        assert_eq!(fs::read_to_string(ini).unwrap(), "dev");
    }

    #[test]
    fn ensure_ini_falls_back_to_php_dir() {
        let config_dir = TempDir::new().unwrap();
        let php_dir = TempDir::new().unwrap();
        fs::write(php_dir.path().join("php.ini-production"), "prod").unwrap();
        let location = IniLocation {
            config_dir: Some(config_dir.path().to_path_buf()),
            loaded: None,
        };

        let ini = ensure_ini(&location, Some(php_dir.path())).unwrap().unwrap();
        assert_eq!(ini, php_dir.path().join("php.ini"));
    }

    #[test]
    fn ensure_ini_without_templates_is_none() {
        let temp = TempDir::new().unwrap();
        let location = IniLocation {
            config_dir: Some(temp.path().to_path_buf()),
            loaded: None,
        };
        assert_eq!(ensure_ini(&location, None).unwrap(), None);
    }

    /// Answers `php -m` and `php --ini` from canned output.
    struct PhpStub {
        outputs: HashMap<&'static str, String>,
    }

    impl CommandRunner for PhpStub {
        fn run(
            &self,
            _program: &str,
            args: &[String],
            _options: &CommandOptions,
        ) -> crate::error::Result<CommandResult> {
            let key = args.first().map(String::as_str).unwrap_or("");
            let stdout = self.outputs.get(key).cloned().ok_or(SetupError::CommandFailed {
                command: format!("php {}", key),
                code: None,
            })?;
            Ok(CommandResult {
                exit_code: Some(0),
                stdout,
                stderr: String::new(),
                duration: Duration::ZERO,
                success: true,
            })
        }
    }

    #[test]
    fn enables_missing_extensions_in_loaded_ini() {
        let temp = TempDir::new().unwrap();
        let ini = temp.path().join("php.ini");
        fs::write(&ini, WINDOWS_INI).unwrap();

        let stub = PhpStub {
            outputs: HashMap::from([
                ("-m", "[PHP Modules]\ncurl\nmbstring\nopenssl\nfileinfo\n".to_string()),
                (
                    "--ini",
                    format!("Loaded Configuration File: {}\n", ini.display()),
                ),
            ]),
        };
        let mut ui = MockUI::new();

        let enabled = enable_required_extensions(&stub, &mut ui, None);
        assert_eq!(enabled, vec!["pdo_mysql", "zip"]);
        let content = fs::read_to_string(&ini).unwrap();
        assert!(content.contains("\nextension=pdo_mysql\n"));
        assert!(content.contains(";extension=curl"));
        assert!(ui.has_success("pdo_mysql, zip"));
    }

    #[test]
    fn nothing_to_do_when_all_loaded() {
        let stub = PhpStub {
            outputs: HashMap::from([(
                "-m",
                "curl\nmbstring\nopenssl\nfileinfo\npdo_mysql\nzip\n".to_string(),
            )]),
        };
        let mut ui = MockUI::new();
        assert!(enable_required_extensions(&stub, &mut ui, None).is_empty());
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn missing_php_is_a_warning() {
        let stub = PhpStub {
            outputs: HashMap::new(),
        };
        let mut ui = MockUI::new();
        assert!(enable_required_extensions(&stub, &mut ui, None).is_empty());
        assert!(ui.has_warning("Could not list PHP modules"));
    }
}
