//! Repository checkout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};
use crate::project::checkpoint;
use crate::project::runner::{run_step, CommandRunner, StepCommand};
use crate::ui::{Prompt, UserInterface};

/// How the project directory was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    UsedExisting,
}

/// `~/Desktop/GearLog`, or `~/GearLog` when there is no Desktop.
pub fn default_install_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => default_install_dir_in(&home),
        None => PathBuf::from("GearLog"),
    }
}

fn default_install_dir_in(home: &Path) -> PathBuf {
    let desktop = home.join("Desktop");
    if desktop.is_dir() {
        desktop.join("GearLog")
    } else {
        home.join("GearLog")
    }
}

fn is_non_empty_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    if !dir.is_dir() {
        return Err(SetupError::step(
            "clone",
            format!("{} exists and is not a directory", dir.display()),
        ));
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}

/// Clone `url` into `dir`.
///
/// A non-empty `dir` is reused only when the operator confirms it.
pub fn clone_repository(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    url: &str,
    branch: Option<&str>,
    dir: &Path,
    cancelled: fn() -> bool,
) -> Result<CloneOutcome> {
    if is_non_empty_dir(dir)? {
        ui.warning(&format!(
            "Directory {} already exists and is not empty",
            dir.display()
        ));
        let answer = ui.prompt(&Prompt::confirm(
            "use_existing",
            "Do you want to use the existing directory?",
            true,
        ))?;
        if !answer.is_yes() {
            return Err(SetupError::step(
                "clone",
                format!("{} is not empty and was not reused", dir.display()),
            ));
        }
        tracing::info!("Using existing directory {}", dir.display());
        ui.success("Using existing directory");
        return Ok(CloneOutcome::UsedExisting);
    }

    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let target = dir.display().to_string();
    let mut args = vec!["clone"];
    if let Some(branch) = branch {
        args.extend(["--branch", branch]);
    }
    args.extend([url, target.as_str()]);

    let label = format!("Cloning {} into {}", url, target);
    let cloned = run_step(runner, ui, &StepCommand::new(&label, "git", &args));
    checkpoint(cancelled)?;
    if !cloned {
        return Err(SetupError::step("clone", format!("git clone of {} failed", url)));
    }
    Ok(CloneOutcome::Cloned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::runner::fake::FakeRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    const URL: &str = "https://example.com/GearLog.git";

    fn never() -> bool {
        false
    }

    fn always() -> bool {
        true
    }

    #[test]
    fn default_dir_prefers_desktop() {
        let home = TempDir::new().unwrap();
        assert_eq!(default_install_dir_in(home.path()), home.path().join("GearLog"));

        fs::create_dir(home.path().join("Desktop")).unwrap();
        assert_eq!(
            default_install_dir_in(home.path()),
            home.path().join("Desktop").join("GearLog")
        );
    }

    #[test]
    fn clones_into_missing_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("GearLog");
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();

        let outcome = clone_repository(&runner, &mut ui, URL, None, &dir, never).unwrap();
        assert_eq!(outcome, CloneOutcome::Cloned);
        assert_eq!(runner.lines(), vec![format!("git clone {} {}", URL, dir.display())]);
        assert!(dir.parent().unwrap().is_dir());
    }

    #[test]
    fn passes_branch() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("GearLog");
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();

        clone_repository(&runner, &mut ui, URL, Some("develop"), &dir, never).unwrap();
        assert!(runner.lines()[0].starts_with("git clone --branch develop "));
    }

    #[test]
    fn empty_existing_dir_is_cloned_into() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();

        let outcome = clone_repository(&runner, &mut ui, URL, None, temp.path(), never).unwrap();
        assert_eq!(outcome, CloneOutcome::Cloned);
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn non_empty_dir_is_reused_when_confirmed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "GearLog").unwrap();
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response("use_existing", "y");

        let outcome = clone_repository(&runner, &mut ui, URL, None, temp.path(), never).unwrap();
        assert_eq!(outcome, CloneOutcome::UsedExisting);
        assert!(runner.lines().is_empty());
        assert!(ui.has_warning("already exists and is not empty"));
    }

    #[test]
    fn declining_existing_dir_is_critical() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "GearLog").unwrap();
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response("use_existing", "n");

        let err = clone_repository(&runner, &mut ui, URL, None, temp.path(), never).unwrap_err();
        assert!(matches!(err, SetupError::StepFailed { ref step, .. } if step == "clone"));
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn failed_clone_is_critical() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().failing("git clone");
        let mut ui = MockUI::new();

        let err =
            clone_repository(&runner, &mut ui, URL, None, &temp.path().join("x"), never).unwrap_err();
        assert!(err.to_string().contains("git clone"));
    }

    #[test]
    fn file_in_place_of_dir_is_critical() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("GearLog");
        fs::write(&file, "").unwrap();
        let runner = FakeRunner::new();
        let mut ui = MockUI::new();

        let err = clone_repository(&runner, &mut ui, URL, None, &file, never).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn interrupted_clone_is_a_cancellation() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::new().failing("git clone");
        let mut ui = MockUI::new();

        let dir = temp.path().join("GearLog");

        let err = clone_repository(&runner, &mut ui, URL, None, &dir, always).unwrap_err();
        assert!(matches!(err, SetupError::Cancelled));
    }
}
