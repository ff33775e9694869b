//! Run command implementation.
//!
//! The `gearlog-setup run` command installs missing tools, clones GearLog
//! and sets up the backend and frontend.

use std::path::PathBuf;

use crate::cli::args::RunArgs;
use crate::config::{effective_requirements, expand_home, SetupConfig};
use crate::error::Result;
use crate::project::{default_install_dir, run_setup, SetupOptions, SystemRunner};
use crate::requirements::{DependencyResolver, Host, SystemInstaller, SystemLocator};
use crate::shell::interrupt;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
    config: SetupConfig,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(args: RunArgs, config: SetupConfig) -> Self {
        Self { args, config }
    }

    /// Merge CLI flags over the configuration.
    pub fn options(&self) -> SetupOptions {
        let install_dir = self
            .args
            .dir
            .as_deref()
            .map(expand_home)
            .or_else(|| self.config.install_dir.clone())
            .unwrap_or_else(default_install_dir);

        SetupOptions {
            repo_url: self
                .args
                .repo
                .clone()
                .unwrap_or_else(|| self.config.repo_url.clone()),
            branch: self.args.branch.clone().or_else(|| self.config.branch.clone()),
            install_dir: absolute(install_dir),
            database: self.config.database.clone(),
            skip_deps: self.args.skip_deps,
            skip_frontend: self.args.skip_frontend,
        }
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let requirements = effective_requirements(&self.config)?;
        let options = self.options();
        tracing::info!(
            "Setup starting: repo {}, dir {}",
            options.repo_url,
            options.install_dir.display()
        );

        let locator = SystemLocator;
        let installer = SystemInstaller;
        let host = Host::detect(&locator);
        let resolver = DependencyResolver::new(host, &locator, &installer);

        let summary = run_setup(
            &resolver,
            &SystemRunner,
            ui,
            &requirements,
            &options,
            interrupt::interrupted,
        )?;

        tracing::info!(
            "Setup finished in {} (failed dependencies: {:?})",
            summary.project_dir.display(),
            summary.report.failed()
        );
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn flags_override_config() {
        let mut config = SetupConfig::default();
        config.branch = Some("main".to_string());
        config.install_dir = Some(PathBuf::from("/opt/from-config"));
        let args = RunArgs {
            dir: Some(PathBuf::from("/opt/from-flag")),
            repo: Some("https://example.com/fork.git".to_string()),
            branch: Some("develop".to_string()),
            ..Default::default()
        };

        let options = RunCommand::new(args, config).options();
        assert_eq!(options.install_dir, PathBuf::from("/opt/from-flag"));
        assert_eq!(options.repo_url, "https://example.com/fork.git");
        assert_eq!(options.branch.as_deref(), Some("develop"));
    }

    #[test]
    fn config_fills_missing_flags() {
        let mut config = SetupConfig::default();
        config.branch = Some("main".to_string());
        config.install_dir = Some(PathBuf::from("/opt/from-config"));
        config.database.name = "inventory".to_string();

        let options = RunCommand::new(RunArgs::default(), config).options();
        assert_eq!(options.install_dir, PathBuf::from("/opt/from-config"));
        assert_eq!(options.branch.as_deref(), Some("main"));
        assert_eq!(options.database.name, "inventory");
        assert!(options.repo_url.ends_with("GearLog.git"));
    }

    #[test]
    fn default_dir_is_gearlog() {
        let options = RunCommand::new(RunArgs::default(), SetupConfig::default()).options();
        assert_eq!(options.install_dir.file_name(), Some(Path::new("GearLog").as_os_str()));
        assert!(options.install_dir.is_absolute());
    }

    #[test]
    fn relative_dir_is_made_absolute() {
        let args = RunArgs {
            dir: Some(PathBuf::from("gl")),
            ..Default::default()
        };
        let options = RunCommand::new(args, SetupConfig::default()).options();
        assert!(options.install_dir.is_absolute());
        assert!(options.install_dir.ends_with("gl"));
    }
}
