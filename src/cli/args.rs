//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// gearlog-setup - Install GearLog's toolchain and bootstrap a working checkout.
#[derive(Debug, Parser)]
#[command(name = "gearlog-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides ./gearlog-setup.yml and ~/.gearlog-setup/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output, including the output of every command
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log file (default: ~/.gearlog-setup/setup.log)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install dependencies and set up GearLog (default if no command specified)
    Run(RunArgs),

    /// Report which required tools are installed, without installing anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Directory to clone GearLog into (default: ~/Desktop/GearLog)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Repository URL to clone
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Branch to clone
    #[arg(long)]
    pub branch: Option<String>,

    /// Skip checking and installing PHP, Composer, MySQL and Node.js
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip the frontend (npm) setup
    #[arg(long)]
    pub skip_frontend: bool,

    /// Use defaults, no prompts (answers can be set with GEARLOG_PROMPT_<KEY>)
    #[arg(short = 'y', long, visible_alias = "non-interactive")]
    pub yes: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["gearlog-setup"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "gearlog-setup",
            "run",
            "--dir",
            "/tmp/gl",
            "--branch",
            "develop",
            "--skip-deps",
            "--yes",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.dir, Some(PathBuf::from("/tmp/gl")));
                assert_eq!(args.branch.as_deref(), Some("develop"));
                assert!(args.skip_deps);
                assert!(!args.skip_frontend);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn non_interactive_alias() {
        let cli = Cli::try_parse_from(["gearlog-setup", "run", "--non-interactive"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run(RunArgs { yes: true, .. }))));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gearlog-setup",
            "check",
            "--json",
            "--debug",
            "--log-file",
            "/tmp/x.log",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/x.log")));
        assert!(matches!(cli.command, Some(Commands::Check(CheckArgs { json: true }))));
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["gearlog-setup", "-v", "-q"]).is_err());
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["gearlog-setup", "completions"]).is_err());
        assert!(Cli::try_parse_from(["gearlog-setup", "completions", "zsh"]).is_ok());
    }
}
