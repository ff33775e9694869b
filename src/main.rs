//! gearlog-setup CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use gearlog_setup::cli::{Cli, CommandDispatcher, Commands};
use gearlog_setup::config::{default_log_file, load_config, SetupConfig};
use gearlog_setup::shell::{interrupt, is_ci};
use gearlog_setup::ui::{create_ui, set_colors_enabled, OutputMode};
use gearlog_setup::SetupError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG (and adds a stderr layer)
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Every run is appended to `log_file`. The returned guard flushes the file
/// writer when dropped.
fn init_tracing(debug: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = if debug {
        EnvFilter::new("gearlog_setup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gearlog_setup=info"))
    };

    let (file_layer, guard) = match log_file.and_then(open_log_writer) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
                    .with_writer(writer),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    let stderr_layer = debug.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .ok();

    guard
}

fn open_log_writer(
    path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty())?;
    let name = path.file_name()?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {}", dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, name);
    Some(tracing_appender::non_blocking(appender))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        set_colors_enabled(false);
    }
    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = if matches!(cli.command, Some(Commands::Completions(_))) {
        Ok(SetupConfig::default())
    } else {
        load_config(cli.config.as_deref(), &working_dir)
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.log_file.clone()))
        .or_else(default_log_file);
    let _guard = init_tracing(cli.debug, log_file.as_deref());

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    tracing::info!("gearlog-setup {} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("args: {:?}", cli);

    if let Err(e) = interrupt::install_handler() {
        tracing::warn!("{}", e);
    }

    let is_interactive = match &cli.command {
        Some(Commands::Run(args)) => !args.yes && !is_ci(),
        _ => !is_ci(),
    };
    let mut ui = create_ui(is_interactive, output_mode);

    let dispatcher = CommandDispatcher::new(working_dir, config);
    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code.clamp(0, 255) as u8),
        Err(SetupError::Cancelled) => {
            tracing::warn!("Setup cancelled by user");
            ui.error("Setup cancelled by user");
            ExitCode::from(1)
        }
        Err(e @ (SetupError::ConfigParseError { .. } | SetupError::ConfigValidationError { .. })) => {
            tracing::error!("{}", e);
            ui.error(&format!("Error: {}", e));
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Setup failed: {}", cause_chain(&e));
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}

/// Error message followed by its sources, for the log file.
fn cause_chain(e: &SetupError) -> String {
    let mut parts = vec![e.to_string()];
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
