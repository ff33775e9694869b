//! Check command implementation.
//!
//! The `gearlog-setup check` command probes every required tool and reports
//! its status. It never installs anything.

use serde_json::json;

use crate::cli::args::CheckArgs;
use crate::config::{effective_requirements, SetupConfig};
use crate::error::Result;
use crate::requirements::{probe, Platform, SystemLocator, ToolLocator, ToolRequirement, ToolStatus};
use crate::ui::{SummaryRow, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
    config: SetupConfig,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs, config: SetupConfig) -> Self {
        Self { args, config }
    }

    /// Probe and report using `locator`. Exit code 1 when anything is unmet.
    pub fn execute_with(
        &self,
        locator: &dyn ToolLocator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let requirements = effective_requirements(&self.config)?;
        let statuses: Vec<(ToolRequirement, ToolStatus)> = requirements
            .into_iter()
            .map(|req| {
                let status = probe(&req, locator);
                (req, status)
            })
            .collect();
        let all_met = statuses.iter().all(|(_, s)| s.meets_minimum);

        if self.args.json {
            println!("{}", render_json(Platform::current(), &statuses));
        } else {
            ui.show_header("GearLog Requirements");
            let rows: Vec<SummaryRow> = statuses
                .iter()
                .map(|(req, status)| SummaryRow::new(req.label(), status.meets_minimum, status.describe()))
                .collect();
            ui.show_summary("Requirements", &rows);
            if all_met {
                ui.success("All requirements are met");
            } else {
                ui.warning("Some requirements are not met. Run `gearlog-setup run` to install them.");
            }
        }

        Ok(if all_met {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

/// JSON document printed by `check --json`.
pub fn render_json(platform: Platform, statuses: &[(ToolRequirement, ToolStatus)]) -> String {
    let tools: Vec<serde_json::Value> = statuses
        .iter()
        .map(|(req, status)| {
            json!({
                "name": req.name,
                "display_name": req.display_name,
                "minimum": req.minimum.to_string(),
                "present": status.present,
                "version": status.version.map(|v| v.to_string()),
                "detected_version": status.detected_version,
                "path": status.path.as_ref().map(|p| p.display().to_string()),
                "meets_minimum": status.meets_minimum,
            })
        })
        .collect();

    let doc = json!({
        "checked_at": chrono::Utc::now().to_rfc3339(),
        "platform": platform.name(),
        "all_met": statuses.iter().all(|(_, s)| s.meets_minimum),
        "tools": tools,
    });
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string())
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.execute_with(&SystemLocator, ui)
    }
}
