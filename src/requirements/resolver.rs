//! The dependency resolver: probe, install, re-probe.

use crate::requirements::host::Host;
use crate::requirements::installer::Installer;
use crate::requirements::probe::{probe, ToolLocator};
use crate::requirements::registry::ToolRequirement;
use crate::requirements::status::{InstallOutcome, InstallReport, ToolStatus};
use crate::requirements::strategy::{InstallPlan, Strategy, StrategyTable};
use crate::shell::interrupt;
use crate::ui::UserInterface;

/// Makes sure required tools are present at an adequate version.
///
/// All system access goes through the [`ToolLocator`] and [`Installer`]
/// capabilities, and the install commands come from a [`StrategyTable`]
/// keyed by the host platform.
pub struct DependencyResolver<'a> {
    host: Host,
    locator: &'a dyn ToolLocator,
    installer: &'a dyn Installer,
    strategies: StrategyTable,
    cancelled: fn() -> bool,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(host: Host, locator: &'a dyn ToolLocator, installer: &'a dyn Installer) -> Self {
        Self {
            host,
            locator,
            installer,
            strategies: StrategyTable::builtin(),
            cancelled: interrupt::interrupted,
        }
    }

    /// Replace the platform strategy table.
    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = strategies;
        self
    }

    /// Replace the check consulted between install steps.
    pub fn with_cancel_check(mut self, cancelled: fn() -> bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Probe a tool without installing anything.
    pub fn check(&self, requirement: &ToolRequirement) -> ToolStatus {
        probe(requirement, self.locator)
    }

    /// Ensure one requirement is satisfied.
    ///
    /// Never fails: every problem becomes a failed [`InstallOutcome`] with a
    /// message the operator can act on. An adequate tool is left untouched.
    pub fn ensure(
        &self,
        requirement: &ToolRequirement,
        ui: &mut dyn UserInterface,
    ) -> InstallOutcome {
        let label = requirement.label();
        let status = self.check(requirement);

        if status.meets_minimum {
            let message = format!("{} found ({})", label, status.describe());
            tracing::info!("{}", message);
            ui.success(&message);
            return InstallOutcome::success(&label, message, false);
        }

        let shortfall = shortfall(requirement, &status);
        tracing::info!("{}: {}", label, shortfall);
        ui.warning(&format!("{}: {}", label, shortfall));

        let plan = match self.strategies.plan_for(requirement, &self.host) {
            Strategy::Plan(plan) => plan,
            Strategy::Unavailable { guidance } => {
                tracing::warn!("No install strategy for {}: {}", label, guidance);
                ui.error(&guidance);
                return InstallOutcome::failure(&label, guidance, false);
            }
        };

        ui.message(&format!(
            "Installing {} via {}...",
            requirement.display_name, plan.via
        ));
        if let Some(failed) = self.run_plan(requirement, &plan) {
            ui.error(&failed.message);
            return failed;
        }

        self.verify(requirement, &plan, ui)
    }

    /// Ensure every requirement in order and collect the outcomes.
    pub fn ensure_all(
        &self,
        requirements: &[ToolRequirement],
        ui: &mut dyn UserInterface,
    ) -> InstallReport {
        let mut report = InstallReport::default();
        for requirement in requirements {
            if (self.cancelled)() {
                break;
            }
            report.push(self.ensure(requirement, ui));
        }
        tracing::info!(
            "Dependencies: installed/present {:?}, failed {:?}",
            report.installed(),
            report.failed()
        );
        report
    }

    /// Run the plan's install steps. Returns the failure outcome, if any.
    fn run_plan(&self, requirement: &ToolRequirement, plan: &InstallPlan) -> Option<InstallOutcome> {
        let label = requirement.label();
        let mut failure = None;

        for step in &plan.steps {
            if (self.cancelled)() {
                failure = Some(InstallOutcome::failure(
                    &label,
                    format!("Installation of {} was interrupted", requirement.display_name),
                    true,
                ));
                break;
            }

            let result = self.installer.run(step);
            if result.succeeded {
                continue;
            }
            if !step.required {
                tracing::warn!("Optional step failed: {}", result.message);
                continue;
            }

            let mut outcome = InstallOutcome::failure(
                &label,
                format!(
                    "Failed to install {}: {}. {}",
                    requirement.display_name,
                    result.message,
                    requirement.manual_hint()
                ),
                true,
            );
            if let Some(detail) = result.detail {
                outcome = outcome.with_detail(detail);
            }
            failure = Some(outcome);
            break;
        }

        for path in &plan.cleanup {
            self.installer.cleanup(path);
        }
        failure
    }

    /// Re-probe after a plan ran with every required step exiting 0.
    fn verify(
        &self,
        requirement: &ToolRequirement,
        plan: &InstallPlan,
        ui: &mut dyn UserInterface,
    ) -> InstallOutcome {
        let label = requirement.label();
        let after = self.check(requirement);

        if after.present && !after.meets_minimum {
            let message = format!(
                "{} was installed but {} is still below {}",
                requirement.display_name,
                after.describe(),
                requirement.minimum
            );
            tracing::warn!("{}", message);
            ui.error(&message);
            return InstallOutcome::failure(&label, message, true);
        }

        if !after.present && after.path.is_some() {
            let message = format!(
                "{} was installed but its version could not be read ({})",
                requirement.display_name,
                after.describe()
            );
            tracing::warn!("{}", message);
            ui.error(&message);
            return InstallOutcome::failure(&label, message, true);
        }

        self.run_post_install(plan);

        let mut message = if after.meets_minimum {
            format!("{} installed ({})", label, after.describe())
        } else {
            format!(
                "{} installed, but `{}` is not on PATH yet. Restart your terminal or update PATH.",
                label, requirement.command
            )
        };
        if let Some(note) = &plan.note {
            message.push_str(&format!(" {}", note));
        }
        tracing::info!("{}", message);
        ui.success(&message);
        InstallOutcome::success(&label, message, true)
    }

    fn run_post_install(&self, plan: &InstallPlan) {
        for step in &plan.post_install {
            let result = self.installer.run(step);
            if !result.succeeded {
                tracing::warn!("Post-install step failed: {}", result.message);
            }
        }
    }
}

fn shortfall(requirement: &ToolRequirement, status: &ToolStatus) -> String {
    if status.present {
        format!(
            "found {}, need {} or newer",
            status.describe(),
            requirement.minimum
        )
    } else if status.path.is_some() {
        format!("{}, treating as not installed", status.describe())
    } else {
        "not found".to_string()
    }
}
