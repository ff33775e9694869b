//! Non-interactive UI for CI, `--yes` and piped runs.

use std::collections::HashMap;

use crate::error::{Result, SetupError};

use super::{
    parse_yes, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, SummaryRow,
    UserInterface,
};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "GEARLOG_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `GEARLOG_PROMPT_<KEY>` environment variables,
/// then from the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .cloned();

        let Some(answer) = answer else {
            return Err(SetupError::PromptUnavailable {
                key: prompt.key.clone(),
                message: format!(
                    "no default value; set {} to answer it non-interactively",
                    env_key
                ),
            });
        };

        tracing::debug!("prompt '{}' answered non-interactively", prompt.key);
        if prompt.prompt_type == PromptType::Confirm {
            return Ok(PromptResult::Bool(parse_yes(&answer)));
        }
        Ok(PromptResult::String(answer))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n== {} ==\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        eprintln!();
        eprintln!("    ┌─ Command ──────────────────────────");
        eprintln!("    │ {}", command);
        if !output.is_empty() {
            eprintln!("    ├─ Output ───────────────────────────");
            for line in output.lines() {
                eprintln!("    │ {}", line);
            }
        }
        eprintln!("    └────────────────────────────────────");
        if let Some(h) = hint {
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_summary(&mut self, title: &str, rows: &[SummaryRow]) {
        if !self.mode.shows_spinners() {
            return;
        }
        println!();
        println!("{}:", title);
        for row in rows {
            let icon = if row.ok { "✓" } else { "✗" };
            println!("  {} {:<16} {}", icon, row.label, row.detail);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("○ {}", msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui_with(pairs: &[(&str, &str)]) -> NonInteractiveUI {
        let overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NonInteractiveUI::with_overrides(OutputMode::Silent, overrides)
    }

    #[test]
    fn non_interactive_is_not_interactive() {
        assert!(!ui_with(&[]).is_interactive());
    }

    #[test]
    fn prompt_uses_default() {
        let mut ui = ui_with(&[]);
        let result = ui
            .prompt(&Prompt::input("db_name", "Database name", "gearlog"))
            .unwrap();
        assert_eq!(result, PromptResult::String("gearlog".to_string()));
    }

    #[test]
    fn env_override_wins_over_default() {
        let mut ui = ui_with(&[("GEARLOG_PROMPT_DB_NAME", "inventory")]);
        let result = ui
            .prompt(&Prompt::input("db_name", "Database name", "gearlog"))
            .unwrap();
        assert_eq!(result.as_string(), "inventory");
    }

    #[test]
    fn confirm_answers_are_bools() {
        let mut ui = ui_with(&[("GEARLOG_PROMPT_USE_EXISTING", "yes")]);
        let yes = ui
            .prompt(&Prompt::confirm("use_existing", "Use it?", false))
            .unwrap();
        assert_eq!(yes, PromptResult::Bool(true));

        let no = ui
            .prompt(&Prompt::confirm("continue_as_root", "Continue?", false))
            .unwrap();
        assert_eq!(no, PromptResult::Bool(false));
    }

    #[test]
    fn prompt_without_default_fails() {
        let mut ui = ui_with(&[]);
        let prompt = Prompt {
            key: "token".to_string(),
            question: "Token".to_string(),
            prompt_type: PromptType::Input,
            default: None,
        };
        let err = ui.prompt(&prompt).unwrap_err();
        assert!(err.to_string().contains("GEARLOG_PROMPT_TOKEN"));
    }
}
