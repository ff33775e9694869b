//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use gearlog_setup::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("db_name", "inventory");
//!
//! let answer = ui.prompt(&Prompt::input("db_name", "Database name", "gearlog")).unwrap();
//! assert_eq!(answer.as_string(), "inventory");
//! assert!(ui.prompts_shown().contains(&"db_name".to_string()));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;

use super::{
    parse_yes, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, SummaryRow,
    UserInterface,
};

/// Mock UI implementation for testing.
///
/// Supports single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    spinners: Vec<String>,
    spinner_results: Rc<RefCell<Vec<String>>>,
    error_blocks: Vec<(String, String, Option<String>)>,
    summaries: Vec<(String, Vec<SummaryRow>)>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue responses for a key that is prompted more than once.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.prompt_queues.insert(
            key.to_string(),
            responses.into_iter().map(String::from).collect(),
        );
    }

    /// Set whether this mock reports itself as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Messages of every spinner that was started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Finish lines of spinners, prefixed with ✓, ✗ or ○.
    pub fn spinner_results(&self) -> Vec<String> {
        self.spinner_results.borrow().clone()
    }

    /// Captured error blocks as (command, output, hint).
    pub fn error_blocks(&self) -> &[(String, String, Option<String>)] {
        &self.error_blocks
    }

    /// Captured summaries as (title, rows).
    pub fn summaries(&self) -> &[(String, Vec<SummaryRow>)] {
        &self.summaries
    }

    /// Keys of every prompt that was shown, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
            || self
                .spinner_results
                .borrow()
                .iter()
                .any(|m| m.starts_with('✓') && m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
            || self
                .spinner_results
                .borrow()
                .iter()
                .any(|m| m.starts_with('✗') && m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    fn respond(prompt: &Prompt, response: String) -> PromptResult {
        if prompt.prompt_type == PromptType::Confirm {
            PromptResult::Bool(parse_yes(&response))
        } else {
            PromptResult::String(response)
        }
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        if let Some(response) = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(|q| q.pop_front())
        {
            return Ok(Self::respond(prompt, response));
        }

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(Self::respond(prompt, response.clone()));
        }

        let fallback = prompt.default.clone().unwrap_or_default();
        Ok(Self::respond(prompt, fallback))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            results: Rc::clone(&self.spinner_results),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.error_blocks.push((
            command.to_string(),
            output.to_string(),
            hint.map(|h| h.to_string()),
        ));
        if let Some(h) = hint {
            self.hints.push(h.to_string());
        }
    }

    fn show_summary(&mut self, title: &str, rows: &[SummaryRow]) {
        self.summaries.push((title.to_string(), rows.to_vec()));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that records its finish line in the owning `MockUI`.
#[derive(Debug)]
pub struct MockSpinner {
    results: Rc<RefCell<Vec<String>>>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.results.borrow_mut().push(format!("✓ {}", msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.results.borrow_mut().push(format!("✗ {}", msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.results.borrow_mut().push(format!("○ {}", msg));
    }
}
