//! Terminal user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Spinners, themes, and run summaries
//!
//! # Example
//!
//! ```
//! use basecamp::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("My Project");
//! ui.success("Environment ready");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_duration, RunSummary, StatusKind, StepLine};
pub use spinner::{live_output_callback, ProgressSpinner};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, BasecampTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show progress (e.g., "[3/6]").
    fn show_progress(&mut self, current: usize, total: usize);

    /// Show a contextual hint.
    fn show_hint(&mut self, hint: &str);

    /// Show a failed command with its captured output.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);

    /// The underlying progress bar, when one exists, for live output
    /// streaming.
    fn progress_bar(&self) -> Option<indicatif::ProgressBar> {
        None
    }
}

/// A yes/no question to show to the user.
#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    /// Unique key for the prompt (used for non-interactive overrides).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer assumed when the user just presses enter, and taken outright
    /// in non-interactive mode.
    pub default: bool,
}

impl ConfirmPrompt {
    /// Create a confirm prompt.
    pub fn new(key: impl Into<String>, question: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_prompt_carries_fields() {
        let prompt = ConfirmPrompt::new("recreate_venv", "Recreate it?", true);
        assert_eq!(prompt.key, "recreate_venv");
        assert_eq!(prompt.question, "Recreate it?");
        assert!(prompt.default);
    }
}
