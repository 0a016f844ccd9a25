//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::progress::format_duration;
use super::theme::BasecampTheme;
use super::{ConfirmPrompt, OutputMode, RunSummary, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Confirm prompts are never shown; the answer comes from a
/// `BASECAMP_CONFIRM_<KEY>` environment variable when set, otherwise the
/// prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        // Collect BASECAMP_CONFIRM_* env vars
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("BASECAMP_CONFIRM_"))
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

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool> {
        let env_key = format!("BASECAMP_CONFIRM_{}", prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            let answer = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "y");
            return Ok(answer);
        }

        Ok(prompt.default)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_status() {
            println!("[{}/{}]", current, total);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  💡 {}", hint);
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
            eprintln!();
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");

        for step in &summary.step_results {
            let icon = step.status.icon();
            let duration_str = step.duration.map(format_duration).unwrap_or_default();
            let detail_str = step.detail.as_deref().unwrap_or("");

            let right_side = if !duration_str.is_empty() {
                duration_str
            } else if !detail_str.is_empty() {
                detail_str.to_string()
            } else {
                String::new()
            };

            println!("  │ {} {:<20} {}", icon, step.name, right_side);
        }

        println!("  ├────────────────────────────────────");
        println!(
            "  │ Total: {} · {} run · {} skipped",
            format_duration(summary.total_duration),
            summary.steps_run,
            summary.steps_skipped,
        );
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that does nothing (for non-interactive mode).
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        let theme = BasecampTheme::new();
        println!("{}", theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        let theme = BasecampTheme::new();
        println!("{}", theme.format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        let theme = BasecampTheme::new();
        println!("{}", theme.format_skipped(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn confirm_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let prompt = ConfirmPrompt::new("recreate_venv", "Recreate?", true);

        assert!(ui.confirm(&prompt).unwrap());

        let prompt = ConfirmPrompt::new("recreate_venv", "Recreate?", false);
        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn confirm_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "BASECAMP_CONFIRM_RECREATE_VENV".to_string(),
            "no".to_string(),
        );

        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
        let prompt = ConfirmPrompt::new("recreate_venv", "Recreate?", true);

        assert!(!ui.confirm(&prompt).unwrap());
    }

    #[test]
    fn confirm_env_override_accepts_truthy_values() {
        for value in ["1", "true", "yes", "y", "YES"] {
            let mut overrides = HashMap::new();
            overrides.insert("BASECAMP_CONFIRM_X".to_string(), value.to_string());
            let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
            let prompt = ConfirmPrompt::new("x", "?", false);
            assert!(ui.confirm(&prompt).unwrap(), "value {} should be truthy", value);
        }
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn noop_spinner_methods() {
        let mut spinner = NoopSpinner;
        spinner.set_message("test");
        spinner.finish_success("done");
        spinner.finish_error("failed");
        spinner.finish_skipped("skipped");
    }
}
