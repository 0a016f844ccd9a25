//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::process::OutputLine;

use super::theme::BasecampTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    indent: usize,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        Self::with_indent(message, 0)
    }

    /// Create a new spinner with indentation.
    pub fn with_indent(message: &str, indent: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        let prefix = " ".repeat(indent);
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template(&format!("{}{{spinner:.cyan}} {{msg}}", prefix))
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, indent }
    }

    /// Create a spinner that doesn't show (for silent mode).
    pub fn hidden() -> Self {
        let bar = ProgressBar::hidden();
        Self { bar, indent: 0 }
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let prefix = " ".repeat(self.indent);
        let theme = BasecampTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar
            .finish_with_message(format!("{}{}", prefix, theme.format_success(msg)));
    }

    fn finish_error(&mut self, msg: &str) {
        let prefix = " ".repeat(self.indent);
        let theme = BasecampTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar
            .finish_with_message(format!("{}{}", prefix, theme.format_error(msg)));
    }

    fn finish_skipped(&mut self, msg: &str) {
        let prefix = " ".repeat(self.indent);
        let theme = BasecampTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar
            .finish_with_message(format!("{}{}", prefix, theme.format_skipped(msg)));
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

/// Create an output callback that updates a spinner with live output lines.
///
/// The callback maintains a ring buffer of the last `max_lines` output lines
/// and updates the spinner message to show the base message plus those lines.
/// This gives users feedback that the installer is actually making progress.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    indent: usize,
    max_lines: usize,
) -> crate::process::OutputCallback {
    let buffer: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    let theme = BasecampTheme::new();

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) => s.trim_end().to_string(),
            OutputLine::Stderr(s) => s.trim_end().to_string(),
        };

        // Skip empty lines
        if text.is_empty() {
            return;
        }

        // Truncate long lines for display
        let display_text = if text.len() > 72 {
            let cut: String = text.chars().take(69).collect();
            format!("{}...", cut)
        } else {
            text
        };

        let mut buf = buffer.lock().unwrap();
        buf.push_back(display_text);
        while buf.len() > max_lines {
            buf.pop_front();
        }

        // Build multi-line message: base message + indented output lines
        let prefix = " ".repeat(indent);
        let mut msg = base_message.clone();
        for line in buf.iter() {
            msg.push('\n');
            msg.push_str(&prefix);
            msg.push_str(&theme.dim.apply_to(format!("» {}", line)).to_string());
        }

        bar.set_message(msg);
    })
}
