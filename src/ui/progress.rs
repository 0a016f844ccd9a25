//! Run summaries and duration formatting.

use std::time::Duration;

use super::theme::BasecampTheme;

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Terminal status of a step as shown in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failed,
    Skipped,
}

impl StatusKind {
    /// Plain icon for this status.
    pub fn icon(&self) -> char {
        match self {
            StatusKind::Success => '✓',
            StatusKind::Failed => '✗',
            StatusKind::Skipped => '○',
        }
    }

    /// Styled icon for this status.
    pub fn styled(&self, theme: &BasecampTheme) -> String {
        let icon = self.icon();
        match self {
            StatusKind::Success => theme.success.apply_to(icon).to_string(),
            StatusKind::Failed => theme.error.apply_to(icon).to_string(),
            StatusKind::Skipped => theme.dim.apply_to(icon).to_string(),
        }
    }
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct StepLine {
    /// Step name.
    pub name: String,
    /// Terminal status.
    pub status: StatusKind,
    /// Execution duration, when the step ran.
    pub duration: Option<Duration>,
    /// Short annotation (e.g. "already complete").
    pub detail: Option<String>,
}

/// End-of-run summary shown after the sequence finishes.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Per-step lines, in execution order.
    pub step_results: Vec<StepLine>,
    /// Total wall-clock duration.
    pub total_duration: Duration,
    /// Number of steps that actually ran.
    pub steps_run: usize,
    /// Number of steps skipped.
    pub steps_skipped: usize,
    /// Whether the whole sequence succeeded.
    pub success: bool,
    /// Names of failed steps.
    pub failed_steps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_formats_correctly() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn status_kind_icons() {
        assert_eq!(StatusKind::Success.icon(), '✓');
        assert_eq!(StatusKind::Failed.icon(), '✗');
        assert_eq!(StatusKind::Skipped.icon(), '○');
    }

    #[test]
    fn styled_icon_contains_icon() {
        let theme = BasecampTheme::plain();
        assert!(StatusKind::Success.styled(&theme).contains('✓'));
        assert!(StatusKind::Failed.styled(&theme).contains('✗'));
    }

    #[test]
    fn run_summary_fields() {
        let summary = RunSummary {
            step_results: vec![StepLine {
                name: "create-venv".to_string(),
                status: StatusKind::Skipped,
                duration: None,
                detail: Some("already complete".to_string()),
            }],
            total_duration: Duration::from_secs(1),
            steps_run: 0,
            steps_skipped: 1,
            success: true,
            failed_steps: vec![],
        };
        assert_eq!(summary.step_results.len(), 1);
        assert!(summary.success);
    }
}
