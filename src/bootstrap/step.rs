//! Step definitions and results.

use std::time::Duration;

use crate::ui::format_duration;

/// The fixed bootstrap sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Probe and report the base interpreter version.
    PythonVersion,

    /// Create the virtual environment if needed.
    CreateVenv,

    /// Upgrade the installer inside the environment.
    UpgradePip,

    /// Install declared dependencies from the requirements file.
    InstallRequirements,

    /// Install the project itself in editable mode.
    InstallProject,

    /// Import each probe package and report its version.
    SmokeTest,
}

impl StepKind {
    /// All steps, in execution order.
    pub const ALL: [StepKind; 6] = [
        StepKind::PythonVersion,
        StepKind::CreateVenv,
        StepKind::UpgradePip,
        StepKind::InstallRequirements,
        StepKind::InstallProject,
        StepKind::SmokeTest,
    ];

    /// Stable step name used in output and `--only`/`--skip` filters.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::PythonVersion => "python-version",
            StepKind::CreateVenv => "create-venv",
            StepKind::UpgradePip => "upgrade-pip",
            StepKind::InstallRequirements => "install-requirements",
            StepKind::InstallProject => "install-project",
            StepKind::SmokeTest => "smoke-test",
        }
    }

    /// Human-readable title shown while the step runs.
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::PythonVersion => "Checking Python version",
            StepKind::CreateVenv => "Creating virtual environment",
            StepKind::UpgradePip => "Upgrading pip",
            StepKind::InstallRequirements => "Installing dependencies",
            StepKind::InstallProject => "Installing project (editable)",
            StepKind::SmokeTest => "Verifying installed packages",
        }
    }

    /// Look a step up by its stable name.
    pub fn from_name(name: &str) -> Option<StepKind> {
        StepKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of a step in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step is waiting to run.
    Pending,

    /// Step is currently executing.
    Running,

    /// Step completed successfully.
    Completed,

    /// Step failed.
    Failed,

    /// Step was skipped (already complete or filtered out).
    Skipped,
}

impl StepStatus {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped
        )
    }

    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Pending => '○',
            StepStatus::Running => '◉',
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Result of executing a step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// Whether the step succeeded.
    pub success: bool,

    /// Execution duration.
    pub duration: Duration,

    /// Exit code (if a command was run).
    pub exit_code: Option<i32>,

    /// Whether the step was skipped (already complete).
    pub skipped: bool,

    /// Error message (if failed).
    pub error: Option<String>,

    /// Captured output (if available).
    pub output: Option<String>,

    /// Short annotation for summaries (e.g. "already complete").
    pub detail: Option<String>,
}

impl StepResult {
    /// Create a skipped result.
    pub fn skipped(name: &str, detail: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration: Duration::ZERO,
            exit_code: None,
            skipped: true,
            error: None,
            output: None,
            detail: Some(detail.to_string()),
        }
    }

    /// Create a success result.
    pub fn success(
        name: &str,
        duration: Duration,
        exit_code: Option<i32>,
        output: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration,
            exit_code,
            skipped: false,
            error: None,
            output,
            detail: None,
        }
    }

    /// Create a failure result.
    pub fn failure(name: &str, duration: Duration, error: String, output: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration,
            exit_code: None,
            skipped: false,
            error: Some(error),
            output,
            detail: None,
        }
    }

    /// Get the status of this result.
    pub fn status(&self) -> StepStatus {
        if self.skipped {
            StepStatus::Skipped
        } else if self.success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        }
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let status = self.status();
        let duration_str = format_duration(self.duration);

        match status {
            StepStatus::Completed => {
                format!("{} {} ({})", status.display_char(), self.name, duration_str)
            }
            StepStatus::Skipped => {
                let detail = self.detail.as_deref().unwrap_or("skipped");
                format!("{} {} ({})", status.display_char(), self.name, detail)
            }
            StepStatus::Failed => {
                let error = self.error.as_deref().unwrap_or("unknown error");
                format!("{} {} - {}", status.display_char(), self.name, error)
            }
            _ => format!("{} {}", status.display_char(), self.name),
        }
    }
}
