//! Status command implementation.
//!
//! The `basecamp status` command reports the current state of the
//! development environment without changing anything.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bootstrap::{BootstrapPlan, PlanSettings};
use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::python::{smoke, Interpreter, VenvState};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Machine-readable environment report.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Project root directory.
    pub project_root: String,

    /// Base interpreter, when one was found.
    pub interpreter: Option<InterpreterReport>,

    /// Names discovery searched when no interpreter was found.
    pub searched: String,

    /// Virtual environment location and state.
    pub venv: VenvReport,

    /// Requirements file location and presence.
    pub requirements: FileReport,

    /// Whether a project descriptor (pyproject.toml or setup.py) exists.
    pub project_descriptor_present: bool,

    /// Import probe results (only populated when the environment is ready).
    pub probes: Vec<ProbeReport>,
}

/// Resolved interpreter details.
#[derive(Debug, Serialize)]
pub struct InterpreterReport {
    /// Executable path.
    pub path: String,

    /// Reported `--version` text, when the probe ran.
    pub version: Option<String>,
}

/// Virtual environment details.
#[derive(Debug, Serialize)]
pub struct VenvReport {
    /// Environment root directory.
    pub path: String,

    /// One of `absent`, `incomplete`, `ready`.
    pub state: String,
}

/// A file expected at a fixed location.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Expected path.
    pub path: String,

    /// Whether the file exists.
    pub present: bool,
}

/// One import probe result.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    /// Import name.
    pub name: String,

    /// Reported version, when importable.
    pub version: Option<String>,
}

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn build_settings(&self) -> PlanSettings {
        PlanSettings {
            python: self.args.python.clone(),
            venv_dir: self.args.venv_dir.clone(),
            requirements: self.args.requirements.clone(),
            probes: self.args.probes.clone(),
            ..Default::default()
        }
    }

    /// Gather the report. Read-only: nothing is created or installed.
    fn build_report(&self, plan: &BootstrapPlan) -> StatusReport {
        let interpreter = plan.base_python.as_ref().map(|path| {
            let version = Interpreter::at(path)
                .probe_version()
                .ok()
                .map(|(output, _)| output.lines().next().unwrap_or("").to_string());
            InterpreterReport {
                path: path.display().to_string(),
                version,
            }
        });

        let venv_state = plan.venv.state();
        let probes = if venv_state == VenvState::Ready {
            let venv_python = plan.venv_python();
            plan.probes
                .iter()
                .map(|name| {
                    let version = smoke::run_probe(&venv_python, name, &self.project_root)
                        .ok()
                        .and_then(|outcome| outcome.version);
                    ProbeReport {
                        name: name.clone(),
                        version,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        StatusReport {
            project_root: self.project_root.display().to_string(),
            interpreter,
            searched: plan.searched.clone(),
            venv: VenvReport {
                path: plan.venv.root().display().to_string(),
                state: venv_state.label().to_string(),
            },
            requirements: FileReport {
                path: plan.requirements.display().to_string(),
                present: plan.requirements_present(),
            },
            project_descriptor_present: plan.descriptor_present(),
            probes,
        }
    }

    fn show_human(&self, report: &StatusReport, ui: &mut dyn UserInterface) {
        ui.show_header("Environment status");

        match &report.interpreter {
            Some(interp) => {
                let version = interp.version.as_deref().unwrap_or("version unknown");
                ui.message(&format!("Interpreter: {} ({})", interp.path, version));
            }
            None => {
                ui.message(&format!(
                    "Interpreter: not found (searched: {})",
                    report.searched
                ));
            }
        }

        ui.message(&format!(
            "Virtual env: {} [{}]",
            report.venv.path, report.venv.state
        ));
        ui.message(&format!(
            "Requirements: {} [{}]",
            report.requirements.path,
            if report.requirements.present {
                "present"
            } else {
                "missing"
            }
        ));
        ui.message(&format!(
            "Project descriptor: {}",
            if report.project_descriptor_present {
                "present"
            } else {
                "missing"
            }
        ));

        for probe in &report.probes {
            match &probe.version {
                Some(version) => ui.message(&format!("  {}: {}", probe.name, version)),
                None => ui.message(&format!("  {}: not importable", probe.name)),
            }
        }

        if report.venv.state != "ready" {
            ui.message("");
            ui.message("Run `basecamp run` to set up the environment");
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.build_settings();
        let plan = match BootstrapPlan::resolve(&self.project_root, &settings) {
            Ok(plan) => plan,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        let report = self.build_report(&plan);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| anyhow::anyhow!("failed to serialize status report: {}", e))?;
            ui.message(&json);
        } else {
            self.show_human(&report, ui);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn status_args() -> StatusArgs {
        StatusArgs {
            json: false,
            python: None,
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            probes: vec!["torch".to_string(), "transformers".to_string()],
        }
    }

    #[test]
    fn status_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), status_args());

        assert_eq!(cmd.project_root(), temp.path());
    }

    #[test]
    fn status_reports_absent_venv() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), status_args());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("[absent]"));
        assert!(ui.has_message("Run `basecamp run`"));
    }

    #[test]
    fn status_reports_missing_requirements() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), status_args());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.messages().iter().any(|m| m.contains("Requirements") && m.contains("missing")));
    }

    #[test]
    fn status_json_is_parseable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "torch\n").unwrap();

        let args = StatusArgs {
            json: true,
            ..status_args()
        };
        let cmd = StatusCommand::new(temp.path(), args);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);

        let json_msg = ui
            .messages()
            .iter()
            .find(|m| m.trim_start().starts_with('{'))
            .expect("json output");
        let value: serde_json::Value = serde_json::from_str(json_msg).unwrap();
        assert_eq!(value["venv"]["state"], "absent");
        assert_eq!(value["requirements"]["present"], true);
        assert_eq!(value["probes"], serde_json::json!([]));
    }

    #[test]
    fn status_skips_probes_when_venv_not_ready() {
        let temp = TempDir::new().unwrap();
        // Incomplete venv: directory without interpreter.
        fs::create_dir_all(temp.path().join("venv")).unwrap();

        let cmd = StatusCommand::new(temp.path(), status_args());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("[incomplete]"));
        assert!(!ui.messages().iter().any(|m| m.contains("not importable")));
    }

    #[cfg(unix)]
    #[test]
    fn status_probes_ready_venv() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("venv").join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(temp.path().join("venv/pyvenv.cfg"), "home = /usr\n").unwrap();
        let python = bin.join("python");
        fs::write(&python, "#!/bin/sh\n[ \"$1\" = \"-c\" ] && echo '2.1.0'\nexit 0\n").unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();

        let cmd = StatusCommand::new(temp.path(), status_args());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("[ready]"));
        assert!(ui.has_message("torch: 2.1.0"));
        assert!(ui.has_message("transformers: 2.1.0"));
    }
}
