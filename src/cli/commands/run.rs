//! Run command implementation.
//!
//! The `basecamp run` command drives the whole bootstrap sequence.

use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapOutcome, BootstrapPlan, Bootstrapper, PlanSettings, RunOptions, StepKind};
use crate::error::Result;
use crate::ui::{RunSummary, StatusKind, StepLine, UserInterface};

use super::dispatcher::{Command, CommandResult};
use crate::cli::args::RunArgs;

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Build plan settings from args.
    fn build_settings(&self) -> PlanSettings {
        PlanSettings {
            python: self.args.python.clone(),
            venv_dir: self.args.venv_dir.clone(),
            requirements: self.args.requirements.clone(),
            extras: if self.args.no_extras {
                None
            } else {
                Some(self.args.extras.clone())
            },
            probes: self.args.probes.clone(),
        }
    }

    /// Build run options from args.
    fn build_options(&self) -> RunOptions {
        RunOptions {
            only: self.args.only.iter().cloned().collect(),
            skip: self.args.skip.iter().cloned().collect(),
            force: self.args.force,
            dry_run: self.args.dry_run,
        }
    }

    /// Reject `--only`/`--skip` values that name no step.
    fn unknown_step_names(&self) -> Vec<&str> {
        self.args
            .only
            .iter()
            .chain(self.args.skip.iter())
            .map(String::as_str)
            .filter(|name| StepKind::from_name(name).is_none())
            .collect()
    }
}

/// Convert an outcome into the summary shown to the user.
fn build_summary(outcome: &BootstrapOutcome) -> RunSummary {
    let mut step_results: Vec<StepLine> = outcome
        .steps
        .iter()
        .map(|r| StepLine {
            name: r.name.clone(),
            status: if r.skipped {
                StatusKind::Skipped
            } else if r.success {
                StatusKind::Success
            } else {
                StatusKind::Failed
            },
            duration: (!r.skipped).then_some(r.duration),
            detail: r.detail.clone().or_else(|| r.error.clone()),
        })
        .collect();

    for name in &outcome.filtered {
        step_results.push(StepLine {
            name: name.clone(),
            status: StatusKind::Skipped,
            duration: None,
            detail: Some("skipped".to_string()),
        });
    }

    RunSummary {
        step_results,
        total_duration: outcome.duration,
        steps_run: outcome.steps_run(),
        steps_skipped: outcome.steps_skipped(),
        success: outcome.success,
        failed_steps: outcome
            .failed_steps()
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let unknown = self.unknown_step_names();
        if !unknown.is_empty() {
            ui.error(&format!("Unknown step: {}", unknown.join(", ")));
            ui.message(&format!(
                "Known steps: {}",
                StepKind::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            return Ok(CommandResult::failure(2));
        }

        let settings = self.build_settings();
        let plan = match BootstrapPlan::resolve(&self.project_root, &settings) {
            Ok(plan) => plan,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        ui.show_header(&format!(
            "Setting up {}",
            self.project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "project".to_string())
        ));

        if self.args.dry_run {
            ui.message("Running in dry-run mode - no commands will be executed");
        }

        let options = self.build_options();
        let runner = Bootstrapper::new(&plan, options);
        let outcome = runner.run(ui)?;

        ui.show_run_summary(&build_summary(&outcome));

        if outcome.success {
            let steps_run = outcome.steps_run();
            let run_label = if steps_run == 1 { "step" } else { "steps" };
            ui.success(&format!(
                "Setup complete! ({} {} run, {} skipped)",
                steps_run,
                run_label,
                outcome.steps_skipped()
            ));
            if !self.args.dry_run {
                ui.show_hint(&format!(
                    "To work in the environment manually: {}",
                    plan.venv.activation_hint()
                ));
            }
            Ok(CommandResult::success())
        } else {
            ui.error(&format!(
                "Setup failed at: {}",
                outcome.failed_steps().join(", ")
            ));
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn run_command_creation() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs::default();
        let cmd = RunCommand::new(temp.path(), args);

        assert_eq!(cmd.project_root(), temp.path());
    }

    #[test]
    fn build_settings_maps_extras() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            no_extras: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args);

        assert_eq!(cmd.build_settings().extras, None);

        let cmd = RunCommand::new(temp.path(), RunArgs::default());
        assert_eq!(cmd.build_settings().extras.as_deref(), Some("dev"));
    }

    #[test]
    fn build_options_with_skip() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            skip: vec!["smoke-test".to_string()],
            ..Default::default()
        };

        let cmd = RunCommand::new(temp.path(), args);
        let options = cmd.build_options();

        assert!(options.skip.contains("smoke-test"));
        assert!(options.only.is_empty());
    }

    #[test]
    fn execute_rejects_unknown_step_names() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            only: vec!["nonsense".to_string()],
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("Unknown step"));
        assert!(ui.has_message("python-version"));
    }

    #[test]
    fn execute_dry_run_succeeds_without_interpreter() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            dry_run: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("dry-run mode"));
        assert!(ui.has_success("Setup complete!"));
        assert!(!temp.path().join("venv").exists());
    }

    #[test]
    fn dry_run_skips_closing_activation_hint() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            dry_run: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.hints().is_empty());
    }

    #[test]
    fn summary_includes_filtered_steps() {
        let outcome = BootstrapOutcome {
            steps: vec![],
            filtered: vec!["smoke-test".to_string()],
            duration: std::time::Duration::from_secs(1),
            success: true,
        };

        let summary = build_summary(&outcome);
        assert_eq!(summary.step_results.len(), 1);
        assert_eq!(summary.step_results[0].status, StatusKind::Skipped);
        assert_eq!(summary.steps_skipped, 1);
    }

    #[cfg(unix)]
    mod with_fake_interpreter {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        const FAKE_PYTHON: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "Python 3.12.1" ;;
  -m)
    shift
    case "$1" in
      venv)
        shift
        [ "$1" = "--clear" ] && { shift; rm -rf "$1"; }
        mkdir -p "$1/bin"
        cp "$0" "$1/bin/python"
        chmod +x "$1/bin/python"
        echo "home = /usr" > "$1/pyvenv.cfg"
        ;;
      pip) echo "pip 24.0" ;;
    esac
    ;;
  -c) echo "4.36.2" ;;
esac
exit 0
"#;

        fn setup_project() -> (TempDir, String) {
            let temp = TempDir::new().unwrap();
            let exe = temp.path().join("toolchain").join("python3");
            fs::create_dir_all(exe.parent().unwrap()).unwrap();
            fs::write(&exe, FAKE_PYTHON).unwrap();
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
            fs::write(temp.path().join("requirements.txt"), "torch>=2.0.0\n").unwrap();
            fs::write(temp.path().join("setup.py"), "from setuptools import setup\n").unwrap();
            let exe_str = exe.to_string_lossy().to_string();
            (temp, exe_str)
        }

        #[test]
        fn execute_full_run_reports_success() {
            let (temp, python) = setup_project();
            let args = RunArgs {
                python: Some(python),
                ..Default::default()
            };
            let cmd = RunCommand::new(temp.path(), args);
            let mut ui = MockUI::new();

            let result = cmd.execute(&mut ui).unwrap();

            assert!(result.success, "errors: {:?}", ui.errors());
            assert!(ui.has_success("Setup complete!"));
            assert!(!ui.hints().is_empty());
            assert_eq!(ui.summaries().len(), 1);
            assert!(temp.path().join("venv/pyvenv.cfg").exists());
        }

        #[test]
        fn execute_failure_maps_to_exit_one() {
            let (temp, python) = setup_project();
            fs::remove_file(temp.path().join("requirements.txt")).unwrap();

            let args = RunArgs {
                python: Some(python),
                ..Default::default()
            };
            let cmd = RunCommand::new(temp.path(), args);
            let mut ui = MockUI::new();

            let result = cmd.execute(&mut ui).unwrap();

            assert!(!result.success);
            assert_eq!(result.exit_code, 1);
            assert!(ui.has_error("Setup failed at: install-requirements"));
        }
    }
}
