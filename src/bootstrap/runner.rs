//! Bootstrap sequence execution.
//!
//! The runner executes the fixed step sequence in order and stops at the
//! first failure. Each step reports through the UI (spinner, error block)
//! and produces a [`StepResult`]; nothing continues past a failed step.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Result, SetupError};
use crate::process::{execute_quiet, execute_streaming, CommandLine, CommandOptions};
use crate::python::venv::VenvState;
use crate::python::{extract_version, pip, smoke, Interpreter};
use crate::ui::{live_output_callback, ConfirmPrompt, UserInterface};

use super::plan::BootstrapPlan;
use super::step::{StepKind, StepResult};

/// Options for running the bootstrap sequence.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Only run these steps (empty = all).
    pub only: HashSet<String>,

    /// Skip these steps.
    pub skip: HashSet<String>,

    /// Recreate the environment even if it is already complete.
    pub force: bool,

    /// Preview commands without executing anything.
    pub dry_run: bool,
}

impl RunOptions {
    fn selects(&self, kind: StepKind) -> bool {
        let name = kind.name();
        (self.only.is_empty() || self.only.contains(name)) && !self.skip.contains(name)
    }
}

/// Result of running the bootstrap sequence.
#[derive(Debug)]
pub struct BootstrapOutcome {
    /// Results from each step that was reached, in order.
    pub steps: Vec<StepResult>,

    /// Names of steps excluded by `--only`/`--skip` filters.
    pub filtered: Vec<String>,

    /// Total duration.
    pub duration: Duration,

    /// Whether every reached step succeeded.
    pub success: bool,
}

impl BootstrapOutcome {
    /// Names of failed steps (at most one, with stop-on-first-failure).
    pub fn failed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| !s.success)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Number of steps that actually ran.
    pub fn steps_run(&self) -> usize {
        self.steps.iter().filter(|s| !s.skipped).count()
    }

    /// Number of steps skipped, including filtered ones.
    pub fn steps_skipped(&self) -> usize {
        self.steps.iter().filter(|s| s.skipped).count() + self.filtered.len()
    }
}

/// Executes the bootstrap sequence against a resolved plan.
pub struct Bootstrapper<'a> {
    plan: &'a BootstrapPlan,
    options: RunOptions,
}

impl<'a> Bootstrapper<'a> {
    /// Create a new bootstrapper.
    pub fn new(plan: &'a BootstrapPlan, options: RunOptions) -> Self {
        Self { plan, options }
    }

    /// Run the sequence, stopping at the first failed step.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<BootstrapOutcome> {
        let started = Instant::now();

        let sequence: Vec<StepKind> = StepKind::ALL
            .into_iter()
            .filter(|k| self.options.selects(*k))
            .collect();
        let filtered: Vec<String> = StepKind::ALL
            .into_iter()
            .filter(|k| !self.options.selects(*k))
            .map(|k| k.name().to_string())
            .collect();

        for name in &filtered {
            ui.warning(&format!("  {} skipped", name));
        }

        let total = sequence.len();
        let mut results = Vec::with_capacity(total);

        for (index, kind) in sequence.iter().enumerate() {
            ui.show_progress(index + 1, total);
            debug!(step = kind.name(), "starting step");

            let result = self.execute_step(*kind, ui)?;
            let failed = !result.success;
            results.push(result);

            if failed {
                warn!(step = kind.name(), "step failed, stopping sequence");
                break;
            }
        }

        let success = results.iter().all(|r| r.success);

        Ok(BootstrapOutcome {
            steps: results,
            filtered,
            duration: started.elapsed(),
            success,
        })
    }

    fn execute_step(&self, kind: StepKind, ui: &mut dyn UserInterface) -> Result<StepResult> {
        match kind {
            StepKind::PythonVersion => self.step_python_version(ui),
            StepKind::CreateVenv => self.step_create_venv(ui),
            StepKind::UpgradePip => self.step_upgrade_pip(ui),
            StepKind::InstallRequirements => self.step_install_requirements(ui),
            StepKind::InstallProject => self.step_install_project(ui),
            StepKind::SmokeTest => self.step_smoke_test(ui),
        }
    }

    fn dry_run_step(
        &self,
        kind: StepKind,
        commands: &[CommandLine],
        ui: &mut dyn UserInterface,
    ) -> StepResult {
        let mut lines = Vec::with_capacity(commands.len());
        for command in commands {
            let line = format!("Would run: {}", command);
            ui.message(&format!("  {}", line));
            lines.push(line);
        }
        StepResult::success(kind.name(), Duration::ZERO, None, Some(lines.join("\n")))
    }

    fn step_python_version(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::PythonVersion;

        if self.options.dry_run {
            let cmd = CommandLine::new(self.plan.base_python_or_requested()).arg("--version");
            return Ok(self.dry_run_step(kind, &[cmd], ui));
        }

        let Some(base) = &self.plan.base_python else {
            let message = format!(
                "No Python interpreter found (searched: {})",
                self.plan.searched
            );
            ui.error(&format!("  {}", message));
            return Ok(StepResult::failure(kind.name(), Duration::ZERO, message, None));
        };

        let mut spinner = ui.start_spinner(&format!("{}...", kind.title()));
        let interp = Interpreter::at(base);
        let started = Instant::now();

        match interp.probe_version() {
            Ok((output, true)) => {
                let version_line = output.lines().next().unwrap_or("").to_string();
                spinner.finish_success(&format!("Python version: {}", version_line));
                Ok(StepResult::success(
                    kind.name(),
                    started.elapsed(),
                    Some(0),
                    Some(output),
                ))
            }
            Ok((output, false)) => {
                spinner.finish_error("Python version check failed");
                ui.show_error_block(&interp.version_command().to_string(), &output, None);
                Ok(StepResult::failure(
                    kind.name(),
                    started.elapsed(),
                    "interpreter exited with a failure".to_string(),
                    Some(output),
                ))
            }
            Err(e) => {
                spinner.finish_error("Python version check failed");
                Ok(StepResult::failure(
                    kind.name(),
                    started.elapsed(),
                    e.to_string(),
                    None,
                ))
            }
        }
    }

    fn step_create_venv(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::CreateVenv;
        let venv = &self.plan.venv;
        let state = venv.state();

        if self.options.dry_run {
            if state == VenvState::Ready && !self.options.force {
                ui.message(&format!(
                    "  Would skip {} (already complete)",
                    kind.name()
                ));
                return Ok(StepResult::skipped(kind.name(), "already complete"));
            }
            let clear = state != VenvState::Absent;
            let cmd = venv.create_command(&self.plan.base_python_or_requested(), clear);
            return Ok(self.dry_run_step(kind, &[cmd], ui));
        }

        // Idempotence: a complete environment is reused, never recreated,
        // unless the user forces it.
        if state == VenvState::Ready && !self.options.force {
            let mut spinner = ui.start_spinner(&format!("{}...", kind.title()));
            spinner.finish_skipped(&format!(
                "Virtual environment already exists at {}",
                venv.root().display()
            ));
            return Ok(StepResult::skipped(kind.name(), "already complete"));
        }

        if state == VenvState::Incomplete {
            warn!(path = %venv.root().display(), "virtual environment is incomplete");
            if ui.is_interactive() {
                let prompt = ConfirmPrompt::new(
                    "recreate_venv",
                    format!(
                        "Virtual environment at {} looks incomplete. Recreate it?",
                        venv.root().display()
                    ),
                    true,
                );
                if !ui.confirm(&prompt)? {
                    let message = format!(
                        "virtual environment at {} is incomplete; remove it or re-run with --force",
                        venv.root().display()
                    );
                    ui.error(&format!("  {}", message));
                    return Ok(StepResult::failure(
                        kind.name(),
                        Duration::ZERO,
                        message,
                        None,
                    ));
                }
            } else {
                ui.warning(&format!(
                    "Virtual environment at {} looks incomplete, recreating",
                    venv.root().display()
                ));
            }
        }

        let Some(base) = &self.plan.base_python else {
            let message = format!(
                "No Python interpreter found (searched: {})",
                self.plan.searched
            );
            return Ok(StepResult::failure(kind.name(), Duration::ZERO, message, None));
        };

        let clear = state != VenvState::Absent;
        let cmd = venv.create_command(base, clear);
        let mut spinner = ui.start_spinner(&format!("{}...", kind.title()));

        match execute_quiet(&cmd, Some(&self.plan.project_root)) {
            Ok(result) if result.success => {
                spinner.finish_success(&format!(
                    "Virtual environment created at {}",
                    venv.root().display()
                ));
                Ok(StepResult::success(
                    kind.name(),
                    result.duration,
                    result.exit_code,
                    None,
                ))
            }
            Ok(result) => {
                spinner.finish_error("Virtual environment creation failed");
                ui.show_error_block(&cmd.to_string(), &result.combined_output(), None);
                Ok(StepResult::failure(
                    kind.name(),
                    result.duration,
                    format!("command exited with code {:?}", result.exit_code),
                    Some(result.combined_output()),
                ))
            }
            Err(e) => {
                spinner.finish_error("Virtual environment creation failed");
                Ok(StepResult::failure(
                    kind.name(),
                    Duration::ZERO,
                    e.to_string(),
                    None,
                ))
            }
        }
    }

    fn step_upgrade_pip(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::UpgradePip;
        let cmd = pip::upgrade_command(&self.plan.venv_python());

        if self.options.dry_run {
            return Ok(self.dry_run_step(kind, &[cmd], ui));
        }

        self.run_installer_step(kind, cmd, "pip upgraded", None, ui)
    }

    fn step_install_requirements(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::InstallRequirements;
        let cmd = pip::install_requirements_command(&self.plan.venv_python(), &self.plan.requirements);

        if self.options.dry_run {
            return Ok(self.dry_run_step(kind, &[cmd], ui));
        }

        if !self.plan.requirements_present() {
            let message = SetupError::RequirementsNotFound {
                path: self.plan.requirements.clone(),
            }
            .to_string();
            ui.error(&format!("  {}", message));
            return Ok(StepResult::failure(kind.name(), Duration::ZERO, message, None));
        }

        self.run_installer_step(kind, cmd, "Dependencies installed", None, ui)
    }

    fn step_install_project(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::InstallProject;
        let cmd = pip::install_editable_command(&self.plan.venv_python(), self.plan.extras.as_deref());

        if self.options.dry_run {
            return Ok(self.dry_run_step(kind, &[cmd], ui));
        }

        if !self.plan.descriptor_present() {
            let message = SetupError::ProjectDescriptorMissing {
                root: self.plan.project_root.clone(),
            }
            .to_string();
            ui.error(&format!("  {}", message));
            return Ok(StepResult::failure(kind.name(), Duration::ZERO, message, None));
        }

        self.run_installer_step(kind, cmd, "Project installed (editable)", None, ui)
    }

    fn step_smoke_test(&self, ui: &mut dyn UserInterface) -> Result<StepResult> {
        let kind = StepKind::SmokeTest;
        let venv_python = self.plan.venv_python();

        if self.options.dry_run {
            let commands: Vec<CommandLine> = self
                .plan
                .probes
                .iter()
                .map(|name| smoke::probe_command(&venv_python, name))
                .collect();
            return Ok(self.dry_run_step(kind, &commands, ui));
        }

        let mut spinner = ui.start_spinner(&format!("{}...", kind.title()));
        let started = Instant::now();
        let mut lines = Vec::with_capacity(self.plan.probes.len());

        for name in &self.plan.probes {
            let outcome = match smoke::run_probe(&venv_python, name, &self.plan.project_root) {
                Ok(outcome) => outcome,
                Err(e) => {
                    spinner.finish_error(&format!("Import of {} failed", name));
                    return Ok(StepResult::failure(
                        kind.name(),
                        started.elapsed(),
                        e.to_string(),
                        None,
                    ));
                }
            };
            if let Some(version) = &outcome.version {
                lines.push(format!("{}: {}", outcome.name, version));
            } else {
                spinner.finish_error(&format!("Import of {} failed", outcome.name));
                let error_output = outcome.error.unwrap_or_default();
                ui.show_error_block(
                    &smoke::probe_command(&venv_python, name).to_string(),
                    &error_output,
                    Some("Check that dependency installation succeeded"),
                );
                return Ok(StepResult::failure(
                    kind.name(),
                    started.elapsed(),
                    format!("import of {} failed", name),
                    Some(error_output),
                ));
            }
        }

        spinner.finish_success("Installed packages verified");
        for line in &lines {
            ui.message(&format!("  {}", line));
        }
        Ok(StepResult::success(
            kind.name(),
            started.elapsed(),
            Some(0),
            Some(lines.join("\n")),
        ))
    }

    fn run_installer_step(
        &self,
        kind: StepKind,
        cmd: CommandLine,
        success_message: &str,
        hint: Option<&str>,
        ui: &mut dyn UserInterface,
    ) -> Result<StepResult> {
        let base_message = format!("{}...", kind.title());
        let mut spinner = ui.start_spinner(&base_message);

        let cmd_options = CommandOptions {
            cwd: Some(self.plan.project_root.clone()),
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        };

        let execution = match spinner.progress_bar() {
            Some(bar) => {
                let callback = live_output_callback(bar, base_message.clone(), 4, 2);
                execute_streaming(&cmd, &cmd_options, callback)
            }
            None => crate::process::execute(&cmd, &cmd_options),
        };

        match execution {
            Ok(result) if result.success => {
                let message = match extract_version(&result.stdout) {
                    Some(version) if kind == StepKind::UpgradePip => {
                        format!("{} ({})", success_message, version)
                    }
                    _ => success_message.to_string(),
                };
                spinner.finish_success(&message);
                if ui.output_mode().shows_command_output() {
                    ui.message(&result.stdout);
                }
                Ok(StepResult::success(
                    kind.name(),
                    result.duration,
                    result.exit_code,
                    Some(result.stdout),
                ))
            }
            Ok(result) => {
                spinner.finish_error(&format!("{} failed", kind.title()));
                ui.show_error_block(&cmd.to_string(), &result.combined_output(), hint);
                Ok(StepResult::failure(
                    kind.name(),
                    result.duration,
                    format!("command exited with code {:?}", result.exit_code),
                    Some(result.combined_output()),
                ))
            }
            Err(e) => {
                spinner.finish_error(&format!("{} failed", kind.title()));
                Ok(StepResult::failure(
                    kind.name(),
                    Duration::ZERO,
                    e.to_string(),
                    None,
                ))
            }
        }
    }
}
