//! Bootstrap plan resolution.
//!
//! A [`BootstrapPlan`] is built once per run and handed to every step. It
//! carries the resolved base interpreter, the environment location, and the
//! install inputs, so no step depends on ambient session state.

use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};
use crate::python::interpreter::{parse_system_path, Interpreter};
use crate::python::{smoke, Venv};

/// User-facing settings a plan is resolved from.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    /// Requested interpreter: a bare name or a path. `None` searches the
    /// defaults.
    pub python: Option<String>,

    /// Virtual environment directory, relative to the project root.
    pub venv_dir: String,

    /// Requirements file, relative to the project root.
    pub requirements: String,

    /// Extras group for the editable install (`None` installs bare).
    pub extras: Option<String>,

    /// Import names verified by the smoke test.
    pub probes: Vec<String>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            python: None,
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            extras: Some("dev".to_string()),
            probes: vec!["torch".to_string(), "transformers".to_string()],
        }
    }
}

/// The resolved configuration passed to every step.
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    /// Project root directory.
    pub project_root: PathBuf,

    /// The virtual environment (may not exist yet).
    pub venv: Venv,

    /// Resolved base interpreter, when discovery succeeded.
    pub base_python: Option<PathBuf>,

    /// What the user asked for, verbatim.
    pub requested_python: Option<String>,

    /// Names/paths discovery searched, for error reporting.
    pub searched: String,

    /// Absolute requirements file path.
    pub requirements: PathBuf,

    /// Extras group for the editable install.
    pub extras: Option<String>,

    /// Import names verified by the smoke test.
    pub probes: Vec<String>,
}

impl BootstrapPlan {
    /// Resolve a plan against the system PATH.
    ///
    /// Interpreter discovery failure is recorded in the plan rather than
    /// returned: the version step reports it (or, in a dry run, falls back
    /// to the requested name so previews work anywhere). Only invalid
    /// probe names fail resolution outright.
    pub fn resolve(project_root: &Path, settings: &PlanSettings) -> Result<Self> {
        Self::resolve_in(project_root, settings, &parse_system_path())
    }

    /// Resolve a plan against an explicit PATH entry list (for tests).
    pub fn resolve_in(
        project_root: &Path,
        settings: &PlanSettings,
        path_entries: &[PathBuf],
    ) -> Result<Self> {
        for name in &settings.probes {
            smoke::validate_import_name(name)?;
        }

        let (base_python, searched) =
            match Interpreter::discover_in(settings.python.as_deref(), path_entries) {
                Ok(interp) => {
                    let searched = settings
                        .python
                        .clone()
                        .unwrap_or_else(|| interp.path().display().to_string());
                    (Some(interp.path().to_path_buf()), searched)
                }
                Err(SetupError::InterpreterNotFound { searched }) => (None, searched),
                Err(e) => return Err(e),
            };

        Ok(Self {
            project_root: project_root.to_path_buf(),
            venv: Venv::new(project_root.join(&settings.venv_dir)),
            base_python,
            requested_python: settings.python.clone(),
            searched,
            requirements: project_root.join(&settings.requirements),
            extras: settings.extras.clone(),
            probes: settings.probes.clone(),
        })
    }

    /// The base interpreter, falling back to the requested (or default)
    /// name when discovery failed. Used by dry runs to render commands
    /// without requiring a real interpreter.
    pub fn base_python_or_requested(&self) -> PathBuf {
        match &self.base_python {
            Some(path) => path.clone(),
            None => PathBuf::from(
                self.requested_python
                    .clone()
                    .unwrap_or_else(|| "python3".to_string()),
            ),
        }
    }

    /// The environment's own interpreter path.
    pub fn venv_python(&self) -> PathBuf {
        self.venv.python()
    }

    /// Whether the requirements file exists.
    pub fn requirements_present(&self) -> bool {
        self.requirements.is_file()
    }

    /// Whether the project root holds an installable project descriptor.
    pub fn descriptor_present(&self) -> bool {
        self.project_root.join("pyproject.toml").is_file()
            || self.project_root.join("setup.py").is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_python(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let exe = dir.join("python3");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        }
        exe
    }

    #[test]
    fn resolve_builds_paths_under_project_root() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_python(&bin);

        let plan =
            BootstrapPlan::resolve_in(temp.path(), &PlanSettings::default(), &[bin]).unwrap();

        assert_eq!(plan.venv.root(), temp.path().join("venv"));
        assert_eq!(plan.requirements, temp.path().join("requirements.txt"));
        assert!(plan.base_python.is_some());
    }

    #[test]
    fn resolve_records_discovery_failure_instead_of_erroring() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();

        let plan =
            BootstrapPlan::resolve_in(temp.path(), &PlanSettings::default(), &[empty]).unwrap();

        assert!(plan.base_python.is_none());
        assert!(plan.searched.contains("python3"));
    }

    #[test]
    fn resolve_rejects_invalid_probe_names() {
        let temp = TempDir::new().unwrap();
        let settings = PlanSettings {
            probes: vec!["torch; import os".to_string()],
            ..Default::default()
        };

        let result = BootstrapPlan::resolve_in(temp.path(), &settings, &[]);
        assert!(matches!(result, Err(SetupError::InvalidProbeName { .. })));
    }

    #[test]
    fn default_settings_match_the_project_layout() {
        let settings = PlanSettings::default();
        assert_eq!(settings.venv_dir, "venv");
        assert_eq!(settings.requirements, "requirements.txt");
        assert_eq!(settings.extras.as_deref(), Some("dev"));
        assert_eq!(settings.probes, ["torch", "transformers"]);
    }

    #[test]
    fn base_python_or_requested_falls_back_to_name() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();

        let settings = PlanSettings {
            python: Some("python3.12".to_string()),
            ..Default::default()
        };
        let plan = BootstrapPlan::resolve_in(temp.path(), &settings, &[empty]).unwrap();

        assert_eq!(plan.base_python_or_requested(), PathBuf::from("python3.12"));
    }

    #[test]
    fn descriptor_present_detects_both_kinds() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_python(&bin);

        let plan = BootstrapPlan::resolve_in(temp.path(), &PlanSettings::default(), &[bin])
            .unwrap();
        assert!(!plan.descriptor_present());

        fs::write(temp.path().join("setup.py"), "from setuptools import setup\n").unwrap();
        assert!(plan.descriptor_present());

        fs::remove_file(temp.path().join("setup.py")).unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();
        assert!(plan.descriptor_present());
    }

    #[test]
    fn requirements_present_checks_file() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_python(&bin);

        let plan = BootstrapPlan::resolve_in(temp.path(), &PlanSettings::default(), &[bin])
            .unwrap();
        assert!(!plan.requirements_present());

        fs::write(temp.path().join("requirements.txt"), "torch>=2.0.0\n").unwrap();
        assert!(plan.requirements_present());
    }
}
