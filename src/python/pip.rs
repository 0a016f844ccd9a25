//! Package installer invocations.
//!
//! All pip calls go through `<venv-python> -m pip` so the installer that
//! runs is always the one inside the environment, regardless of what is on
//! PATH.

use std::path::Path;

use crate::process::CommandLine;

/// Upgrade the installer itself: `python -m pip install --upgrade pip`.
pub fn upgrade_command(venv_python: &Path) -> CommandLine {
    CommandLine::new(venv_python).args(["-m", "pip", "install", "--upgrade", "pip"])
}

/// Install declared dependencies from a requirements file.
pub fn install_requirements_command(venv_python: &Path, requirements: &Path) -> CommandLine {
    CommandLine::new(venv_python)
        .args(["-m", "pip", "install", "-r"])
        .arg(requirements.to_string_lossy().to_string())
}

/// Install the project in editable mode, optionally with an extras group.
///
/// The target is always `.`; the command runs with the project root as its
/// working directory.
pub fn install_editable_command(venv_python: &Path, extras: Option<&str>) -> CommandLine {
    let target = match extras {
        Some(group) => format!(".[{}]", group),
        None => ".".to_string(),
    };
    CommandLine::new(venv_python)
        .args(["-m", "pip", "install", "-e"])
        .arg(target)
}
