//! Post-install import probes.
//!
//! The smoke test verifies the installer's work by importing each probe
//! package inside the environment and printing its version identifier.

use std::path::Path;

use crate::error::{Result, SetupError};
use crate::process::{execute_quiet, CommandLine};

/// Result of probing one package.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Import name that was probed.
    pub name: String,

    /// Reported version, when the import succeeded.
    pub version: Option<String>,

    /// The interpreter's error output, when it failed.
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// Whether the probe succeeded.
    pub fn ok(&self) -> bool {
        self.version.is_some()
    }
}

/// Validate that `name` is usable as a Python import name.
///
/// Probe names are interpolated into `-c` code, so only dotted identifier
/// paths are accepted.
pub fn validate_import_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        });

    if valid {
        Ok(())
    } else {
        Err(SetupError::InvalidProbeName {
            name: name.to_string(),
        })
    }
}

/// The probe snippet for a package: import it, print its version.
pub fn probe_code(name: &str) -> String {
    format!("import {}; print({}.__version__)", name, name)
}

/// The probe invocation against the environment's interpreter.
pub fn probe_command(venv_python: &Path, name: &str) -> CommandLine {
    CommandLine::new(venv_python).arg("-c").arg(probe_code(name))
}

/// Run one import probe.
pub fn run_probe(venv_python: &Path, name: &str, cwd: &Path) -> Result<ProbeOutcome> {
    validate_import_name(name)?;

    let result = execute_quiet(&probe_command(venv_python, name), Some(cwd))?;

    if result.success {
        Ok(ProbeOutcome {
            name: name.to_string(),
            version: Some(result.stdout.trim().to_string()),
            error: None,
        })
    } else {
        Ok(ProbeOutcome {
            name: name.to_string(),
            version: None,
            error: Some(result.combined_output()),
        })
    }
}
