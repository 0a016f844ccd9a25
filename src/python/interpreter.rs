//! Python interpreter discovery and version probing.
//!
//! Discovery iterates PATH entries directly instead of shelling out to
//! `which` — `which` behavior varies across systems and is sometimes a
//! shell builtin with inconsistent error handling. The version probe keeps
//! stdout and stderr together: old interpreters print `--version` to
//! stderr, new ones to stdout.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SetupError};
use crate::process::{execute_quiet, CommandLine};

/// Interpreter names searched on PATH when none is requested, in order.
pub const DEFAULT_INTERPRETER_NAMES: &[&str] = &["python3", "python"];

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// A resolved base interpreter (the one used to create the environment).
#[derive(Debug, Clone)]
pub struct Interpreter {
    path: PathBuf,
}

impl Interpreter {
    /// Discover an interpreter on the system PATH.
    ///
    /// `requested` may be a bare name (searched on PATH) or a path (used
    /// directly if it exists and is executable). When `None`, the names in
    /// [`DEFAULT_INTERPRETER_NAMES`] are tried in order.
    pub fn discover(requested: Option<&str>) -> Result<Self> {
        Self::discover_in(requested, &parse_system_path())
    }

    /// Discover an interpreter against an explicit PATH entry list.
    ///
    /// Split out from [`Interpreter::discover`] so tests can run against a
    /// fixture directory instead of the real PATH.
    pub fn discover_in(requested: Option<&str>, path_entries: &[PathBuf]) -> Result<Self> {
        if let Some(req) = requested {
            // A requested value with a path separator is an explicit path.
            if req.contains(std::path::MAIN_SEPARATOR) || req.contains('/') {
                let path = PathBuf::from(req);
                if path.is_file() && is_executable(&path) {
                    return Ok(Self { path });
                }
                return Err(SetupError::InterpreterNotFound {
                    searched: req.to_string(),
                });
            }
        }

        let names: Vec<&str> = match requested {
            Some(name) => vec![name],
            None => DEFAULT_INTERPRETER_NAMES.to_vec(),
        };

        for name in &names {
            if let Some(path) = resolve_tool_path(name, path_entries) {
                return Ok(Self { path });
            }
        }

        Err(SetupError::InterpreterNotFound {
            searched: names.join(", "),
        })
    }

    /// Wrap an already-known interpreter path without checking it.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The interpreter's executable path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `--version` invocation for this interpreter.
    pub fn version_command(&self) -> CommandLine {
        CommandLine::new(&self.path).arg("--version")
    }

    /// Probe the interpreter version.
    ///
    /// Returns the combined stdout+stderr text verbatim, and the exit
    /// status. Fails only when the interpreter cannot be launched at all.
    pub fn probe_version(&self) -> Result<(String, bool)> {
        let result = execute_quiet(&self.version_command(), None)?;
        Ok((result.combined_output(), result.success))
    }
}

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

/// Extract a dotted version number from probe output.
///
/// `"Python 3.11.4"` yields `"3.11.4"`. Returns `None` when the output
/// contains no version-shaped token (e.g. an error message).
pub fn extract_version(output: &str) -> Option<String> {
    let re = VERSION_RE
        .get_or_init(|| Regex::new(r"\d+\.\d+(?:\.\d+)*").expect("version pattern is valid"));
    re.find(output).map(|m| m.as_str().to_string())
}
