//! Virtual environment layout and lifecycle.
//!
//! The environment directory is created at most once and never deleted by
//! this tool; recreation of a broken environment goes through the
//! interpreter's own `venv --clear`.

use std::path::{Path, PathBuf};

use super::interpreter::is_executable;
use crate::process::CommandLine;

/// Observed state of a virtual environment directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvState {
    /// The directory does not exist.
    Absent,

    /// The directory exists but lacks an interpreter or `pyvenv.cfg`,
    /// typically the residue of an interrupted creation.
    Incomplete,

    /// The directory holds a usable environment.
    Ready,
}

impl VenvState {
    /// Short lowercase label for status reports.
    pub fn label(&self) -> &'static str {
        match self {
            VenvState::Absent => "absent",
            VenvState::Incomplete => "incomplete",
            VenvState::Ready => "ready",
        }
    }
}

impl std::fmt::Display for VenvState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A virtual environment at a fixed directory.
#[derive(Debug, Clone)]
pub struct Venv {
    root: PathBuf,
}

impl Venv {
    /// Describe a virtual environment rooted at `root` (it need not exist).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The environment's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    /// The environment's own interpreter.
    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python")
        }
    }

    /// Detect the environment's current state.
    ///
    /// `Ready` requires both the marker file `pyvenv.cfg` and an executable
    /// interpreter inside the environment, so a half-written directory is
    /// reported as `Incomplete` instead of silently reused.
    pub fn state(&self) -> VenvState {
        if !self.root.exists() {
            return VenvState::Absent;
        }

        let python = self.python();
        if self.root.join("pyvenv.cfg").is_file() && python.is_file() && is_executable(&python) {
            VenvState::Ready
        } else {
            VenvState::Incomplete
        }
    }

    /// The creation command, run with the base interpreter.
    ///
    /// `clear` maps to `venv --clear`, which empties an existing directory
    /// before recreating it.
    pub fn create_command(&self, base_python: &Path, clear: bool) -> CommandLine {
        let mut cmd = CommandLine::new(base_python).args(["-m", "venv"]);
        if clear {
            cmd = cmd.arg("--clear");
        }
        cmd.arg(self.root.to_string_lossy().to_string())
    }

    /// The shell command a user would run to work in the environment
    /// manually. Shown as closing guidance; basecamp itself never relies on
    /// activation.
    pub fn activation_hint(&self) -> String {
        if cfg!(windows) {
            format!("{}\\Scripts\\activate", self.root.display())
        } else {
            format!("source {}/bin/activate", self.root.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_ready_venv(root: &Path) {
        let bin = if cfg!(windows) {
            root.join("Scripts")
        } else {
            root.join("bin")
        };
        fs::create_dir_all(&bin).unwrap();
        fs::write(root.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        let python = if cfg!(windows) {
            bin.join("python.exe")
        } else {
            bin.join("python")
        };
        fs::write(&python, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn state_absent_when_directory_missing() {
        let temp = TempDir::new().unwrap();
        let venv = Venv::new(temp.path().join("venv"));
        assert_eq!(venv.state(), VenvState::Absent);
    }

    #[test]
    fn state_incomplete_for_empty_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        fs::create_dir_all(&root).unwrap();

        let venv = Venv::new(&root);
        assert_eq!(venv.state(), VenvState::Incomplete);
    }

    #[test]
    fn state_incomplete_without_interpreter() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();

        let venv = Venv::new(&root);
        assert_eq!(venv.state(), VenvState::Incomplete);
    }

    #[test]
    fn state_ready_with_cfg_and_interpreter() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        make_ready_venv(&root);

        let venv = Venv::new(&root);
        assert_eq!(venv.state(), VenvState::Ready);
    }

    #[test]
    fn python_path_is_inside_environment() {
        let venv = Venv::new("venv");
        let python = venv.python();
        assert!(python.starts_with("venv"));
        if cfg!(windows) {
            assert!(python.ends_with("Scripts/python.exe") || python.ends_with("Scripts\\python.exe"));
        } else {
            assert!(python.ends_with("bin/python"));
        }
    }

    #[test]
    fn create_command_uses_module_invocation() {
        let venv = Venv::new("venv");
        let cmd = venv.create_command(Path::new("/usr/bin/python3"), false);
        assert_eq!(cmd.args, vec!["-m", "venv", "venv"]);
    }

    #[test]
    fn create_command_with_clear() {
        let venv = Venv::new("venv");
        let cmd = venv.create_command(Path::new("/usr/bin/python3"), true);
        assert_eq!(cmd.args, vec!["-m", "venv", "--clear", "venv"]);
    }

    #[test]
    fn activation_hint_names_the_directory() {
        let venv = Venv::new("venv");
        let hint = venv.activation_hint();
        assert!(hint.contains("venv"));
        assert!(hint.contains("activate"));
    }

    #[test]
    fn state_labels() {
        assert_eq!(VenvState::Absent.label(), "absent");
        assert_eq!(VenvState::Incomplete.label(), "incomplete");
        assert_eq!(VenvState::Ready.label(), "ready");
        assert_eq!(format!("{}", VenvState::Ready), "ready");
    }
}
