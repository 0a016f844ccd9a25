//! Error types for basecamp operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SetupError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for basecamp operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No usable Python interpreter was found.
    #[error("No Python interpreter found (searched: {searched})")]
    InterpreterNotFound { searched: String },

    /// The requirements file does not exist.
    #[error("Requirements file not found: {path}")]
    RequirementsNotFound { path: PathBuf },

    /// The project root has no installable project descriptor.
    #[error("No project descriptor found in {root} (expected pyproject.toml or setup.py)")]
    ProjectDescriptorMissing { root: PathBuf },

    /// A probe name is not a valid Python import name.
    #[error("Invalid import name for smoke test: '{name}'")]
    InvalidProbeName { name: String },

    /// Child process failed to launch or exited with a failure.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for basecamp operations.
pub type Result<T> = std::result::Result<T, SetupError>;
