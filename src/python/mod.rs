//! The Python toolchain surface: interpreter discovery, virtual
//! environments, the package installer, and import probes.
//!
//! Everything here constructs explicit [`CommandLine`](crate::process::CommandLine)
//! invocations against resolved paths. The tools themselves are consumed as
//! black boxes: invoke with documented flags, rely on their own
//! success/failure signaling.

pub mod interpreter;
pub mod pip;
pub mod smoke;
pub mod venv;

pub use interpreter::{extract_version, Interpreter, DEFAULT_INTERPRETER_NAMES};
pub use smoke::ProbeOutcome;
pub use venv::{Venv, VenvState};
