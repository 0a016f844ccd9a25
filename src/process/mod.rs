//! Child process execution.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_quiet, execute_streaming, CommandLine, CommandOptions, CommandResult,
    OutputCallback, OutputLine,
};
pub use platform::is_ci;
