//! The bootstrap sequence: plan resolution and step execution.
//!
//! # Architecture
//!
//! - [`plan`] - [`BootstrapPlan`]: explicit resolved paths and settings,
//!   built once and passed to every step
//! - [`step`] - step definitions, statuses, and results
//! - [`runner`] - [`Bootstrapper`]: ordered execution with
//!   stop-on-first-failure
//!
//! The plan replaces the "activate the environment" idiom of hand-written
//! setup scripts: instead of mutating the session so later commands happen
//! to resolve the right tools, each step receives the environment's own
//! interpreter path explicitly.

pub mod plan;
pub mod runner;
pub mod step;

pub use plan::{BootstrapPlan, PlanSettings};
pub use runner::{Bootstrapper, BootstrapOutcome, RunOptions};
pub use step::{StepKind, StepResult, StepStatus};
