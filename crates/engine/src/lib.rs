//! # buildwrap engine
//!
//! Orchestrates a local out-of-source CMake build:
//!
//! - **Steps**: the fixed pipeline (build dir, pull, submodules, generate, build)
//! - **Plan**: resolved paths, tools and arguments for one run
//! - **Runner**: executes external tools and classifies their outcome
//! - **Orchestrator**: runs the steps in order under a failure policy
//! - **Report**: what happened to each step

pub mod orchestrator;
pub mod plan;
pub mod report;
pub mod runner;
pub mod step;

// Re-export error types from core
pub use buildwrap_core::{Error, Result};

// Re-export commonly used types
pub use buildwrap_config::FailurePolicy;
pub use orchestrator::{NoOpReporter, Orchestrator, Reporter};
pub use plan::BuildPlan;
pub use report::{RunReport, StepRecord};
pub use runner::{ProcessRunner, ToolRunner};
pub use step::{Invocation, SkipReason, Step, StepOutcome};
