//! Running external tools
//!
//! [`ToolRunner`] is the seam between the orchestrator and the operating
//! system. [`ProcessRunner`] is the real implementation; tests substitute
//! closures that record what they were asked to run.

use crate::step::{Invocation, StepOutcome};
use std::path::PathBuf;

/// Runs one invocation to completion and classifies the result
pub trait ToolRunner {
    /// Run the invocation and wait for it to finish
    fn run(&self, invocation: &Invocation) -> StepOutcome;
}

/// Implement `ToolRunner` for closures
impl<F> ToolRunner for F
where
    F: Fn(&Invocation) -> StepOutcome,
{
    fn run(&self, invocation: &Invocation) -> StepOutcome {
        self(invocation)
    }
}

/// Runs invocations as child processes via duct
///
/// The child inherits stdin, stdout and stderr, so tool output reaches the
/// user unchanged. Exit status is inspected but never treated as an error
/// here; the orchestrator's policy decides what a failure means.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Resolve a program the way a shell would
    ///
    /// Returns None when the program cannot be found or is not executable.
    fn resolve(program: &std::path::Path) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(program = %program.display(), error = %e, "Program lookup failed");
                None
            }
        }
    }
}

impl ToolRunner for ProcessRunner {
    #[tracing::instrument(skip(self, invocation), fields(cmd = %invocation.command_line(), working_dir = %invocation.working_dir.display()))]
    fn run(&self, invocation: &Invocation) -> StepOutcome {
        let Some(program) = Self::resolve(&invocation.program) else {
            return StepOutcome::Unavailable {
                program: invocation.program.display().to_string(),
            };
        };

        tracing::debug!("Executing: {} {:?}", program.display(), invocation.args);

        // Inherits the parent environment and stdio; non-zero exits are data
        let mut expression = duct::cmd(&program, &invocation.args)
            .dir(&invocation.working_dir)
            .unchecked();

        for (key, value) in &invocation.env {
            expression = expression.env(key, value);
        }

        let start = std::time::Instant::now();
        let result = match invocation.timeout {
            Some(timeout) => {
                let handle = match expression.start() {
                    Ok(handle) => handle,
                    Err(e) => {
                        return StepOutcome::Errored {
                            message: format!("failed to start '{}': {e}", program.display()),
                        };
                    }
                };

                match handle.wait_timeout(timeout) {
                    Ok(Some(output)) => Ok(output.status),
                    Ok(None) => {
                        if let Err(e) = handle.kill() {
                            tracing::warn!(error = %e, "Failed to kill timed out process");
                        }
                        return StepOutcome::TimedOut { after: timeout };
                    }
                    Err(e) => Err(e),
                }
            }
            None => expression.run().map(|output| output.status),
        };

        tracing::debug!(elapsed_ms = start.elapsed().as_millis(), "Process finished");

        match result {
            Ok(status) if status.success() => StepOutcome::Succeeded,
            Ok(status) => StepOutcome::Failed {
                code: status.code(),
            },
            Err(e) => StepOutcome::Errored {
                message: format!("failed to run '{}': {e}", program.display()),
            },
        }
    }
}
