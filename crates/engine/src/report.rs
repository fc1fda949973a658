//! Per-run record of what each step did

use crate::step::{Step, StepOutcome};
use buildwrap_config::FailurePolicy;
use buildwrap_core::{Error, Result};
use std::time::Duration;

/// Outcome of one step in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step the record is for
    pub step: Step,
    /// What happened
    pub outcome: StepOutcome,
    /// Wall-clock time spent (zero for skipped steps)
    pub elapsed: Duration,
}

/// Ordered outcomes of one orchestration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    records: Vec<StepRecord>,
}

impl RunReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome of the next step
    pub fn push(&mut self, step: Step, outcome: StepOutcome, elapsed: Duration) {
        self.records.push(StepRecord {
            step,
            outcome,
            elapsed,
        });
    }

    /// Outcome recorded for a step, if it was reached
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// Steps in the order they were recorded
    pub fn steps(&self) -> Vec<Step> {
        self.records.iter().map(|r| r.step).collect()
    }

    /// Records whose outcome counts as a failure
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }

    /// Earliest failing step, if any
    pub fn first_failure(&self) -> Option<&StepRecord> {
        self.failures().next()
    }

    /// Number of failed steps
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of steps that were not run
    pub fn skipped_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_skipped())
            .count()
    }

    /// Number of steps that succeeded
    pub fn succeeded_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == StepOutcome::Succeeded)
            .count()
    }

    /// Time spent across all steps
    pub fn total_elapsed(&self) -> Duration {
        self.records.iter().map(|r| r.elapsed).sum()
    }

    /// Turn the report into the process result for a policy
    ///
    /// Best-effort runs always succeed; fail-fast runs fail on the first
    /// failing step.
    pub fn check(&self, policy: FailurePolicy) -> Result<()> {
        match (policy, self.first_failure()) {
            (FailurePolicy::FailFast, Some(record)) => Err(Error::StepFailed {
                step: record.step.name().to_string(),
                detail: record.outcome.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
