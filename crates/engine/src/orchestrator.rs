//! Build orchestration
//!
//! Runs the five steps strictly in order: ensure build directory, pull,
//! submodule update, generate, build. Every step runs synchronously and is
//! waited on before the next one starts.
//!
//! Under [`FailurePolicy::BestEffort`] a failing step never stops the run:
//! a missing `git` still leads to a generator attempt, a broken generator
//! still leads to a build attempt. Under [`FailurePolicy::FailFast`] the
//! first failure marks all remaining steps as skipped.

use crate::plan::BuildPlan;
use crate::report::RunReport;
use crate::runner::ToolRunner;
use crate::step::{SkipReason, Step, StepOutcome};
use buildwrap_config::FailurePolicy;
use std::fs;
use std::time::{Duration, Instant};

/// Observer for step progress (console headings, summaries)
pub trait Reporter {
    /// Called right before a step runs (not for skipped steps)
    fn step_started(&self, _step: Step, _plan: &BuildPlan) {}

    /// Called with the outcome of every step, including skipped ones
    fn step_finished(&self, _step: Step, _outcome: &StepOutcome) {}
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl Reporter for NoOpReporter {}

impl<T> Reporter for &T
where
    T: Reporter + ?Sized,
{
    fn step_started(&self, step: Step, plan: &BuildPlan) {
        (**self).step_started(step, plan);
    }

    fn step_finished(&self, step: Step, outcome: &StepOutcome) {
        (**self).step_finished(step, outcome);
    }
}

/// Sequential step runner
pub struct Orchestrator<'a, R, P = NoOpReporter>
where
    R: ToolRunner + ?Sized,
    P: Reporter,
{
    plan: &'a BuildPlan,
    runner: &'a R,
    policy: FailurePolicy,
    reporter: P,
}

impl<'a, R> Orchestrator<'a, R, NoOpReporter>
where
    R: ToolRunner + ?Sized,
{
    /// Create an orchestrator with the best-effort policy and no reporter
    pub fn new(plan: &'a BuildPlan, runner: &'a R) -> Self {
        Self {
            plan,
            runner,
            policy: FailurePolicy::default(),
            reporter: NoOpReporter,
        }
    }

    /// Attach a progress reporter
    pub fn reporter<P>(self, reporter: P) -> Orchestrator<'a, R, P>
    where
        P: Reporter,
    {
        Orchestrator {
            plan: self.plan,
            runner: self.runner,
            policy: self.policy,
            reporter,
        }
    }
}

impl<R, P> Orchestrator<'_, R, P>
where
    R: ToolRunner + ?Sized,
    P: Reporter,
{
    /// Set the failure policy
    #[must_use]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every step and return what happened
    ///
    /// Never returns early: skipped steps are recorded too, so the report
    /// always holds all five steps in order.
    #[tracing::instrument(skip(self), fields(
        project_root = %self.plan.project_root.display(),
        build_dir = %self.plan.build_dir.display(),
        policy = self.policy.name(),
    ))]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();
        let mut halted = false;

        for step in Step::ALL {
            if halted {
                let outcome = StepOutcome::Skipped(SkipReason::EarlierFailure);
                self.record(&mut report, step, outcome, Duration::ZERO);
                continue;
            }

            if step.is_sync() && !self.plan.sync {
                tracing::debug!(step = %step, "Skipping sync step");
                let outcome = StepOutcome::Skipped(SkipReason::SyncDisabled);
                self.record(&mut report, step, outcome, Duration::ZERO);
                continue;
            }

            self.reporter.step_started(step, self.plan);

            let start = Instant::now();
            let outcome = self.run_step(step);
            let elapsed = start.elapsed();

            if outcome.is_failure() {
                match self.policy {
                    FailurePolicy::BestEffort => {
                        tracing::debug!(step = %step, outcome = %outcome, "Step failed, continuing");
                    }
                    FailurePolicy::FailFast => {
                        tracing::debug!(step = %step, outcome = %outcome, "Step failed, halting");
                        halted = true;
                    }
                }
            } else {
                tracing::debug!(step = %step, elapsed_ms = elapsed.as_millis(), "Step completed");
            }

            self.record(&mut report, step, outcome, elapsed);
        }

        report
    }

    fn record(&self, report: &mut RunReport, step: Step, outcome: StepOutcome, elapsed: Duration) {
        self.reporter.step_finished(step, &outcome);
        report.push(step, outcome, elapsed);
    }

    fn run_step(&self, step: Step) -> StepOutcome {
        match self.plan.invocation(step) {
            Some(invocation) => self.runner.run(&invocation),
            None => self.ensure_build_dir(),
        }
    }

    /// Create the build directory and any missing parents
    ///
    /// An existing directory is left untouched.
    fn ensure_build_dir(&self) -> StepOutcome {
        let build_dir = &self.plan.build_dir;

        if build_dir.is_dir() {
            tracing::debug!(path = %build_dir.display(), "Build directory already exists");
            return StepOutcome::Succeeded;
        }

        match fs::create_dir_all(build_dir) {
            Ok(()) => {
                tracing::info!(path = %build_dir.display(), "Created build directory");
                StepOutcome::Succeeded
            }
            Err(e) => StepOutcome::Errored {
                message: format!(
                    "failed to create build directory {}: {e}",
                    build_dir.display()
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::step::Invocation;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records every invocation and answers from a per-program table
    struct Recorder {
        calls: RefCell<Vec<Invocation>>,
        failing: Vec<&'static str>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                failing: Vec::new(),
            }
        }

        fn failing(programs: &[&'static str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                failing: programs.to_vec(),
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }
    }

    impl ToolRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> StepOutcome {
            self.calls.borrow_mut().push(invocation.clone());
            let program = invocation.program.to_string_lossy();
            if self.failing.iter().any(|p| *p == program) {
                StepOutcome::Unavailable {
                    program: program.into_owned(),
                }
            } else {
                StepOutcome::Succeeded
            }
        }
    }

    /// Reporter that remembers started steps
    #[derive(Default)]
    struct Started(RefCell<Vec<Step>>);

    impl Reporter for Started {
        fn step_started(&self, step: Step, _plan: &BuildPlan) {
            self.0.borrow_mut().push(step);
        }
    }

    fn plan_in(temp: &TempDir) -> BuildPlan {
        BuildPlan::new(temp.path())
    }

    #[test]
    fn test_creates_missing_build_dir() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(&temp);
        assert!(!plan.build_dir.exists());

        let recorder = Recorder::new();
        let report = Orchestrator::new(&plan, &recorder).run();

        assert!(plan.build_dir.is_dir());
        assert_eq!(
            report.outcome(Step::EnsureBuildDir),
            Some(&StepOutcome::Succeeded)
        );
    }

    #[test]
    fn test_creates_nested_build_dir() {
        let temp = TempDir::new().unwrap();
        let mut plan = plan_in(&temp);
        plan.build_dir = temp.path().join("out").join("release");

        let recorder = Recorder::new();
        Orchestrator::new(&plan, &recorder).run();

        assert!(plan.build_dir.is_dir());
    }

    #[test]
    fn test_existing_build_dir_is_kept() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(&temp);
        fs::create_dir_all(&plan.build_dir).unwrap();
        let marker = plan.build_dir.join("CMakeCache.txt");
        fs::write(&marker, "cached").unwrap();

        let recorder = Recorder::new();
        let report = Orchestrator::new(&plan, &recorder).run();

        assert_eq!(fs::read_to_string(&marker).unwrap(), "cached");
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_steps_run_in_order() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(&temp);
        let recorder = Recorder::new();
        let started = Started::default();

        let report = Orchestrator::new(&plan, &recorder)
            .reporter(&started)
            .run();

        assert_eq!(report.steps(), Step::ALL.to_vec());
        assert_eq!(*started.0.borrow(), Step::ALL.to_vec());

        let calls = recorder.calls();
        let lines: Vec<Vec<String>> = calls
            .iter()
            .map(|c| {
                std::iter::once(c.program.to_string_lossy().into_owned())
                    .chain(c.args_lossy())
                    .collect()
            })
            .collect();
        let root = temp.path().to_string_lossy().into_owned();
        assert_eq!(
            lines,
            vec![
                vec!["git".to_string(), "pull".into()],
                vec![
                    "git".into(),
                    "submodule".into(),
                    "update".into(),
                    "--init".into(),
                    "--recursive".into()
                ],
                vec!["cmake".into(), root],
                vec!["cmake".into(), "--build".into(), ".".into()],
            ]
        );
    }

    #[test]
    fn test_forwarded_args_and_working_dirs() {
        let temp = TempDir::new().unwrap();
        let mut plan = plan_in(&temp);
        plan.generator_args = vec![
            "-DCMAKE_BUILD_TYPE=Debug".into(),
            "-G".into(),
            "Unix Makefiles".into(),
        ];
        let recorder = Recorder::new();
        Orchestrator::new(&plan, &recorder).run();

        let calls = recorder.calls();
        let generate = &calls[2];
        assert_eq!(generate.working_dir, plan.build_dir);
        assert_eq!(
            generate.args[1..].to_vec(),
            vec![
                OsString::from("-DCMAKE_BUILD_TYPE=Debug"),
                OsString::from("-G"),
                OsString::from("Unix Makefiles"),
            ]
        );
        assert_eq!(
            PathBuf::from(&generate.args[0]),
            plan.build_dir.parent().unwrap()
        );

        let build = &calls[3];
        assert_eq!(build.working_dir, plan.build_dir);

        assert_eq!(calls[0].working_dir, plan.project_root);
        assert_eq!(calls[1].working_dir, plan.project_root);
    }

    #[test]
    fn test_best_effort_continues_past_unavailable_tools() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(&temp);
        let recorder = Recorder::failing(&["git", "cmake"]);

        let report = Orchestrator::new(&plan, &recorder)
            .policy(FailurePolicy::BestEffort)
            .run();

        // Every external step was still attempted
        assert_eq!(recorder.calls().len(), 4);
        assert_eq!(report.failure_count(), 4);
        assert_eq!(report.skipped_count(), 0);
        assert!(plan.build_dir.is_dir());
        assert!(report.check(FailurePolicy::BestEffort).is_ok());
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(&temp);
        let recorder = Recorder::failing(&["git"]);

        let report = Orchestrator::new(&plan, &recorder)
            .policy(FailurePolicy::FailFast)
            .run();

        assert_eq!(recorder.calls().len(), 1);
        assert_eq!(report.steps(), Step::ALL.to_vec());
        for step in [Step::SubmoduleUpdate, Step::Generate, Step::Build] {
            assert_eq!(
                report.outcome(step),
                Some(&StepOutcome::Skipped(SkipReason::EarlierFailure))
            );
        }
        assert!(report.check(FailurePolicy::FailFast).is_err());
    }

    #[test]
    fn test_sync_disabled_skips_git() {
        let temp = TempDir::new().unwrap();
        let mut plan = plan_in(&temp);
        plan.sync = false;
        let recorder = Recorder::new();

        let report = Orchestrator::new(&plan, &recorder).run();

        let programs: Vec<_> = recorder
            .calls()
            .iter()
            .map(|c| c.program.clone())
            .collect();
        assert_eq!(programs, vec![PathBuf::from("cmake"), PathBuf::from("cmake")]);
        assert_eq!(
            report.outcome(Step::Pull),
            Some(&StepOutcome::Skipped(SkipReason::SyncDisabled))
        );
        assert_eq!(
            report.outcome(Step::SubmoduleUpdate),
            Some(&StepOutcome::Skipped(SkipReason::SyncDisabled))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_uncreatable_build_dir_does_not_stop_best_effort() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut plan = plan_in(&temp);
        plan.build_dir = blocker.join("build");
        let recorder = Recorder::new();

        let report = Orchestrator::new(&plan, &recorder).run();

        assert!(matches!(
            report.outcome(Step::EnsureBuildDir),
            Some(StepOutcome::Errored { .. })
        ));
        assert_eq!(recorder.calls().len(), 4);
    }
}
