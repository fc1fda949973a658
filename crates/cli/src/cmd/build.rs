//! Build command implementation
//!
//! Prepare the build directory, sync the repository and its submodules, then
//! generate and build with CMake.

use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::output::{self, ConsoleReporter};
use buildwrap_config::FailurePolicy;
use buildwrap_engine::{BuildPlan, Orchestrator, ProcessRunner};

/// Build command
#[derive(Debug, Default, Args)]
pub struct BuildCommand {
    /// Build directory (relative to the project root unless absolute)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Stop at the first failing step and exit with an error
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip `git pull` and the submodule update
    #[arg(long, visible_alias = "no-sync")]
    pub offline: bool,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Extra arguments passed to the CMake generate step, after configured ones
    #[arg(
        value_name = "GENERATOR_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub generator_args: Vec<String>,
}

impl BuildCommand {
    /// Failure policy after applying command-line overrides
    pub fn policy(&self, context: &RuntimeContext) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            context.config.general.policy
        }
    }

    /// Resolve configuration and flags into a plan
    pub fn plan(&self, context: &RuntimeContext) -> BuildPlan {
        let project_root = context.project_root();
        let mut plan = BuildPlan::from_config(&context.config, project_root, &self.generator_args);

        if let Some(build_dir) = &self.build_dir {
            plan.build_dir = project_root.join(build_dir);
        }
        if self.offline {
            plan.sync = false;
        }

        plan
    }
}

impl Command for BuildCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let plan = self.plan(context);
        let policy = self.policy(context);

        debug!(
            project_root = %plan.project_root.display(),
            build_dir = %plan.build_dir.display(),
            policy = policy.name(),
            sync = plan.sync,
            "Resolved build plan"
        );

        if self.dry_run {
            output::print_plan(&plan);
            return Ok(());
        }

        let report = Orchestrator::new(&plan, &ProcessRunner)
            .reporter(ConsoleReporter)
            .policy(policy)
            .run();

        output::print_summary(&report);
        info!(
            failed = report.failure_count(),
            skipped = report.skipped_count(),
            "Build run finished"
        );

        report.check(policy)?;
        Ok(())
    }
}
