//! Console output for build runs
//!
//! Section headings and step lines go to stdout, interleaved with the tools'
//! own output, which the child processes write to the inherited streams.

use buildwrap_engine::{BuildPlan, Reporter, RunReport, Step, StepOutcome};
use owo_colors::OwoColorize;

/// Prints a heading before each phase and a line per finished step
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn heading(step: Step) {
        if let Some(heading) = step.heading() {
            println!("{}", heading.bold());
        }
    }
}

impl Reporter for ConsoleReporter {
    fn step_started(&self, step: Step, plan: &BuildPlan) {
        Self::heading(step);
        println!("  {} {}", "$".dimmed(), plan.describe(step).dimmed());
    }

    fn step_finished(&self, step: Step, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Succeeded => {}
            StepOutcome::Skipped(reason) => {
                Self::heading(step);
                println!("  {} {} ({reason})", "●".dimmed(), step.dimmed());
            }
            failure => {
                println!(
                    "  {} {}: {failure}",
                    "Warning".yellow().bold(),
                    step.name().bold()
                );
            }
        }
    }
}

/// Print the commands a run would execute, without running anything
pub fn print_plan(plan: &BuildPlan) {
    for step in Step::ALL {
        if step.is_sync() && !plan.sync {
            continue;
        }

        if let Some(heading) = step.heading() {
            println!("{}", heading.bold());
        }
        println!("  {} {}", "$".dimmed(), plan.describe(step));
    }
}

/// Print a one-line summary of a finished run
pub fn print_summary(report: &RunReport) {
    let succeeded = report.succeeded_count();
    let failed = report.failure_count();
    let skipped = report.skipped_count();
    let elapsed = report.total_elapsed().as_secs_f64();

    println!();
    if failed > 0 {
        println!(
            "{} {} succeeded | {} {} failed | {} skipped {}",
            "●".bright_green(),
            succeeded.to_string().bright_green().bold(),
            "●".bright_red(),
            failed.to_string().bright_red().bold(),
            skipped,
            format!("({elapsed:.1}s)").dimmed()
        );
    } else {
        println!(
            "{} {} steps succeeded, {} skipped {}",
            "●".bright_green(),
            succeeded.to_string().bright_green().bold(),
            skipped,
            format!("({elapsed:.1}s)").dimmed()
        );
    }

    for record in report.failures() {
        println!("  {} {}", record.step.name().red(), record.outcome.dimmed());
    }
}
