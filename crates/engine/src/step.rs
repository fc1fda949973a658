//! Build steps and their outcomes
//!
//! A run is always the same five steps in the same order. Each external step
//! is described by an [`Invocation`]; the result of any step is a
//! [`StepOutcome`].

use indexmap::IndexMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One step of the build pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Create the build directory if it is missing
    EnsureBuildDir,
    /// `git pull` in the project root
    Pull,
    /// `git submodule update --init --recursive` in the project root
    SubmoduleUpdate,
    /// `cmake <project-root> <args...>` in the build directory
    Generate,
    /// `cmake --build .` in the build directory
    Build,
}

impl Step {
    /// All steps, in execution order
    pub const ALL: [Step; 5] = [
        Step::EnsureBuildDir,
        Step::Pull,
        Step::SubmoduleUpdate,
        Step::Generate,
        Step::Build,
    ];

    /// Stable name used in logs, errors and the summary
    pub fn name(&self) -> &'static str {
        match self {
            Step::EnsureBuildDir => "ensure-build-dir",
            Step::Pull => "pull",
            Step::SubmoduleUpdate => "submodule-update",
            Step::Generate => "generate",
            Step::Build => "build",
        }
    }

    /// Console heading printed before the step, if it opens a new phase
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Step::Pull => Some("Update dependencies:"),
            Step::Generate => Some("Generate CMake files:"),
            Step::Build => Some("Build dependencies and executable:"),
            Step::EnsureBuildDir | Step::SubmoduleUpdate => None,
        }
    }

    /// Whether the step talks to the network (dependency sync)
    pub fn is_sync(&self) -> bool {
        matches!(self, Step::Pull | Step::SubmoduleUpdate)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single external tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name (looked up on `PATH`) or path
    pub program: PathBuf,
    /// Arguments, passed through untouched
    pub args: Vec<OsString>,
    /// Working directory of the child process
    pub working_dir: PathBuf,
    /// Variables added on top of the inherited environment
    pub env: IndexMap<String, String>,
    /// Kill the child after this long (None = wait forever)
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Invocation of `program` in `working_dir` with no arguments
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env: IndexMap::new(),
            timeout: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add environment variables for the child
    #[must_use]
    pub fn envs(mut self, env: &IndexMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set or clear the timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments as lossy UTF-8 strings
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Shell-quoted command line, for display only
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy().into_owned();
        shell_words::join(std::iter::once(program).chain(self.args_lossy()))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (in {})",
            self.command_line(),
            self.working_dir.display()
        )
    }
}

/// Why a step was not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Dependency sync turned off (`--offline` or `sync = false`)
    SyncDisabled,
    /// An earlier step failed under the fail-fast policy
    EarlierFailure,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::SyncDisabled => f.write_str("sync disabled"),
            SkipReason::EarlierFailure => f.write_str("earlier step failed"),
        }
    }
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Exited with status 0 (or the directory is in place)
    Succeeded,
    /// Exited unsuccessfully; `code` is None when killed by a signal
    Failed {
        /// Exit code, if the child exited normally
        code: Option<i32>,
    },
    /// Program not found on `PATH` or not executable
    Unavailable {
        /// Program as configured
        program: String,
    },
    /// Killed after exceeding the configured timeout
    TimedOut {
        /// The timeout that was exceeded
        after: Duration,
    },
    /// Could not be carried out (spawn error, directory not creatable, ...)
    Errored {
        /// What went wrong
        message: String,
    },
    /// Not run at all
    Skipped(SkipReason),
}

impl StepOutcome {
    /// Whether this outcome counts as a failure of the step
    pub fn is_failure(&self) -> bool {
        !matches!(self, StepOutcome::Succeeded | StepOutcome::Skipped(_))
    }

    /// Whether the step was not run
    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Succeeded => f.write_str("ok"),
            StepOutcome::Failed { code: Some(code) } => write!(f, "exited with status {code}"),
            StepOutcome::Failed { code: None } => f.write_str("terminated by signal"),
            StepOutcome::Unavailable { program } => write!(f, "'{program}' not found"),
            StepOutcome::TimedOut { after } => {
                write!(f, "timed out after {}s", after.as_secs())
            }
            StepOutcome::Errored { message } => f.write_str(message),
            StepOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}
