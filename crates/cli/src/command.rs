//! Command trait for buildwrap
//!
//! Commands receive a [`RuntimeContext`] holding the loaded configuration and
//! resolved project paths, so they never look at the process's current
//! directory themselves.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all buildwrap commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct CleanCommand {
///     #[arg(long)]
///     pub all: bool,
/// }
///
/// impl Command for CleanCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         let _root = context.project_root();
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command cannot run, or if it ran under
    /// the fail-fast policy and a step failed.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
