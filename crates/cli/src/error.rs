//! Error types for CLI commands

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Configuration file could not be read or parsed
    #[error("Failed to load config")]
    ConfigError(#[source] buildwrap_core::Error),

    /// Project root missing or not a directory
    #[error("Invalid project root {}: {reason}", path.display())]
    InvalidProjectRoot {
        /// Path that was given or derived
        path: PathBuf,
        /// Why it cannot be used
        reason: String,
    },

    /// A step failed and the fail-fast policy stopped the run
    #[error("Build stopped")]
    BuildStopped(#[source] buildwrap_core::Error),

    /// IO error
    #[error("IO error")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<buildwrap_core::Error> for CommandError {
    fn from(err: buildwrap_core::Error) -> Self {
        match err {
            buildwrap_core::Error::StepFailed { .. } => Self::BuildStopped(err),
            buildwrap_core::Error::Config { .. } => Self::ConfigError(err),
            buildwrap_core::Error::ProjectRoot { path, reason } => {
                Self::InvalidProjectRoot { path, reason }
            }
            buildwrap_core::Error::Io(e) => Self::IoError(e),
            other => Self::Other(other.into()),
        }
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
