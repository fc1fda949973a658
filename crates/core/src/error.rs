//! Base error types for buildwrap
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Project root could not be determined or does not exist
    #[error("Invalid project root {}: {reason}", path.display())]
    ProjectRoot {
        /// Path that was given or derived
        path: PathBuf,
        /// Why it cannot be used
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", path.display())]
    Config {
        /// Config file
        path: PathBuf,
        /// Parser or IO message
        message: String,
    },

    /// A build step failed under the fail-fast policy
    #[error("Step '{step}' failed: {detail}")]
    StepFailed {
        /// Step name
        step: String,
        /// Outcome description
        detail: String,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create a `Config` error for the given file
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
