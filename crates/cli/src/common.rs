//! Common types shared across CLI commands

use buildwrap_config::Config;
use buildwrap_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve the project root to an absolute, existing directory
///
/// Uses the current working directory when no root is given. The path is
/// made absolute without resolving symlinks.
///
/// # Errors
///
/// Returns `Error::ProjectRoot` if the path does not exist or is not a
/// directory, and `Error::Io` if the current directory cannot be read.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };

    if !root.exists() {
        return Err(Error::ProjectRoot {
            path: root,
            reason: "does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(Error::ProjectRoot {
            path: root,
            reason: "is not a directory".to_string(),
        });
    }

    Ok(root)
}

/// Runtime context for CLI commands
///
/// Holds the loaded configuration and the resolved project root, so commands
/// never consult the process's current directory.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Shared configuration
    pub config: Arc<Config>,
    project_root: PathBuf,
}

impl RuntimeContext {
    /// Create a context from a loaded config and an already resolved root
    pub fn new(config: Config, project_root: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            project_root: project_root.into(),
        }
    }

    /// Directory containing the repository
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}
