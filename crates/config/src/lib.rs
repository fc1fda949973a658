//! Configuration management for buildwrap
//!
//! This crate handles:
//! - `.buildwrap.toml` loading and path resolution
//! - Failure policy selection
//! - Logging initialization

pub mod config;
pub mod logging;

// Re-export error types from core
pub use buildwrap_core::{Error, Result};

// Re-export main types
pub use config::{
    CONFIG_FILE_NAME, Config, FailurePolicy, GeneralConfig, GeneratorConfig, ToolsConfig,
};
