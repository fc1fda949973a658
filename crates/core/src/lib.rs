//! Core types and utilities for buildwrap
//!
//! This is the foundation crate that all other buildwrap crates depend on.
//! It provides:
//! - Base error types
//! - Platform detection
//!
//! This crate has no dependencies on other buildwrap crates.

pub mod error;
pub mod platform;

pub use error::{Error, Result};
