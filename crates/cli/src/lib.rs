//! buildwrap CLI library
//!
//! This library contains all the CLI logic for buildwrap, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use buildwrap_config::Config;
use command::Command;
use common::RuntimeContext;
use error::CommandError;

/// buildwrap - pull, generate and build a CMake project in one go
#[derive(Parser, Debug)]
#[command(name = "buildwrap")]
#[command(about = "Update, generate and build a CMake project out of source")]
#[command(version)]
#[command(long_about = "Update, generate and build a CMake project out of source

Runs, in order:
  1. create the build directory (default: <project-root>/build)
  2. git pull
  3. git submodule update --init --recursive
  4. cmake <project-root> [GENERATOR_ARGS...]   (in the build directory)
  5. cmake --build .                           (in the build directory)

By default every step is attempted even if an earlier one failed, and the
exit status is 0. Use --fail-fast to stop at the first failure.

Examples:
  • buildwrap
      → Build the project in the current directory

  • buildwrap -- -DCMAKE_BUILD_TYPE=Release -G Ninja
      → Forward arguments to the generate step

  • buildwrap --offline --fail-fast
      → Skip git, stop on the first failure")]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, env = "BUILDWRAP_PROJECT_ROOT", value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Path to the config file (defaults to <project-root>/.buildwrap.toml)
    #[arg(long, env = "BUILDWRAP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "BUILDWRAP_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Build options and forwarded generator arguments
    #[command(flatten)]
    pub build: cmd::build::BuildCommand,
}

/// Load the configuration for a project
///
/// An explicit file must exist; otherwise `.buildwrap.toml` in the project
/// root is used when present and defaults apply when it is not.
fn load_config(explicit: Option<&Path>, project_root: &Path) -> error::Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => Config::load_from_project(project_root)?,
    };
    Ok(config)
}

/// Main entry point for the CLI application
pub fn run(cli: Cli) -> Result<()> {
    // Initialize logging based on verbosity
    buildwrap_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let project_root =
        common::resolve_project_root(cli.project_root.as_deref()).map_err(CommandError::from)?;
    tracing::debug!(project_root = %project_root.display(), "Resolved project root");

    let config = load_config(cli.config.as_deref(), &project_root)?;
    let context = RuntimeContext::new(config, project_root);

    cli.build.execute(&context)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_without_arguments() {
        let cli = Cli::try_parse_from(["buildwrap"]).unwrap();
        assert!(cli.project_root.is_none());
        assert!(!cli.build.fail_fast);
        assert!(!cli.build.dry_run);
        assert!(cli.build.generator_args.is_empty());
    }

    #[test]
    fn test_cli_forwards_trailing_arguments() {
        let cli = Cli::try_parse_from([
            "buildwrap",
            "--fail-fast",
            "--",
            "-DCMAKE_BUILD_TYPE=Release",
            "-G",
            "Ninja",
        ])
        .unwrap();
        assert!(cli.build.fail_fast);
        assert_eq!(
            cli.build.generator_args,
            vec!["-DCMAKE_BUILD_TYPE=Release", "-G", "Ninja"]
        );
    }

    #[test]
    fn test_cli_options_before_separator_are_not_forwarded() {
        let cli = Cli::try_parse_from([
            "buildwrap",
            "--project-root",
            "/work/proj",
            "--offline",
            "--build-dir",
            "out",
            "--",
            "--fail-fast",
        ])
        .unwrap();
        assert_eq!(cli.project_root, Some(PathBuf::from("/work/proj")));
        assert!(cli.build.offline);
        assert!(!cli.build.fail_fast);
        assert_eq!(cli.build.build_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.build.generator_args, vec!["--fail-fast"]);
    }

    #[test]
    fn test_cli_forwards_hyphen_values_without_separator() {
        let cli = Cli::try_parse_from(["buildwrap", "-DA=1", "-G", "Ninja"]).unwrap();
        assert_eq!(cli.build.generator_args, vec!["-DA=1", "-G", "Ninja"]);
    }

    #[test]
    fn test_cli_flags_after_first_forwarded_value_are_forwarded() {
        let cli = Cli::try_parse_from(["buildwrap", "-DA=1", "-v", "--fail-fast"]).unwrap();
        assert!(!cli.verbose);
        assert!(!cli.build.fail_fast);
        assert_eq!(cli.build.generator_args, vec!["-DA=1", "-v", "--fail-fast"]);
    }

    #[test]
    fn test_cli_own_short_flags_are_parsed_locally() {
        let cli = Cli::try_parse_from(["buildwrap", "-n", "-v", "-DA=1"]).unwrap();
        assert!(cli.build.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.build.generator_args, vec!["-DA=1"]);
    }

    #[test]
    fn test_cli_no_sync_alias() {
        let cli = Cli::try_parse_from(["buildwrap", "--no-sync"]).unwrap();
        assert!(cli.build.offline);
    }

    #[test]
    fn test_load_config_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.build_dir(temp.path()), temp.path().join("build"));
    }

    #[test]
    fn test_load_config_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let err = load_config(Some(&missing), temp.path()).unwrap_err();
        assert!(matches!(err, CommandError::ConfigError(_)));
    }

    #[test]
    fn test_load_config_invalid_file_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".buildwrap.toml"), "[general\nbroken").unwrap();
        let err = load_config(None, temp.path()).unwrap_err();
        assert!(matches!(err, CommandError::ConfigError(_)));
    }

    #[test]
    fn test_missing_project_root_is_command_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = CommandError::from(common::resolve_project_root(Some(&missing)).unwrap_err());
        match err {
            CommandError::InvalidProjectRoot { path, reason } => {
                assert_eq!(path, missing);
                assert_eq!(reason, "does not exist");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
