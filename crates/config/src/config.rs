//! Configuration management
//!
//! This module handles loading the optional `.buildwrap.toml` file from the
//! project root. A missing file is not an error: every field has a default
//! that reproduces the plain `git pull` / `cmake ..` / `cmake --build .` run.

use crate::Result;
use buildwrap_core::platform::CURRENT_PLATFORM;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = ".buildwrap.toml";

/// What to do when an external tool fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep going: every step is attempted regardless of earlier failures
    #[default]
    #[serde(alias = "continue")]
    BestEffort,
    /// Stop at the first failing step and exit with an error
    #[serde(alias = "failfast")]
    FailFast,
}

impl FailurePolicy {
    /// Short name used in logs and the run summary
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::FailFast => "fail-fast",
        }
    }
}

/// General configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Build directory, relative to the project root unless absolute
    #[serde(default = "default_build_dir", rename = "buildDir")]
    pub build_dir: PathBuf,

    /// Failure policy for external tools
    #[serde(default)]
    pub policy: FailurePolicy,

    /// Run `git pull` and the submodule update before generating
    #[serde(default = "default_sync")]
    pub sync: bool,

    /// Per-tool timeout in seconds (0 = wait forever)
    #[serde(default)]
    pub timeout: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            policy: FailurePolicy::default(),
            sync: default_sync(),
            timeout: 0,
        }
    }
}

/// External programs used by the steps
///
/// Bare names are looked up on `PATH`; anything containing a path separator
/// is treated as a path relative to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Version control client
    #[serde(default = "default_git")]
    pub git: PathBuf,

    /// Build-system generator and build driver
    #[serde(default = "default_cmake")]
    pub cmake: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            cmake: default_cmake(),
        }
    }
}

/// Generator and build driver arguments
///
/// ```toml
/// [generator]
/// args = ["-G", "Ninja"]
/// linux = ["-DUSE_EPOLL=ON"]
/// buildArgs = ["--parallel"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneratorConfig {
    /// Arguments passed to the generator on every platform
    #[serde(default)]
    pub args: Vec<String>,

    /// Darwin (macOS) specific generator arguments
    #[serde(default)]
    pub darwin: Vec<String>,

    /// Linux specific generator arguments
    #[serde(default)]
    pub linux: Vec<String>,

    /// Windows specific generator arguments
    #[serde(default)]
    pub windows: Vec<String>,

    /// Extra arguments appended to `cmake --build .`
    #[serde(default, rename = "buildArgs")]
    pub build_args: Vec<String>,
}

/// buildwrap configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// Tool locations
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Generator arguments
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Extra environment variables for every external tool
    #[serde(default)]
    pub env: IndexMap<String, String>,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_sync() -> bool {
    true
}

fn default_git() -> PathBuf {
    PathBuf::from("git")
}

fn default_cmake() -> PathBuf {
    PathBuf::from("cmake")
}

impl Config {
    /// Load configuration from an explicit file
    ///
    /// Relative tool paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| crate::Error::config(path, format!("failed to read file: {e}")))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        toml::from_str::<Self>(&content)
            .map(|config| config.with_base_dir(base_dir))
            .map_err(|e| crate::Error::config(path, e.to_string()))
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let config: Self = toml::from_str(toml_content)
            .map_err(|e| crate::Error::config(base_dir.join(CONFIG_FILE_NAME), e.to_string()))?;
        Ok(config.with_base_dir(base_dir))
    }

    /// Load `.buildwrap.toml` from the project root, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns error only if the file exists but cannot be read or parsed
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default().with_base_dir(project_root));
        }

        tracing::debug!(path = %config_path.display(), "Loading config file");
        Self::load(&config_path)
    }

    fn with_base_dir(mut self, base_dir: &Path) -> Self {
        self.resolve_relative_paths(base_dir);
        self
    }

    /// Resolve tool paths: expand `~/` and anchor relative paths to `base_dir`
    ///
    /// Bare program names (`cmake`) are left alone so they are found on `PATH`.
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        self.tools.git = Self::resolve_tool(&self.tools.git, base_dir);
        self.tools.cmake = Self::resolve_tool(&self.tools.cmake, base_dir);
    }

    fn resolve_tool(path: &Path, base_dir: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();

        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = ::dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~"
            && let Some(home) = ::dirs::home_dir()
        {
            return home;
        }

        if path.is_relative() && path.components().count() > 1 {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Absolute build directory for the given project root
    #[must_use]
    pub fn build_dir(&self, project_root: &Path) -> PathBuf {
        if self.general.build_dir.is_absolute() {
            self.general.build_dir.clone()
        } else {
            project_root.join(&self.general.build_dir)
        }
    }

    /// Generator arguments for a platform: global ones first, then platform ones
    #[must_use]
    pub fn generator_args_for(&self, platform: &str) -> Vec<String> {
        let platform_args: &[String] = match platform {
            "darwin" => &self.generator.darwin,
            "linux" => &self.generator.linux,
            "windows" => &self.generator.windows,
            _ => &[],
        };

        self.generator
            .args
            .iter()
            .chain(platform_args)
            .cloned()
            .collect()
    }

    /// Generator arguments for the current platform
    #[must_use]
    pub fn generator_args(&self) -> Vec<String> {
        self.generator_args_for(CURRENT_PLATFORM.os)
    }
}
