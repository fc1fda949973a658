//! Build plan: everything needed to turn the five steps into invocations
//!
//! The plan is pure data. Nothing here touches the filesystem or spawns a
//! process, so the same plan backs both a real run and `--dry-run`.

use crate::step::{Invocation, Step};
use buildwrap_config::Config;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved inputs for one orchestration run
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Directory the repository lives in; working directory for git
    pub project_root: PathBuf,
    /// Out-of-source build directory; working directory for cmake
    pub build_dir: PathBuf,
    /// Version control client
    pub git: PathBuf,
    /// Generator / build driver
    pub cmake: PathBuf,
    /// Generator arguments, configured ones first, then forwarded ones
    pub generator_args: Vec<String>,
    /// Extra arguments for `cmake --build .`
    pub build_args: Vec<String>,
    /// Extra environment for every tool
    pub env: IndexMap<String, String>,
    /// Run the dependency sync steps
    pub sync: bool,
    /// Per-tool timeout
    pub timeout: Option<Duration>,
}

impl BuildPlan {
    /// Plan with default tools and `<project_root>/build`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let build_dir = project_root.join("build");
        Self {
            project_root,
            build_dir,
            git: PathBuf::from("git"),
            cmake: PathBuf::from("cmake"),
            generator_args: Vec::new(),
            build_args: Vec::new(),
            env: IndexMap::new(),
            sync: true,
            timeout: None,
        }
    }

    /// Build a plan from loaded configuration plus the forwarded arguments
    ///
    /// Forwarded arguments keep their order and come after every configured
    /// generator argument.
    pub fn from_config(config: &Config, project_root: &Path, forwarded: &[String]) -> Self {
        let mut generator_args = config.generator_args();
        generator_args.extend(forwarded.iter().cloned());

        let timeout = match config.general.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            project_root: project_root.to_path_buf(),
            build_dir: config.build_dir(project_root),
            git: config.tools.git.clone(),
            cmake: config.tools.cmake.clone(),
            generator_args,
            build_args: config.generator.build_args.clone(),
            env: config.env.clone(),
            sync: config.general.sync,
            timeout,
        }
    }

    /// The external invocation behind a step (None for the directory step)
    pub fn invocation(&self, step: Step) -> Option<Invocation> {
        let invocation = match step {
            Step::EnsureBuildDir => return None,
            Step::Pull => Invocation::new(&self.git, &self.project_root).arg("pull"),
            Step::SubmoduleUpdate => Invocation::new(&self.git, &self.project_root).args([
                "submodule",
                "update",
                "--init",
                "--recursive",
            ]),
            Step::Generate => Invocation::new(&self.cmake, &self.build_dir)
                .arg(self.project_root.as_os_str())
                .args(&self.generator_args),
            Step::Build => Invocation::new(&self.cmake, &self.build_dir)
                .args(["--build", "."])
                .args(&self.build_args),
        };

        Some(invocation.envs(&self.env).timeout(self.timeout))
    }

    /// Human-readable description of a step, used by `--dry-run`
    pub fn describe(&self, step: Step) -> String {
        match self.invocation(step) {
            Some(invocation) => invocation.to_string(),
            None => format!("mkdir -p {}", self.build_dir.display()),
        }
    }
}
