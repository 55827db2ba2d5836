// src/tasks/mod.rs

//! Per-project task running.
//!
//! - `Target` is the fixed vocabulary of build-lifecycle operations.
//! - [`TaskRunner`] resolves requested target names against a project's
//!   kind and executes the implementations in order, fail-fast.
//!
//! Resolution is all-or-nothing and happens before anything runs: an
//! unknown or unsupported name aborts with zero targets executed, which
//! keeps a typo from leaving a half-built project behind.

pub mod targets;

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::config::model::{ProjectConfig, ProjectKind};
use crate::errors::{Result, ShipwrightError};
use crate::exec::ToolInvoker;
use crate::layout::Layout;

/// A named, supported build-lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Clean,
    Build,
    Test,
    Install,
    Run,
    InitDev,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Target::Clean),
            "build" => Ok(Target::Build),
            "test" => Ok(Target::Test),
            "install" => Ok(Target::Install),
            "run" => Ok(Target::Run),
            "init_dev" | "init-dev" => Ok(Target::InitDev),
            other => Err(format!("unknown target '{other}'")),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::Clean => "clean",
            Target::Build => "build",
            Target::Test => "test",
            Target::Install => "install",
            Target::Run => "run",
            Target::InitDev => "init-dev",
        };
        f.write_str(name)
    }
}

/// The targets a project kind implements.
///
/// A listed target may still be an explicit no-op (e.g. `build` for plain
/// asset projects); what matters is that the kind advertises it.
pub fn supported_targets(kind: &ProjectKind) -> &'static [Target] {
    match kind {
        ProjectKind::Cargo { .. } => &[
            Target::Clean,
            Target::Build,
            Target::Test,
            Target::Install,
            Target::Run,
        ],
        ProjectKind::Cmake { .. } => {
            &[Target::Clean, Target::Build, Target::Test, Target::Install]
        }
        ProjectKind::Web { .. } => &[
            Target::Clean,
            Target::Build,
            Target::Test,
            Target::Install,
            Target::Run,
            Target::InitDev,
        ],
        ProjectKind::Desktop => &[
            Target::Clean,
            Target::Build,
            Target::Test,
            Target::Install,
            Target::Run,
        ],
        ProjectKind::Assets { .. } => &[Target::Clean, Target::Build, Target::Install],
    }
}

/// Dispatches named targets for one project.
pub struct TaskRunner<'a> {
    project: &'a ProjectConfig,
    layout: &'a Layout,
    invoker: &'a dyn ToolInvoker,
}

impl<'a> TaskRunner<'a> {
    pub fn new(project: &'a ProjectConfig, layout: &'a Layout, invoker: &'a dyn ToolInvoker) -> Self {
        Self {
            project,
            layout,
            invoker,
        }
    }

    /// Resolve all requested names, then execute each in order, aborting
    /// the whole run on the first target that errors. An empty request
    /// means the implicit `build`.
    pub async fn run_targets(&self, requested: &[String]) -> Result<()> {
        let targets = self.resolve_targets(requested)?;
        for target in targets {
            self.run_resolved(target).await?;
        }
        Ok(())
    }

    /// Run a single target, checking kind support first.
    pub async fn run(&self, target: Target) -> Result<()> {
        self.check_supported(target)?;
        self.run_resolved(target).await
    }

    fn resolve_targets(&self, requested: &[String]) -> Result<Vec<Target>> {
        if requested.is_empty() {
            return Ok(vec![Target::Build]);
        }

        let mut targets = Vec::with_capacity(requested.len());
        for name in requested {
            let target =
                name.parse::<Target>()
                    .map_err(|_| ShipwrightError::UnknownTarget {
                        project: self.project.name.clone(),
                        target: name.clone(),
                    })?;
            self.check_supported(target)?;
            targets.push(target);
        }
        Ok(targets)
    }

    fn check_supported(&self, target: Target) -> Result<()> {
        if supported_targets(&self.project.kind).contains(&target) {
            Ok(())
        } else {
            Err(self.unsupported(target))
        }
    }

    fn unsupported(&self, target: Target) -> ShipwrightError {
        ShipwrightError::UnsupportedTarget {
            project: self.project.name.clone(),
            target: target.to_string(),
        }
    }

    async fn run_resolved(&self, target: Target) -> Result<()> {
        info!(
            project = %self.project.name,
            kind = self.project.kind.kind_name(),
            target = %target,
            "running target"
        );

        match &self.project.kind {
            ProjectKind::Cargo {
                features,
                static_assets,
            } => self.run_cargo(target, features, static_assets.as_deref()).await,
            ProjectKind::Cmake { preset } => self.run_cmake(target, preset).await,
            ProjectKind::Web {
                public_url,
                install_to,
            } => self.run_web(target, public_url, install_to).await,
            ProjectKind::Desktop => self.run_desktop(target).await,
            ProjectKind::Assets {
                source_dir,
                install_to,
            } => self.run_assets(target, source_dir, install_to),
        }
    }
}
