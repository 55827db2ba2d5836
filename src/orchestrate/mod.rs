// src/orchestrate/mod.rs

//! Top-level orchestration across the declared project list.
//!
//! Projects run strictly sequentially, in declaration order, stopping on
//! the first failure — no partial continuation, no rollback of completed
//! projects. Declaration order is the only dependency mechanism, so the
//! configured order must already satisfy every inter-project build
//! dependency (a shared library project before the project linking it).
//!
//! All steps are idempotent, so a partial distribution tree after a
//! failure is repaired by simply re-running the orchestrator.

pub mod scripts;

use tracing::info;

use crate::config::model::{ConfigFile, ProjectConfig};
use crate::errors::Result;
use crate::exec::ToolInvoker;
use crate::layout::Layout;
use crate::provision;
use crate::tasks::{TaskRunner, Target};

pub struct Orchestrator<'a> {
    cfg: &'a ConfigFile,
    layout: &'a Layout,
    invoker: &'a dyn ToolInvoker,
}

impl<'a> Orchestrator<'a> {
    pub fn new(cfg: &'a ConfigFile, layout: &'a Layout, invoker: &'a dyn ToolInvoker) -> Self {
        Self {
            cfg,
            layout,
            invoker,
        }
    }

    /// The full install pipeline: build + install every deployable project
    /// in declared order, then provision external assets, then install
    /// operator scripts.
    pub async fn install(&self) -> Result<()> {
        for project in self.cfg.deployable_projects() {
            let runner = self.runner(project);
            info!(project = %project.name, "building project");
            runner.run(Target::Build).await?;
            info!(project = %project.name, "installing project");
            runner.run(Target::Install).await?;
        }

        provision::provision_assets(self.cfg, self.layout).await?;

        scripts::install_operator_scripts(self.layout.scripts_dir(), &self.layout.bin_dir())?;

        Ok(())
    }

    /// Run `clean` across **all** declared projects, deployable or not.
    pub async fn clean(&self) -> Result<()> {
        self.run_verb(Target::Clean, self.cfg.project.iter()).await
    }

    /// Apply one target uniformly across a project list, fail-fast.
    pub async fn run_verb(
        &self,
        target: Target,
        projects: impl Iterator<Item = &'a ProjectConfig>,
    ) -> Result<()> {
        for project in projects {
            info!(project = %project.name, target = %target, "running project target");
            self.runner(project).run(target).await?;
        }
        Ok(())
    }

    fn runner(&self, project: &'a ProjectConfig) -> TaskRunner<'a> {
        TaskRunner::new(project, self.layout, self.invoker)
    }
}
