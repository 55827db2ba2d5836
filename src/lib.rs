// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fetch;
pub mod install;
pub mod layout;
pub mod logging;
pub mod orchestrate;
pub mod provision;
pub mod supervise;
pub mod tasks;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::cli::{CliArgs, CliCommand};
use crate::config::loader::load_and_validate;
use crate::config::model::{ConfigFile, ProjectConfig};
use crate::errors::{Result, ShipwrightError};
use crate::exec::ProcessInvoker;
use crate::layout::Layout;
use crate::orchestrate::Orchestrator;
use crate::supervise::{LaunchOutcome, SupervisorEnv};
use crate::tasks::TaskRunner;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (except for `daemon`, which operates on an installed
///   tree and deliberately does not read the build configuration)
/// - the orchestrator / task runner / provisioning
/// - the daemon supervisor
pub async fn run(args: CliArgs) -> Result<()> {
    let CliArgs {
        config, command, ..
    } = args;
    let config_path = PathBuf::from(config);

    match command {
        CliCommand::Daemon { program, args } => {
            let env = SupervisorEnv::discover()?;
            debug!(home = %env.home_dir.display(), data = %env.data_dir.display(), "supervisor environment");
            let outcome = supervise::launch(&program, &args, &env)?;
            report_launch(&outcome);
            Ok(())
        }

        CliCommand::Install { dry_run } => {
            let (cfg, layout) = load_workspace(&config_path)?;
            if dry_run {
                print_install_plan(&cfg);
                return Ok(());
            }
            let invoker = ProcessInvoker;
            Orchestrator::new(&cfg, &layout, &invoker).install().await
        }

        CliCommand::Clean => {
            let (cfg, layout) = load_workspace(&config_path)?;
            let invoker = ProcessInvoker;
            Orchestrator::new(&cfg, &layout, &invoker).clean().await
        }

        CliCommand::Provision => {
            let (cfg, layout) = load_workspace(&config_path)?;
            provision::provision_assets(&cfg, &layout).await
        }

        CliCommand::Make { project, targets } => {
            let (cfg, layout) = load_workspace(&config_path)?;
            let project = resolve_make_project(&cfg, project.as_deref(), &layout)?;
            let invoker = ProcessInvoker;
            TaskRunner::new(project, &layout, &invoker)
                .run_targets(&targets)
                .await
        }
    }
}

fn load_workspace(config_path: &Path) -> Result<(ConfigFile, Layout)> {
    let cfg = load_and_validate(config_path)?;
    let layout = Layout::from_config(&config_root_dir(config_path), &cfg.layout)?;
    Ok((cfg, layout))
}

/// The workspace root: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve the project for `make`: by name when given, otherwise by
/// matching the current working directory against configured project
/// directories.
fn resolve_make_project<'c>(
    cfg: &'c ConfigFile,
    requested: Option<&str>,
    layout: &Layout,
) -> Result<&'c ProjectConfig> {
    if let Some(name) = requested {
        return cfg.find_project(name).ok_or_else(|| {
            ShipwrightError::ConfigError(format!("no project named '{name}' in configuration"))
        });
    }

    let cwd = std::env::current_dir().context("determining current directory")?;
    let cwd = std::fs::canonicalize(&cwd).with_context(|| format!("resolving {:?}", cwd))?;

    for project in &cfg.project {
        if let Ok(dir) = std::fs::canonicalize(layout.project_dir(project)) {
            if dir == cwd {
                return Ok(project);
            }
        }
    }

    Err(ShipwrightError::ConfigError(
        "current directory is not a configured project directory; use --project".to_string(),
    ))
}

fn report_launch(outcome: &LaunchOutcome) {
    match outcome {
        LaunchOutcome::AlreadyRunning { pid, command_line } => {
            println!("daemon already running (pid {pid}):");
            println!("  {command_line}");
        }
        LaunchOutcome::Launched { pid, log_file } => {
            println!("daemon started with pid {pid}");
            println!("logs are being written to: {}", log_file.display());
        }
    }
}

/// Simple dry-run output: print projects and declared assets.
fn print_install_plan(cfg: &ConfigFile) {
    println!("shipwright install plan");
    println!();

    let projects: Vec<_> = cfg.deployable_projects().collect();
    println!("projects ({}):", projects.len());
    for project in projects {
        println!("  - {} ({})", project.name, project.kind.kind_name());
        println!("      dir: {}", project.dir);
        if !project.env.is_empty() {
            let keys: Vec<&str> = project.env.keys().map(String::as_str).collect();
            println!("      env: {}", keys.join(", "));
        }
    }

    if !cfg.model.is_empty() {
        println!("model files ({}):", cfg.model.len());
        for model in &cfg.model {
            println!("  - {}", model.url);
        }
    }

    if let Some(runtime) = &cfg.runtime {
        let platforms: Vec<&str> = runtime.source.keys().map(String::as_str).collect();
        println!(
            "runtime library: {} (platforms: {})",
            runtime.install_name,
            platforms.join(", ")
        );
    }

    debug!("dry-run complete (no execution)");
}
