// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `shipwright`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shipwright",
    version,
    about = "Build, install and provision a multi-project distribution tree.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Shipwright.toml` in the current working directory.
    /// The `daemon` subcommand does not read it.
    #[arg(long, value_name = "PATH", default_value = "Shipwright.toml", global = true)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHIPWRIGHT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Build and install every deployable project in declared order, then
    /// provision external assets and install operator scripts.
    Install {
        /// Print the plan without executing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the `clean` target across all declared projects.
    Clean,

    /// Run one or more targets for a single project.
    ///
    /// With no targets, `build` is implied. With no `--project`, the project
    /// whose directory is the current working directory is used.
    Make {
        /// Project name from the configuration.
        #[arg(long, short = 'p', value_name = "NAME")]
        project: Option<String>,

        /// Target names (clean, build, test, install, run, init-dev).
        targets: Vec<String>,
    },

    /// Fetch declared external assets (model files, runtime library) into
    /// the distribution tree. Idempotent; previously fetched files are
    /// reused from the download cache.
    Provision,

    /// Launch a daemon process detached from this one, ensuring at most a
    /// single running instance per host.
    Daemon {
        /// Executable name or path; bare names are resolved under the
        /// installed tree's `bin` directory.
        program: String,

        /// Arguments passed through to the daemon process.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
