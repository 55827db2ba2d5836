// src/exec/mod.rs

//! Child tool invocation layer.
//!
//! The task runner describes every delegated build-tool call as an
//! [`Invocation`] and hands it to a [`ToolInvoker`]:
//!
//! - [`ProcessInvoker`] is the production implementation
//!   (`tokio::process::Command`, inherited stdio).
//! - Tests provide their own `ToolInvoker` that records invocations and
//!   simulates failures without spawning real processes.

pub mod invoker;

pub use invoker::ProcessInvoker;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;

/// A fully described child tool invocation.
///
/// Environment entries are materialized on the child only at spawn time;
/// the invoking process environment is never mutated to pass them along.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            cwd,
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The command line as a single diagnostic string.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.args.len());
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Trait abstracting how child tools are executed.
///
/// Production code uses [`ProcessInvoker`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ToolInvoker: Send + Sync {
    /// Run the invocation to completion.
    ///
    /// A nonzero exit maps to `ShipwrightError::ToolFailed` carrying the
    /// tool's own exit status.
    fn invoke(&self, inv: Invocation) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
