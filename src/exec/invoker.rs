// src/exec/invoker.rs

use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use tokio::process::Command;
use tracing::info;

use crate::errors::{Result, ShipwrightError};
use crate::exec::{Invocation, ToolInvoker};

/// Real tool invoker used in production.
///
/// Child stdio is inherited so build tool output streams straight to the
/// operator's terminal; the call blocks until the tool exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ToolInvoker for ProcessInvoker {
    fn invoke(&self, inv: Invocation) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(
                cmd = %inv.command_line(),
                cwd = %inv.cwd.display(),
                "running tool"
            );

            let mut cmd = Command::new(&inv.program);
            cmd.args(&inv.args).current_dir(&inv.cwd);
            for (key, value) in &inv.envs {
                cmd.env(key, value);
            }

            let status = cmd
                .status()
                .await
                .with_context(|| format!("spawning '{}'", inv.command_line()))?;

            if status.success() {
                Ok(())
            } else {
                Err(ShipwrightError::ToolFailed {
                    command: inv.command_line(),
                    code: status.code().unwrap_or(-1),
                })
            }
        })
    }
}
