use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use shipwright::errors::{Result, ShipwrightError};
use shipwright::exec::{Invocation, ToolInvoker};

/// A fake tool invoker that:
/// - records every invocation it receives
/// - fails invocations matching a scripted needle with a given exit code.
///
/// A needle matches when it is a substring of either the command line or
/// the working directory, so tests can fail "everything for project B"
/// (needle on the project dir) or "every cargo call" (needle on the
/// program).
pub struct FakeInvoker {
    executed: Arc<Mutex<Vec<Invocation>>>,
    failures: Vec<(String, i32)>,
}

impl FakeInvoker {
    pub fn new(executed: Arc<Mutex<Vec<Invocation>>>) -> Self {
        Self {
            executed,
            failures: Vec::new(),
        }
    }

    /// Script a failure: any invocation whose command line or cwd contains
    /// `needle` fails with `code`.
    pub fn with_failure(mut self, needle: &str, code: i32) -> Self {
        self.failures.push((needle.to_string(), code));
        self
    }
}

impl ToolInvoker for FakeInvoker {
    fn invoke(&self, inv: Invocation) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);
        let failure = self
            .failures
            .iter()
            .find(|(needle, _)| {
                inv.command_line().contains(needle.as_str())
                    || inv.cwd.to_string_lossy().contains(needle.as_str())
            })
            .map(|(_, code)| *code);

        Box::pin(async move {
            let command = inv.command_line();
            {
                let mut guard = executed.lock().unwrap();
                guard.push(inv);
            }

            match failure {
                Some(code) => Err(ShipwrightError::ToolFailed { command, code }),
                None => Ok(()),
            }
        })
    }
}
