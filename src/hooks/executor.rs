use std::cell::RefCell;
use std::process::Command;

use tracing::debug;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::hooks::{HookCommand, HookStage};
use crate::ui::Reporter;
use crate::warning::ReleaseWarning;

/// Runs an external program to completion
pub trait CommandRunner {
    fn run(&self, name: &str, args: &[String]) -> Result<()>;
}

/// [CommandRunner] spawning real processes
///
/// Stdout and stderr are inherited so the hook's output reaches the user
/// directly. The call blocks until the process exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, name: &str, args: &[String]) -> Result<()> {
        let status = Command::new(name)
            .args(args)
            .status()
            .map_err(|e| ReleaseError::hook(format!("Failed to execute {}: {}", name, e)))?;

        if !status.success() {
            return Err(ReleaseError::hook(format!(
                "{} failed with exit code {}",
                name,
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

/// [CommandRunner] recording invocations instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<(String, Vec<String>)>>,
    failing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `name` fail
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.failing.push(name.into());
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, name: &str, args: &[String]) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((name.to_string(), args.to_vec()));
        if self.failing.iter().any(|f| f == name) {
            return Err(ReleaseError::hook(format!("{} failed with exit code 1", name)));
        }
        Ok(())
    }
}

/// Executes configured hook commands for one stage
pub struct HookExecutor<'a> {
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    dry_run: bool,
}

impl<'a> HookExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, reporter: &'a dyn Reporter, dry_run: bool) -> Self {
        HookExecutor {
            runner,
            reporter,
            dry_run,
        }
    }

    /// Run hooks in order
    ///
    /// A failing hook marked `break_on_error` stops the stage with an error.
    /// Any other failure is reported as a warning and the next hook runs.
    pub fn run_all(&self, stage: HookStage, hooks: &[HookCommand], version: &Version) -> Result<()> {
        for hook in hooks {
            if self.dry_run && !hook.run_in_dry_run {
                self.reporter.verbose(&format!(
                    "Dry run: skipping {} hook '{}'",
                    stage.name(),
                    hook.display()
                ));
                continue;
            }

            let args = hook.resolved_args(version);
            debug!(stage = stage.name(), command = %hook.name, ?args, "running hook");
            self.reporter
                .info(&format!("Running {} hook: {}", stage.name(), hook.display()));

            if let Err(e) = self.runner.run(&hook.name, &args) {
                if hook.break_on_error {
                    return Err(ReleaseError::hook(format!("'{}': {}", hook.display(), e)));
                }
                self.reporter.warning(&ReleaseWarning::HookFailed {
                    command: hook.display(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(())
    }
}
