// src/system/executor.rs

use crate::models::Invocation;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Failures to run an external tool, as opposed to the tool failing.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The invocation has an empty program name.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The process could not be spawned.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The process was killed by a signal and has no exit code.
    #[error("Command '{0}' was terminated before it could exit.")]
    Terminated(String),
}

/// Spawns external tools. The dispatcher only ever sees exit codes.
pub trait ProcessRunner {
    /// Runs `invocation` in `cwd` and blocks until it exits, returning its exit code.
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32, ExecutionError>;

    /// Whether filesystem side effects (deletion) should actually happen.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs invocations as real child processes, inheriting the terminal.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32, ExecutionError> {
        if invocation.program.trim().is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let clean_cwd = dunce::simplified(cwd);
        log::debug!(
            "Spawning '{}' in '{}'",
            invocation.program,
            clean_cwd.display()
        );

        // Arguments go straight to the process; no shell re-parses them.
        let status = StdCommand::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(clean_cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExecutionError::CommandFailed(invocation.display_line(), e))?;

        status
            .code()
            .ok_or_else(|| ExecutionError::Terminated(invocation.display_line()))
    }
}

/// Prints nothing extra and spawns nothing; every invocation "succeeds".
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl ProcessRunner for DryRunRunner {
    fn run(&mut self, invocation: &Invocation, _cwd: &Path) -> Result<i32, ExecutionError> {
        log::debug!("Dry run, not executing: {}", invocation);
        Ok(0)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
