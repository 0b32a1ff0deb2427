// src/cli/handlers/commons.rs

// Shared helpers used by the stage handlers.

use crate::{
    cli::dispatcher::{StageError, StageResult, StageSuccess},
    core::context::RunContext,
    models::{Invocation, Stage},
    system::executor::ProcessRunner,
};
use colored::*;

/// Prints `invocation`, runs it from the workspace root and maps its exit code to a
/// stage result. The command line is always printed before anything is spawned.
pub fn run_invocation(
    stage: Stage,
    profile_name: &str,
    invocation: &Invocation,
    context: &RunContext,
    runner: &mut dyn ProcessRunner,
) -> StageResult {
    let line = invocation.display_line();
    println!(
        "\n{} {} ({})",
        "▶".cyan(),
        stage.as_str().bold(),
        profile_name.yellow()
    );
    println!("  {}", line.dimmed());
    log::info!("[{}] {}", stage, line);

    if runner.is_dry_run() {
        println!("  {}", "(dry run, not executed)".dimmed());
    }

    let code = runner.run(invocation, &context.workspace_root)?;
    if code == 0 {
        Ok(StageSuccess::Completed)
    } else {
        Err(StageError::ToolFailed {
            command: line,
            code,
        })
    }
}
