// src/bin/stagehand.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use stagehand::{
    cli::{
        Cli,
        dispatcher::{self, RunReport},
    },
    core::{config_loader, context::RunContext, platform::Platform},
    system::executor::{DryRunRunner, ProcessRunner, SystemRunner},
};

/// Sets up logging, runs the requested stages and turns the outcome into an exit code.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run_cli(Cli::parse()) {
        Ok(report) if report.has_failures() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Loads the settings, builds the run context and dispatches the stages.
///
/// Errors returned here are fatal to the whole run: unreadable or invalid settings and
/// ambiguous profile names. Failures of individual stages live in the report.
fn run_cli(cli: Cli) -> Result<RunReport> {
    log::debug!("CLI args parsed: {:?}", cli);
    if let Some(target) = &cli.target {
        log::debug!("Ignoring --target '{}'; build profiles carry their own target.", target);
    }

    let settings_path = config_loader::expand_settings_path(&cli.settings);
    let context = RunContext::load(&settings_path, Platform::current())?;
    println!(
        "{} {} ({})",
        "Settings:".dimmed(),
        context.settings_path.display(),
        context.platform
    );

    let mut runner: Box<dyn ProcessRunner> = if cli.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner)
    };

    let report = dispatcher::dispatch(&context, &cli.to_request(), runner.as_mut())?;
    report.print_summary();
    Ok(report)
}
