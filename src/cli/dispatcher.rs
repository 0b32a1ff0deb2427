//! # Action Dispatcher
//!
//! Runs the requested stages in the fixed order clean, cfg, build, test. Stages are
//! independent: each returns its own [`StageResult`], and a [`FailurePolicy`] decides whether
//! a failure stops the remaining stages. Duplicate profile names are the only condition
//! that aborts a run before any stage starts.
use crate::{
    cli::handlers,
    core::{
        clean_guard::CleanError,
        context::RunContext,
        platform::Platform,
        profile_store::{ProfileError, ProfileKind, ProfileNames, ProfileSelection},
    },
    models::Stage,
    system::executor::{ExecutionError, ProcessRunner},
};
use colored::*;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Why a stage failed.
#[derive(Error, Debug)]
pub enum StageError {
    /// The external tool exited with a non-zero code.
    #[error("'{command}' exited with code {code}.")]
    ToolFailed { command: String, code: i32 },
    /// The external tool could not be run at all.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// The clean target was refused or could not be removed.
    #[error(transparent)]
    Clean(#[from] CleanError),
}

/// Why a stage did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The stage was not among the requested actions.
    NotRequested,
    /// No profile with the requested name exists for this platform.
    ProfileNotFound { kind: ProfileKind, name: String },
    /// The host platform is not one the settings file can describe.
    UnknownPlatform,
    /// An earlier stage failed under [`FailurePolicy::FailFast`].
    Aborted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => f.write_str("not requested"),
            Self::ProfileNotFound { kind, name } => {
                write!(f, "no {} profile named '{}'", kind, name)
            }
            Self::UnknownPlatform => f.write_str("unknown host platform"),
            Self::Aborted => f.write_str("an earlier stage failed"),
        }
    }
}

/// A stage that ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSuccess {
    /// The stage ran to completion.
    Completed,
    /// The stage did not run.
    Skipped(SkipReason),
}

/// Outcome of a single stage.
pub type StageResult = Result<StageSuccess, StageError>;

/// What to do with the remaining stages once one has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Run every requested stage regardless of earlier failures.
    #[default]
    BestEffort,
    /// Skip every stage after the first failure.
    FailFast,
}

/// The parsed intent of a run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Stages to run; executed in [`Stage::ORDER`] regardless of insertion order.
    pub actions: BTreeSet<Stage>,
    /// Profile name requested for each collection.
    pub profiles: ProfileNames,
    /// What to do after a stage fails.
    pub policy: FailurePolicy,
}

/// The recorded outcome of one stage.
#[derive(Debug)]
pub struct StageReport {
    /// The stage this entry is about.
    pub stage: Stage,
    /// What happened to it.
    pub result: StageResult,
}

/// Per-stage results of a run, in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per stage, in [`Stage::ORDER`].
    pub stages: Vec<StageReport>,
}

impl RunReport {
    /// Whether any stage ended with an error.
    pub fn has_failures(&self) -> bool {
        self.stages.iter().any(|s| s.result.is_err())
    }

    /// The result recorded for `stage`.
    pub fn result(&self, stage: Stage) -> Option<&StageResult> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| &s.result)
    }

    /// Prints one line per stage so skipped, failed and finished stages are told apart.
    pub fn print_summary(&self) {
        println!("\n{}", "Summary".bold());
        for report in &self.stages {
            let name = format!("{:<6}", report.stage.as_str());
            match &report.result {
                Ok(StageSuccess::Completed) => {
                    println!("  {} {} {}", "✓".green(), name.bold(), "ok".green());
                }
                Ok(StageSuccess::Skipped(SkipReason::NotRequested)) => {
                    println!("  {} {} {}", "-".dimmed(), name.dimmed(), "not requested".dimmed());
                }
                Ok(StageSuccess::Skipped(reason)) => {
                    println!("  {} {} skipped: {}", "!".yellow(), name.bold(), reason);
                }
                Err(e) => {
                    println!("  {} {} {}", "x".red(), name.bold(), e.to_string().red());
                }
            }
        }
    }
}

/// Runs every requested stage of `request` against `context`.
///
/// # Errors
/// Returns [`ProfileError::DuplicateProfile`] before any stage runs when a requested
/// profile name is ambiguous. Stage failures are recorded in the [`RunReport`] instead.
pub fn dispatch(
    context: &RunContext,
    request: &RunRequest,
    runner: &mut dyn ProcessRunner,
) -> Result<RunReport, ProfileError> {
    log::debug!("Dispatching request: {:?}", request);

    let store = context.store();
    let unknown_platform = store.platform() == Platform::Unknown;
    if unknown_platform {
        println!(
            "{} Unknown host platform; no profiles apply and every stage will be skipped.",
            "!".yellow()
        );
    }

    let selection = store.select(&request.profiles, &profile_kinds(&request.actions))?;

    let mut report = RunReport::default();
    let mut aborted = false;

    for stage in Stage::ORDER {
        let result = if !request.actions.contains(&stage) {
            Ok(StageSuccess::Skipped(SkipReason::NotRequested))
        } else if unknown_platform {
            Ok(StageSuccess::Skipped(SkipReason::UnknownPlatform))
        } else if aborted {
            Ok(StageSuccess::Skipped(SkipReason::Aborted))
        } else {
            run_stage(stage, context, &selection, request, runner)
        };

        match &result {
            Err(e) => {
                eprintln!("{} {}: {}", "x".red(), stage.as_str().bold(), e);
                if request.policy == FailurePolicy::FailFast {
                    aborted = true;
                }
            }
            Ok(StageSuccess::Skipped(reason @ SkipReason::ProfileNotFound { .. })) => {
                println!(
                    "{} Skipping {}: {} for platform '{}'.",
                    "!".yellow(),
                    stage.as_str().bold(),
                    reason,
                    context.platform
                );
            }
            Ok(_) => {}
        }

        report.stages.push(StageReport { stage, result });
    }

    Ok(report)
}

/// The profile collections the requested stages read. `clean` targets the tree owned by the
/// configure profile.
fn profile_kinds(actions: &BTreeSet<Stage>) -> Vec<ProfileKind> {
    let mut kinds = Vec::new();
    if actions.contains(&Stage::Clean) || actions.contains(&Stage::Configure) {
        kinds.push(ProfileKind::Configure);
    }
    if actions.contains(&Stage::Build) {
        kinds.push(ProfileKind::Build);
    }
    if actions.contains(&Stage::Test) {
        kinds.push(ProfileKind::Test);
    }
    kinds
}

fn run_stage(
    stage: Stage,
    context: &RunContext,
    selection: &ProfileSelection<'_>,
    request: &RunRequest,
    runner: &mut dyn ProcessRunner,
) -> StageResult {
    let not_found = |kind: ProfileKind, name: &str| -> StageResult {
        Ok(StageSuccess::Skipped(SkipReason::ProfileNotFound {
            kind,
            name: name.to_string(),
        }))
    };

    match stage {
        Stage::Clean => handlers::clean::handle(context, selection.configure, runner),
        Stage::Configure => match selection.configure {
            Some(profile) => handlers::configure::handle(context, profile, runner),
            None => not_found(ProfileKind::Configure, &request.profiles.configure),
        },
        Stage::Build => match selection.build {
            Some(profile) => handlers::build::handle(context, profile, runner),
            None => not_found(ProfileKind::Build, &request.profiles.build),
        },
        Stage::Test => match selection.test {
            Some(profile) => handlers::test::handle(context, profile, runner),
            None => not_found(ProfileKind::Test, &request.profiles.test),
        },
    }
}
