use crate::{
    cli::{dispatcher::StageResult, handlers::commons},
    core::{composer, context::RunContext},
    models::{BuildProfile, Stage},
    system::executor::ProcessRunner,
};

/// Main entry point for the `build` stage.
pub fn handle(
    context: &RunContext,
    profile: &BuildProfile,
    runner: &mut dyn ProcessRunner,
) -> StageResult {
    let invocation = composer::build_invocation(context, profile);
    commons::run_invocation(Stage::Build, &profile.name, &invocation, context, runner)
}
