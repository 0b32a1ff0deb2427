use crate::{
    cli::{dispatcher::StageResult, handlers::commons},
    core::{composer, context::RunContext},
    models::{ConfigureProfile, Stage},
    system::executor::ProcessRunner,
};

/// Main entry point for the `cfg` stage.
pub fn handle(
    context: &RunContext,
    profile: &ConfigureProfile,
    runner: &mut dyn ProcessRunner,
) -> StageResult {
    let invocation = composer::configure_invocation(context, profile);
    commons::run_invocation(Stage::Configure, &profile.name, &invocation, context, runner)
}
