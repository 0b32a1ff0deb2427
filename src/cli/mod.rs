use crate::{
    cli::dispatcher::{FailurePolicy, RunRequest},
    constants::{DEFAULT_PROFILE_NAME, DEFAULT_SETTINGS_PATH},
    core::profile_store::ProfileNames,
    models::Stage,
};
use clap::Parser;

pub mod dispatcher;
/// Per-stage handlers.
pub mod handlers;

/// stagehand: runs CMake configure, build, test and clean stages from named profiles.
///
/// Stages always execute in the order clean, cfg, build, test, whatever order they are
/// given in. Each profile name is looked up in the settings section of the current platform.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stages to run (clean, cfg, build, test).
    #[arg(value_enum, required = true, num_args = 1..)]
    pub actions: Vec<Stage>,

    /// Configure profile to use.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROFILE_NAME)]
    pub cfg: String,

    /// Build profile to use.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROFILE_NAME)]
    pub build: String,

    /// Test profile to use.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROFILE_NAME)]
    pub test: String,

    /// Build target. Accepted for compatibility; profiles carry their own target.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Location of the settings file (JSON, or TOML with a `.toml` extension).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: String,

    /// Print the commands and the clean target without running or deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failing stage instead of running every requested stage.
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Turns the parsed arguments into a dispatcher request.
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            actions: self.actions.iter().copied().collect(),
            profiles: ProfileNames {
                configure: self.cfg.clone(),
                build: self.build.clone(),
                test: self.test.clone(),
            },
            policy: if self.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::BestEffort
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["stagehand", "cfg"]).unwrap();
        assert_eq!(cli.actions, vec![Stage::Configure]);
        assert_eq!(cli.cfg, "default");
        assert_eq!(cli.build, "default");
        assert_eq!(cli.test, "default");
        assert_eq!(cli.settings, "./settings.json");
        assert!(!cli.dry_run);

        let request = cli.to_request();
        assert_eq!(request.policy, FailurePolicy::BestEffort);
        assert_eq!(request.profiles, ProfileNames::default());
    }

    #[test]
    fn test_actions_and_profile_names() {
        let cli = Cli::try_parse_from([
            "stagehand",
            "test",
            "clean",
            "build",
            "--build",
            "release",
            "--test",
            "ci",
            "--settings",
            "conf/settings.toml",
            "--target",
            "ALL_BUILD",
            "--fail-fast",
        ])
        .unwrap();

        let request = cli.to_request();
        assert!(request.actions.contains(&Stage::Clean));
        assert!(request.actions.contains(&Stage::Build));
        assert!(request.actions.contains(&Stage::Test));
        assert!(!request.actions.contains(&Stage::Configure));
        assert_eq!(request.profiles.build, "release");
        assert_eq!(request.profiles.test, "ci");
        assert_eq!(request.policy, FailurePolicy::FailFast);
        assert_eq!(cli.target.as_deref(), Some("ALL_BUILD"));
    }

    #[test]
    fn test_actions_are_required() {
        assert!(Cli::try_parse_from(["stagehand"]).is_err());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Cli::try_parse_from(["stagehand", "install"]).is_err());
    }
}
