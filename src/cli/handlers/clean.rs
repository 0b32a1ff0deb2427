// src/cli/handlers/clean.rs

use crate::{
    cli::dispatcher::{StageResult, StageSuccess},
    core::{
        clean_guard::{self, CleanOutcome},
        context::RunContext,
    },
    models::ConfigureProfile,
    system::executor::ProcessRunner,
};
use colored::*;
use std::path::PathBuf;

/// Picks the directory the clean stage targets: the configure profile's override when
/// the guard accepts it, otherwise the global build path.
pub fn clean_target(context: &RunContext, configure: Option<&ConfigureProfile>) -> PathBuf {
    let override_path = configure.and_then(|p| {
        context
            .resolve_override(p.path.as_deref())
            .map(|path| (p.name.as_str(), path))
    });

    match override_path {
        Some((_, path)) if clean_guard::is_safe_clean_path(&context.workspace_root, &path) => path,
        Some((name, path)) => {
            log::warn!(
                "Configure profile '{}' path '{}' cannot be cleaned; falling back to the global build path.",
                name,
                path.display()
            );
            context.build_path().to_path_buf()
        }
        None => context.build_path().to_path_buf(),
    }
}

/// Removes the selected build tree. Guard refusals and deletion failures fail the stage.
pub fn handle(
    context: &RunContext,
    configure: Option<&ConfigureProfile>,
    runner: &mut dyn ProcessRunner,
) -> StageResult {
    let target = clean_target(context, configure);
    println!(
        "\n{} {} ({})",
        "▶".cyan(),
        "clean".bold(),
        target.display().to_string().yellow()
    );

    if runner.is_dry_run() {
        clean_guard::ensure_safe(&context.workspace_root, &target)?;
        if target.is_dir() {
            clean_guard::ensure_safe_on_disk(&context.workspace_root, &target)?;
        }
        println!("  {} {}", "Would remove".dimmed(), target.display());
        return Ok(StageSuccess::Completed);
    }

    match clean_guard::remove_build_tree(&context.workspace_root, &target)? {
        CleanOutcome::Removed(path) => {
            println!("  {} {}", "Removed".green(), path.display());
        }
        CleanOutcome::NothingToRemove(path) => {
            println!("  {} '{}'", "Nothing to clean at".dimmed(), path.display());
        }
    }
    Ok(StageSuccess::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::BUILD_PATH_KEY,
        core::platform::Platform,
        models::{Generator, Settings},
        system::executor::{DryRunRunner, SystemRunner},
    };
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn context(workspace: &TempDir, build_path: &str) -> RunContext {
        let mut global = BTreeMap::new();
        global.insert(BUILD_PATH_KEY.to_string(), build_path.to_string());
        RunContext::new(
            Settings {
                global,
                ..Default::default()
            },
            workspace.path().join("settings.json"),
            workspace.path().to_path_buf(),
            Platform::Linux,
        )
        .unwrap()
    }

    fn profile(path: Option<&str>) -> ConfigureProfile {
        ConfigureProfile {
            name: "ninja".to_string(),
            flags: vec![],
            definitions: vec![],
            toolset: vec![],
            generator: Generator::Default,
            arch: None,
            path: path.map(str::to_string),
        }
    }

    #[test]
    fn test_target_prefers_safe_override() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");

        let target = clean_target(&context, Some(&profile(Some("${WORKSPACE}/build/ninja"))));
        assert_eq!(target, workspace.path().join("build").join("ninja"));

        let target = clean_target(&context, Some(&profile(None)));
        assert_eq!(target, workspace.path().join("build").join("default"));

        let target = clean_target(&context, None);
        assert_eq!(target, workspace.path().join("build").join("default"));
    }

    #[test]
    fn test_target_ignores_unsafe_override() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");

        let target = clean_target(&context, Some(&profile(Some("${WORKSPACE}/src"))));
        assert_eq!(target, workspace.path().join("build").join("default"));
    }

    #[test]
    fn test_handle_removes_tree() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");
        let tree = workspace.path().join("build").join("default");
        fs::create_dir_all(tree.join("CMakeFiles")).unwrap();

        let result = handle(&context, None, &mut SystemRunner);
        assert!(matches!(result, Ok(StageSuccess::Completed)));
        assert!(!tree.exists());
    }

    #[test]
    fn test_handle_missing_tree_succeeds() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");
        assert!(handle(&context, None, &mut SystemRunner).is_ok());
    }

    #[test]
    fn test_dry_run_keeps_tree() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");
        let tree = workspace.path().join("build").join("default");
        fs::create_dir_all(&tree).unwrap();

        assert!(handle(&context, None, &mut DryRunRunner).is_ok());
        assert!(tree.exists());
    }

    #[test]
    fn test_unsafe_global_build_path_fails() {
        let workspace = TempDir::new().unwrap();
        let context = context(&workspace, "${WORKSPACE}");

        let result = handle(&context, None, &mut SystemRunner);
        assert!(result.is_err());
        assert!(workspace.path().exists());

        assert!(handle(&context, None, &mut DryRunRunner).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_reports_symlinked_target() {
        let workspace = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir_all(workspace.path().join("build")).unwrap();
        std::os::unix::fs::symlink(
            outside.path(),
            workspace.path().join("build").join("default"),
        )
        .unwrap();
        let context = context(&workspace, "${WORKSPACE}/build/default");

        assert!(handle(&context, None, &mut DryRunRunner).is_err());
        assert!(outside.path().exists());
    }
}
