//! # Command Composer
//!
//! Pure translation of a profile record plus resolved paths into an [`Invocation`].
//! Nothing here touches the filesystem or spawns a process, and the argument order is
//! part of the contract: the external tools are sensitive to it.
use crate::{
    constants::{NATIVE_ARGS_SEPARATOR, TESTS_SUBDIR},
    core::{clean_guard, context::RunContext, profile_store::NamedProfile},
    models::{BuildProfile, ConfigureProfile, Generator, Invocation, TestProfile},
};
use std::path::{Path, PathBuf};

/// Renders a path as a single argument token.
fn path_arg(path: &Path) -> String {
    dunce::simplified(path).to_string_lossy().into_owned()
}

/// Configure invocation. Clause order:
/// flags, definitions, toolset, generator, arch, build dir, source dir.
pub fn compose_configure(
    profile: &ConfigureProfile,
    tool: &str,
    build_dir: &Path,
    source_dir: &Path,
) -> Invocation {
    let mut invocation = Invocation::new(tool);

    for flag in &profile.flags {
        invocation.arg(flag.as_str());
    }

    for definition in &profile.definitions {
        invocation.arg(format!(
            "-D{}:{}={}",
            definition.name, definition.kind, definition.value
        ));
    }

    for entry in &profile.toolset {
        invocation
            .arg("-T")
            .arg(format!("{}={}", entry.name, entry.value));
    }

    if let Generator::Named(generator) = &profile.generator {
        invocation.arg("-G").arg(generator.as_str());
    }

    if let Some(arch) = &profile.arch {
        invocation.arg("-A").arg(arch.as_str());
    }

    invocation.arg("-B").arg(path_arg(build_dir));
    invocation.arg("-S").arg(path_arg(source_dir));
    invocation
}

/// Build invocation. Always ends with the native-driver separator, even with no
/// pass-through arguments.
pub fn compose_build(profile: &BuildProfile, tool: &str, build_dir: &Path) -> Invocation {
    let mut invocation = Invocation::new(tool);
    invocation.arg("--build").arg(path_arg(build_dir));
    invocation.arg("--config").arg(profile.config.as_str());

    if let Some(target) = &profile.target {
        invocation.arg("--target").arg(target.as_str());
    }

    for flag in &profile.flags {
        invocation.arg(flag.name.as_str()).arg(flag.value.as_str());
    }

    invocation.arg(NATIVE_ARGS_SEPARATOR);
    invocation
}

/// Test invocation. A flag without a value renders as one bare token.
pub fn compose_test(profile: &TestProfile, tool: &str, test_dir: &Path) -> Invocation {
    let mut invocation = Invocation::new(tool);
    invocation.arg("-C").arg(profile.config.as_str());
    invocation.arg("-T").arg(profile.action.as_str());

    for flag in &profile.flags {
        invocation.arg(flag.name.as_str());
        if let Some(value) = &flag.value {
            invocation.arg(value.as_str());
        }
    }

    invocation.arg("--test-dir").arg(path_arg(test_dir));
    invocation
}

// --- Path selection ---

/// The profile's override when present, otherwise the global build path.
pub fn build_dir_for<P: NamedProfile>(context: &RunContext, profile: &P) -> PathBuf {
    context
        .resolve_override(profile.path_override())
        .unwrap_or_else(|| context.build_path().to_path_buf())
}

/// The profile's override when present and inside the build root, otherwise
/// `<global build path>/tests`.
pub fn test_dir_for(context: &RunContext, profile: &TestProfile) -> PathBuf {
    match context.resolve_override(profile.path_override()) {
        Some(path) if clean_guard::is_safe_clean_path(&context.workspace_root, &path) => path,
        Some(path) => {
            log::warn!(
                "Test profile '{}' path '{}' is outside the build root; using the default test directory.",
                profile.name,
                path.display()
            );
            context.build_path().join(TESTS_SUBDIR)
        }
        None => context.build_path().join(TESTS_SUBDIR),
    }
}

// --- Context-aware entry points ---

/// Composes the configure stage for `profile` within `context`.
pub fn configure_invocation(context: &RunContext, profile: &ConfigureProfile) -> Invocation {
    compose_configure(
        profile,
        &context.settings.tools.cmake,
        &build_dir_for(context, profile),
        &context.workspace_root,
    )
}

/// Composes the build stage for `profile` within `context`.
pub fn build_invocation(context: &RunContext, profile: &BuildProfile) -> Invocation {
    compose_build(
        profile,
        &context.settings.tools.cmake,
        &build_dir_for(context, profile),
    )
}

/// Composes the test stage for `profile` within `context`.
pub fn test_invocation(context: &RunContext, profile: &TestProfile) -> Invocation {
    compose_test(
        profile,
        &context.settings.tools.ctest,
        &test_dir_for(context, profile),
    )
}
