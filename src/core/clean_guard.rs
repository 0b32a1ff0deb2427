//! # Clean Guard
//!
//! Decides whether a path may be deleted recursively and performs the deletion.
//! Only strict descendants of `<workspace>/build` whose every extra segment is made of
//! ASCII alphanumerics, `-` or `_` are accepted.
use crate::constants::BUILD_ROOT_DIRNAME;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

lazy_static! {
    static ref SAFE_SEGMENT_RE: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+$").expect("safe segment pattern is valid");
}

/// Refusals and failures of a guarded removal.
#[derive(Error, Debug)]
pub enum CleanError {
    /// The guard refused the path; nothing was touched.
    #[error("Invalid clean path '{path}': only directories inside '{build_root}' may be removed.")]
    UnsafeCleanPath { path: String, build_root: String },
    /// The path could not be resolved on disk.
    #[error("Failed to inspect '{path}': {source}")]
    Inspect {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The filesystem refused the removal.
    #[error("Failed to remove '{path}': {source}")]
    Deletion {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a guarded removal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The directory existed and was removed.
    Removed(PathBuf),
    /// Nothing exists at the path; there was nothing to do.
    NothingToRemove(PathBuf),
}

/// The directory every cleanable path must live under.
pub fn build_root(workspace_root: &Path) -> PathBuf {
    workspace_root.join(BUILD_ROOT_DIRNAME)
}

/// Returns `true` iff `candidate` is a strict descendant of `<workspace_root>/build`
/// made only of safe segments.
pub fn is_safe_clean_path(workspace_root: &Path, candidate: &Path) -> bool {
    let Ok(relative) = candidate.strip_prefix(build_root(workspace_root)) else {
        return false;
    };

    let mut segments = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let is_safe = part.to_str().is_some_and(|s| SAFE_SEGMENT_RE.is_match(s));
                if !is_safe {
                    return false;
                }
                segments += 1;
            }
            _ => return false,
        }
    }

    segments > 0
}

/// Re-applies the guard to where `target` actually lives on disk. Symlinks anywhere along
/// `<workspace>/build/...` resolve elsewhere and are refused.
pub fn ensure_safe_on_disk(workspace_root: &Path, target: &Path) -> Result<(), CleanError> {
    let canonicalize = |path: &Path| {
        dunce::canonicalize(path).map_err(|e| CleanError::Inspect {
            path: path.display().to_string(),
            source: e,
        })
    };

    let real_workspace = canonicalize(workspace_root)?;
    let real_target = canonicalize(target)?;
    let is_symlink = fs::symlink_metadata(target)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(true);

    if is_symlink || !is_safe_clean_path(&real_workspace, &real_target) {
        log::warn!(
            "Clean target '{}' resolves to '{}', outside the build root.",
            target.display(),
            real_target.display()
        );
        return Err(CleanError::UnsafeCleanPath {
            path: target.display().to_string(),
            build_root: build_root(workspace_root).display().to_string(),
        });
    }
    Ok(())
}

/// Checks `candidate` against the guard and turns a refusal into a [`CleanError`].
pub fn ensure_safe(workspace_root: &Path, candidate: &Path) -> Result<(), CleanError> {
    if is_safe_clean_path(workspace_root, candidate) {
        Ok(())
    } else {
        Err(CleanError::UnsafeCleanPath {
            path: candidate.display().to_string(),
            build_root: build_root(workspace_root).display().to_string(),
        })
    }
}

/// Recursively removes `target` after validating it with the guard.
///
/// # Errors
/// [`CleanError::UnsafeCleanPath`] when the guard refuses the path, either as written or
/// once symlinks are resolved (nothing is touched). [`CleanError::Inspect`] when the path
/// cannot be resolved, [`CleanError::Deletion`] when the filesystem refuses the removal.
pub fn remove_build_tree(workspace_root: &Path, target: &Path) -> Result<CleanOutcome, CleanError> {
    ensure_safe(workspace_root, target)?;

    if !target.is_dir() {
        log::debug!("Clean target '{}' does not exist.", target.display());
        return Ok(CleanOutcome::NothingToRemove(target.to_path_buf()));
    }
    ensure_safe_on_disk(workspace_root, target)?;

    log::info!("Removing build tree '{}'", target.display());
    fs::remove_dir_all(target).map_err(|e| CleanError::Deletion {
        path: target.display().to_string(),
        source: e,
    })?;

    Ok(CleanOutcome::Removed(target.to_path_buf()))
}
