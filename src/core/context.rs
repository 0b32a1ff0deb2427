// src/core/context.rs

use crate::{
    constants::BUILD_PATH_KEY,
    core::{
        config_loader::{self, ConfigError},
        interpolator::{Interpolator, ResolvedPaths},
        platform::Platform,
        profile_store::ProfileStore,
    },
    models::Settings,
};
use std::path::{Path, PathBuf};

/// Everything a run needs that is computed once and never mutated: the typed settings,
/// the detected platform, the workspace root and the resolved global paths.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The parsed settings file.
    pub settings: Settings,
    /// Canonical location of the settings file.
    pub settings_path: PathBuf,
    /// Directory containing the settings file. Bound to `${WORKSPACE}` and used as the
    /// configure source directory.
    pub workspace_root: PathBuf,
    /// Platform whose profiles are active.
    pub platform: Platform,
    /// Every `global` entry, resolved.
    pub paths: ResolvedPaths,
    interpolator: Interpolator,
    build_path: PathBuf,
}

impl RunContext {
    /// Loads the settings file and prepares the context for `platform`.
    ///
    /// # Errors
    /// Any [`ConfigError`] raised while reading, parsing or validating the file.
    pub fn load(settings_path: &Path, platform: Platform) -> Result<Self, ConfigError> {
        let settings = config_loader::load_settings(settings_path)?;

        let canonical = dunce::canonicalize(settings_path).map_err(|e| ConfigError::Read {
            path: settings_path.display().to_string(),
            source: e,
        })?;
        let workspace_root = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::new(settings, canonical, workspace_root, platform)
    }

    /// Builds a context from already-parsed settings.
    ///
    /// # Errors
    /// [`ConfigError::MissingGlobalPath`] when `global.build_path` is absent.
    pub fn new(
        settings: Settings,
        settings_path: PathBuf,
        workspace_root: PathBuf,
        platform: Platform,
    ) -> Result<Self, ConfigError> {
        let interpolator = Interpolator::new(&workspace_root);
        let paths = interpolator.resolve_all(&settings.global);

        let build_path = paths
            .get(BUILD_PATH_KEY)
            .cloned()
            .ok_or_else(|| ConfigError::MissingGlobalPath {
                path: settings_path.display().to_string(),
                key: BUILD_PATH_KEY,
            })?;

        log::debug!(
            "Run context: platform={}, workspace={}, build_path={}",
            platform,
            workspace_root.display(),
            build_path.display()
        );

        Ok(Self {
            settings,
            settings_path,
            workspace_root,
            platform,
            paths,
            interpolator,
            build_path,
        })
    }

    /// The profile collections active for this run's platform.
    pub fn store(&self) -> ProfileStore<'_> {
        ProfileStore::new(&self.settings, self.platform, &self.settings_path)
    }

    /// The resolved global build path.
    pub fn build_path(&self) -> &Path {
        &self.build_path
    }

    /// Resolves a profile's path override with the same resolver used for `global`.
    pub fn resolve_override(&self, template: Option<&str>) -> Option<PathBuf> {
        template.map(|t| self.interpolator.resolve_path(t))
    }
}
