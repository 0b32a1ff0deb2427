//! # Profile Store
//!
//! A read-only, platform-scoped view over the loaded settings, plus the name lookup that
//! enforces profile-name uniqueness within each collection.
use crate::{
    constants::DEFAULT_PROFILE_NAME,
    core::platform::Platform,
    models::{BuildProfile, ConfigureProfile, PlatformProfiles, Settings, TestProfile},
};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Fatal lookup problems.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// More than one profile carries a requested name.
    #[error(
        "Settings file '{settings}' defines {count} {kind} profiles named '{name}' for platform '{platform}'. Profile names must be unique."
    )]
    DuplicateProfile {
        settings: String,
        platform: Platform,
        kind: ProfileKind,
        name: String,
        count: usize,
    },
}

/// The three profile collections of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// `configure` profiles, used by the `cfg` and `clean` stages.
    Configure,
    /// `build` profiles.
    Build,
    /// `test` profiles.
    Test,
}

impl ProfileKind {
    /// Every collection, in stage order.
    pub const ALL: [Self; 3] = [Self::Configure, Self::Build, Self::Test];
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
        })
    }
}

/// Common view over the three profile record types.
pub trait NamedProfile {
    /// The name the profile is selected by.
    fn name(&self) -> &str;
    /// The path template overriding the global build path, if any.
    fn path_override(&self) -> Option<&str>;
}

impl NamedProfile for ConfigureProfile {
    fn name(&self) -> &str {
        &self.name
    }
    fn path_override(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl NamedProfile for BuildProfile {
    fn name(&self) -> &str {
        &self.name
    }
    fn path_override(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl NamedProfile for TestProfile {
    fn name(&self) -> &str {
        &self.name
    }
    fn path_override(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// The profile names requested for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileNames {
    /// Value of `--cfg`.
    pub configure: String,
    /// Value of `--build`.
    pub build: String,
    /// Value of `--test`.
    pub test: String,
}

impl Default for ProfileNames {
    fn default() -> Self {
        Self {
            configure: DEFAULT_PROFILE_NAME.to_string(),
            build: DEFAULT_PROFILE_NAME.to_string(),
            test: DEFAULT_PROFILE_NAME.to_string(),
        }
    }
}

/// The outcome of looking up every requested name. `None` means "no match, skip the stage".
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSelection<'a> {
    /// Selected configure profile.
    pub configure: Option<&'a ConfigureProfile>,
    /// Selected build profile.
    pub build: Option<&'a BuildProfile>,
    /// Selected test profile.
    pub test: Option<&'a TestProfile>,
}

/// Platform-scoped view over [`Settings`].
#[derive(Debug, Clone, Copy)]
pub struct ProfileStore<'a> {
    platform: Platform,
    origin: &'a Path,
    profiles: Option<&'a PlatformProfiles>,
}

impl<'a> ProfileStore<'a> {
    /// Scopes `settings` to `platform`. `origin` is the settings file, used in diagnostics.
    ///
    /// An unknown platform, or a platform absent from the file, yields empty collections.
    pub fn new(settings: &'a Settings, platform: Platform, origin: &'a Path) -> Self {
        let profiles = match platform {
            Platform::MacOsx => settings.cmake.macosx.as_ref(),
            Platform::Win32 => settings.cmake.win32.as_ref(),
            Platform::Linux => settings.cmake.linux.as_ref(),
            Platform::Unknown => None,
        };

        if profiles.is_none() {
            log::debug!("No profiles defined for platform '{}'.", platform);
        }

        Self {
            platform,
            origin,
            profiles,
        }
    }

    /// The platform this view is scoped to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Configure profiles, in declared order.
    pub fn configure(&self) -> &'a [ConfigureProfile] {
        self.profiles.map(|p| p.configure.as_slice()).unwrap_or_default()
    }

    /// Build profiles, in declared order.
    pub fn build(&self) -> &'a [BuildProfile] {
        self.profiles.map(|p| p.build.as_slice()).unwrap_or_default()
    }

    /// Test profiles, in declared order.
    pub fn test(&self) -> &'a [TestProfile] {
        self.profiles.map(|p| p.test.as_slice()).unwrap_or_default()
    }

    /// Resolves `name` within `collection`.
    ///
    /// # Errors
    /// Returns [`ProfileError::DuplicateProfile`] when more than one record carries `name`.
    pub fn lookup<T: NamedProfile>(
        &self,
        kind: ProfileKind,
        collection: &'a [T],
        name: &str,
    ) -> Result<Option<&'a T>, ProfileError> {
        let mut matches = collection.iter().filter(|profile| profile.name() == name);
        let first = matches.next();
        let extra = matches.count();

        if extra > 0 {
            return Err(ProfileError::DuplicateProfile {
                settings: self.origin.display().to_string(),
                platform: self.platform,
                kind,
                name: name.to_string(),
                count: extra + 1,
            });
        }

        if first.is_none() {
            log::debug!(
                "No {} profile named '{}' for platform '{}'.",
                kind,
                name,
                self.platform
            );
        }
        Ok(first)
    }

    /// Looks up the requested names of the `kinds` collections at once. Any duplicate aborts
    /// the whole selection; collections not listed are left unselected.
    pub fn select(
        &self,
        names: &ProfileNames,
        kinds: &[ProfileKind],
    ) -> Result<ProfileSelection<'a>, ProfileError> {
        let mut selection = ProfileSelection::default();
        for kind in kinds {
            match kind {
                ProfileKind::Configure => {
                    selection.configure = self.lookup(*kind, self.configure(), &names.configure)?;
                }
                ProfileKind::Build => {
                    selection.build = self.lookup(*kind, self.build(), &names.build)?;
                }
                ProfileKind::Test => {
                    selection.test = self.lookup(*kind, self.test(), &names.test)?;
                }
            }
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CmakeSettings;
    use std::collections::BTreeMap;

    fn configure(name: &str, arch: &str) -> ConfigureProfile {
        ConfigureProfile {
            name: name.to_string(),
            flags: vec![],
            definitions: vec![],
            toolset: vec![],
            generator: Default::default(),
            arch: Some(arch.to_string()),
            path: None,
        }
    }

    fn settings_with(configure_profiles: Vec<ConfigureProfile>) -> Settings {
        Settings {
            global: BTreeMap::new(),
            tools: Default::default(),
            cmake: CmakeSettings {
                linux: Some(PlatformProfiles {
                    configure: configure_profiles,
                    build: vec![],
                    test: vec![],
                }),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_lookup_single_match() {
        let settings = settings_with(vec![configure("default", "x64"), configure("arm", "arm64")]);
        let store = ProfileStore::new(&settings, Platform::Linux, Path::new("settings.json"));

        let found = store
            .lookup(ProfileKind::Configure, store.configure(), "arm")
            .unwrap()
            .unwrap();
        assert_eq!(found.arch.as_deref(), Some("arm64"));
    }

    #[test]
    fn test_lookup_zero_matches_is_not_an_error() {
        let settings = settings_with(vec![configure("default", "x64")]);
        let store = ProfileStore::new(&settings, Platform::Linux, Path::new("settings.json"));

        let found = store
            .lookup(ProfileKind::Configure, store.configure(), "missing")
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_lookup_duplicate_names_fails() {
        let settings = settings_with(vec![configure("default", "x64"), configure("default", "x86")]);
        let store = ProfileStore::new(&settings, Platform::Linux, Path::new("settings.json"));

        let err = store
            .lookup(ProfileKind::Configure, store.configure(), "default")
            .unwrap_err();
        let ProfileError::DuplicateProfile { kind, name, count, .. } = &err;
        assert_eq!(*kind, ProfileKind::Configure);
        assert_eq!(name, "default");
        assert_eq!(*count, 2);

        let message = err.to_string();
        assert!(message.contains("settings.json"));
        assert!(message.contains("linux"));
        assert!(message.contains("configure"));
    }

    #[test]
    fn test_unknown_platform_has_empty_collections() {
        let settings = settings_with(vec![configure("default", "x64")]);
        let store = ProfileStore::new(&settings, Platform::Unknown, Path::new("settings.json"));

        assert!(store.configure().is_empty());
        assert!(store.build().is_empty());
        assert!(store.test().is_empty());
        let selection = store
            .select(&ProfileNames::default(), &ProfileKind::ALL)
            .unwrap();
        assert!(selection.configure.is_none());
    }

    #[test]
    fn test_platform_missing_from_file_has_empty_collections() {
        let settings = settings_with(vec![configure("default", "x64")]);
        let store = ProfileStore::new(&settings, Platform::Win32, Path::new("settings.json"));
        assert!(store.configure().is_empty());
    }

    #[test]
    fn test_select_surfaces_duplicates() {
        let settings = settings_with(vec![configure("default", "x64"), configure("default", "x86")]);
        let store = ProfileStore::new(&settings, Platform::Linux, Path::new("settings.json"));
        assert!(
            store
                .select(&ProfileNames::default(), &ProfileKind::ALL)
                .is_err()
        );
    }

    #[test]
    fn test_select_ignores_collections_not_asked_for() {
        let settings = settings_with(vec![configure("default", "x64"), configure("default", "x86")]);
        let store = ProfileStore::new(&settings, Platform::Linux, Path::new("settings.json"));

        let selection = store
            .select(&ProfileNames::default(), &[ProfileKind::Build, ProfileKind::Test])
            .unwrap();
        assert!(selection.configure.is_none());
        assert!(selection.build.is_none());
    }
}
