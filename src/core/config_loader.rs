//! # Config Loader
//!
//! Reads the settings file once at startup and turns it into a typed [`Settings`] value.
//! Malformed documents are rejected here, before any stage runs, so the rest of the run
//! only ever sees validated data.
use crate::{constants::BUILD_PATH_KEY, models::Settings};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Fatal problems with the settings file. Every variant names the file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the settings shape.
    #[error("Failed to parse settings file '{path}': {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// The file is not valid TOML for the settings shape.
    #[error("Failed to parse settings file '{path}': {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// A required `global` path is missing.
    #[error("Settings file '{path}' does not define the required path 'global.{key}'.")]
    MissingGlobalPath { path: String, key: &'static str },
}

/// On-disk formats accepted for the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `serde_json`.
    Json,
    /// `toml`, for files ending in `.toml`.
    Toml,
}

impl SettingsFormat {
    /// Picks the format from the file extension. Anything but `.toml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Expands a leading `~` in a user-supplied settings path.
pub fn expand_settings_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Loads and validates the settings file at `path`.
///
/// # Errors
/// Returns a [`ConfigError`] if the file cannot be read, cannot be parsed in its format,
/// or lacks the global build path.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    log::debug!("Loading settings from '{}'", path.display());

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_settings(&content, SettingsFormat::from_path(path), path)
}

/// Parses settings text. `origin` is only used for error messages.
pub fn parse_settings(
    content: &str,
    format: SettingsFormat,
    origin: &Path,
) -> Result<Settings, ConfigError> {
    let settings: Settings = match format {
        SettingsFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseJson {
                path: origin.display().to_string(),
                source: e,
            })?
        }
        SettingsFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::ParseToml {
            path: origin.display().to_string(),
            source: e,
        })?,
    };

    if !settings.global.contains_key(BUILD_PATH_KEY) {
        return Err(ConfigError::MissingGlobalPath {
            path: origin.display().to_string(),
            key: BUILD_PATH_KEY,
        });
    }

    Ok(settings)
}
