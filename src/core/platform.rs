// src/core/platform.rs

use std::fmt;

/// Host platform identifier used to pick a profile scope from the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS, settings key `macosx`.
    MacOsx,
    /// Windows, settings key `win32`.
    Win32,
    /// Linux, settings key `linux`.
    Linux,
    /// Any other host; no profiles apply.
    Unknown,
}

impl Platform {
    /// Detects the platform of the running host.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Self::MacOsx,
            "windows" => Self::Win32,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    /// The key used for this platform under the `cmake` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOsx => "macosx",
            Self::Win32 => "win32",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
