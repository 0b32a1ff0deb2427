// src/models.rs

use crate::constants::{
    DEFAULT_CMAKE_EXECUTABLE, DEFAULT_CTEST_EXECUTABLE, DEFAULT_GENERATOR,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- SETTINGS MODELS (What is read from the settings file) ---

/// Represents the deserialized structure of a settings file.
/// Read once at startup and never mutated afterwards.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Path-name to path-template table, e.g. `build_path = "${WORKSPACE}/build/default"`.
    pub global: BTreeMap<String, String>,
    /// Executable overrides for the external toolchain.
    #[serde(default)]
    pub tools: ToolPaths,
    /// Per-platform profile collections.
    pub cmake: CmakeSettings,
}

/// Executables used for each stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolPaths {
    /// Configure tool, also used in "build an existing tree" mode.
    pub cmake: String,
    /// Test runner.
    pub ctest: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            cmake: DEFAULT_CMAKE_EXECUTABLE.to_string(),
            ctest: DEFAULT_CTEST_EXECUTABLE.to_string(),
        }
    }
}

/// The `cmake` table. Only the known platform identifiers are accepted.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CmakeSettings {
    /// Profiles used on macOS hosts.
    #[serde(default)]
    pub macosx: Option<PlatformProfiles>,
    /// Profiles used on Windows hosts.
    #[serde(default)]
    pub win32: Option<PlatformProfiles>,
    /// Profiles used on Linux hosts.
    #[serde(default)]
    pub linux: Option<PlatformProfiles>,
}

/// The ordered profile collections of one platform.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformProfiles {
    /// Configure profiles, in declared order.
    #[serde(default)]
    pub configure: Vec<ConfigureProfile>,
    /// Build profiles, in declared order.
    #[serde(default)]
    pub build: Vec<BuildProfile>,
    /// Test profiles, in declared order.
    #[serde(default)]
    pub test: Vec<TestProfile>,
}

// --- PROFILE MODELS ---

/// A cache definition passed to the configure tool as `-D<name>:<type>=<value>`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Cache variable name.
    pub name: String,
    /// Cache type (`STRING`, `BOOL`, `PATH`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Cache value.
    pub value: String,
}

/// A toolset entry passed to the configure tool as `-T <name>=<value>`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolsetEntry {
    /// Toolset key, e.g. `host`.
    pub name: String,
    /// Toolset value, e.g. `x64`.
    pub value: String,
}

/// The generator requested by a configure profile.
///
/// The literal string `"default"` leaves the choice to the configure tool.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Generator {
    /// No `-G` argument is passed.
    #[default]
    Default,
    /// Passed verbatim through `-G`.
    Named(String),
}

impl From<String> for Generator {
    fn from(value: String) -> Self {
        if value == DEFAULT_GENERATOR {
            Self::Default
        } else {
            Self::Named(value)
        }
    }
}

impl From<Generator> for String {
    fn from(value: Generator) -> Self {
        match value {
            Generator::Default => DEFAULT_GENERATOR.to_string(),
            Generator::Named(name) => name,
        }
    }
}

/// Parameters of the configure stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigureProfile {
    /// Name selected through `--cfg`.
    pub name: String,
    /// Opaque flags, appended verbatim.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Cache definitions, in declared order.
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Toolset entries, in declared order.
    #[serde(default)]
    pub toolset: Vec<ToolsetEntry>,
    /// Generator passed through `-G`, unless `default`.
    #[serde(default)]
    pub generator: Generator,
    /// Platform passed through `-A`.
    #[serde(default)]
    pub arch: Option<String>,
    /// Build directory template overriding the global build path.
    #[serde(default)]
    pub path: Option<String>,
}

/// A `<name> <value>` pair appended to the build command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildFlag {
    /// First token of the pair.
    pub name: String,
    /// Second token of the pair.
    pub value: String,
}

/// Parameters of the build stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildProfile {
    /// Name selected through `--build`.
    pub name: String,
    /// Build configuration type (`Debug`, `Release`, ...).
    pub config: String,
    /// Target passed through `--target`.
    #[serde(default)]
    pub target: Option<String>,
    /// Pairs appended after `--config`/`--target`.
    #[serde(default)]
    pub flags: Vec<BuildFlag>,
    /// Build directory template overriding the global build path.
    #[serde(default)]
    pub path: Option<String>,
}

/// A test-runner flag. A flag without a value renders as a single token.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TestFlag {
    /// Flag token.
    pub name: String,
    /// Optional value token following the flag.
    #[serde(default)]
    pub value: Option<String>,
}

/// Parameters of the test stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TestProfile {
    /// Name selected through `--test`.
    pub name: String,
    /// Test configuration passed through `-C`.
    pub config: String,
    /// Dashboard action passed through `-T` (e.g. `Test`, `MemCheck`).
    pub action: String,
    /// Flags appended before `--test-dir`.
    #[serde(default)]
    pub flags: Vec<TestFlag>,
    /// Test directory template. Used only when it lies inside the build root.
    #[serde(default)]
    pub path: Option<String>,
}

// --- IN-MEMORY MODELS ---

/// A structured external command: the executable plus its ordered arguments.
///
/// Invocations are handed to the process layer as-is and are never re-parsed by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    /// Argument tokens, in order.
    pub args: Vec<String>,
}

impl Invocation {
    /// Starts an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument token.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Renders the invocation as a copy-pasteable shell line, for display only.
    pub fn display_line(&self) -> String {
        let tokens = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(tokens).unwrap_or_else(|_| {
            // Tokens with NUL bytes cannot be quoted; show them raw.
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// One of the four independent actions a run may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Stage {
    /// Remove the build tree.
    Clean,
    /// Generate the build tree.
    #[value(name = "cfg")]
    Configure,
    /// Build the configured tree.
    Build,
    /// Run the test suite.
    Test,
}

impl Stage {
    /// Execution order of the stages within a run.
    pub const ORDER: [Self; 4] = [Self::Clean, Self::Configure, Self::Build, Self::Test];

    /// The action name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Configure => "cfg",
            Self::Build => "build",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
