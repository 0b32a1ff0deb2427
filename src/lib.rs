//! # stagehand
//!
//! Drives the CMake configure, build, test and clean stages of a project from named
//! profiles stored in a per-project settings file.
//!
//! - [`core`] loads the settings, resolves path macros, looks profiles up and composes
//!   the tool invocations. It also owns the guard that decides what `clean` may delete.
//! - [`system`] spawns the external tools.
//! - [`cli`] parses the command line and dispatches the stages in their fixed order.

/// Command-line surface and stage dispatch.
pub mod cli;
/// Default names and tokens.
pub mod constants;
/// Settings, profiles, composition and the clean guard.
pub mod core;
/// Typed settings and invocation models.
pub mod models;
pub mod system;
