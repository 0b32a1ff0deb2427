// src/cli/handlers/mod.rs

// One handler per stage. Each returns a `StageResult` and never aborts the run itself.

/// `build` stage.
pub mod build;
/// `clean` stage.
pub mod clean;
/// Shared printing and exit-code mapping.
pub mod commons;
/// `cfg` stage.
pub mod configure;
