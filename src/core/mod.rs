// src/core/mod.rs

pub mod clean_guard;
pub mod composer;
pub mod config_loader;
/// Per-run resolved state.
pub mod context;
/// Path macro expansion.
pub mod interpolator;
/// Host platform detection.
pub mod platform;
pub mod profile_store;
