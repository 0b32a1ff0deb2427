//! # System Interaction Layer
//!
//! The boundary between the stage logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns `cmake` and `ctest` with inherited stdio and reports their exit
//!   codes. A dry-run runner prints instead of spawning.

/// Blocking and dry-run process runners.
pub mod executor;
