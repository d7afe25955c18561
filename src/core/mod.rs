// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core functionality of the
// harness, located in the core subdirectory. It declares submodules and
// re-exports key types for use throughout the project.

pub mod cancel;
pub mod context;
pub mod error;
pub mod timer;
pub mod types;

// Re-export the most commonly used items
pub use cancel::{CancelState, CancelToken, ForcedUnwind};
pub use context::StressContext;
pub use error::StressError;
pub use timer::time_now;
pub use types::{Args, Category, Family, Variant};

// Changelog:
// - v1.0.0 (2026-10-19): Core module for the compute harness.
//   - Declares timer, cancel, context, error and types submodules.
