// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the library entry point for numstress. It exports the harness
// core, the workload families and the supervisor that the binary and the
// integration tests build on.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, harness, workloads, supervisor, help, utils

pub mod core;
pub mod harness;
pub mod help;
pub mod supervisor;
pub mod utils;
pub mod workloads;

// Re-export commonly used types at the crate root for convenience
pub use crate::core::{Args, CancelToken, Family, StressContext, StressError, Variant};
pub use crate::harness::runner::{RunReport, StressConfig, StressRunner};
pub use crate::supervisor::Supervisor;

pub type Result<T> = std::result::Result<T, StressError>;

// Changelog:
// - v2.0.0 (2026-10-19): Reworked into the numstress harness library.
//   - Mining, pool and benchmark modules replaced by harness, workloads and
//     supervisor.
//   - Result now carries the typed StressError.
// - v1.0.2 (2025-06-15): Added help module support.
// - v1.0.0 (2025-06-14): Initial modular breakout from monolithic main.rs.
