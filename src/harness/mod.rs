// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module root for the harness: method registry, execution
// and verification engine, metrics, scratch lifecycle and the runner that
// drives instances.
//
// Tree Location:
// - src/harness/mod.rs (harness exports)
// - Submodules: engine, metrics, registry, runner, scratch

pub mod engine;
pub mod metrics;
pub mod registry;
pub mod runner;
pub mod scratch;

pub use engine::{Engine, Outcome};
pub use metrics::{AggregatedMetric, AggregationKind, MethodStats, Metric, aggregate, harmonic_mean, weighted_harmonic_mean};
pub use registry::{Dispatch, MethodEntry, MethodTable, WorkloadFn};
pub use runner::{InstanceFailure, InstanceReport, RunReport, RunStatus, StressConfig, StressRunner, run_family, run_instance};
pub use scratch::{ResourceLedger, ScratchGuard, ScratchParams, Workload};

// Changelog:
// - v1.0.0 (2026-10-19): Initial harness exports.
