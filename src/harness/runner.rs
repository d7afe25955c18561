// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/runner.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the stress runner. It starts one instance per worker
// thread, releases them together through a barrier, drives each instance's
// timed loop inside its recovery boundary, and folds the per-instance metrics
// into one harmonic-mean report.
//
// Tree Location:
// - src/harness/runner.rs (StressRunner, StressConfig, reports)
// - Depends on: harness/engine, harness/scratch, workloads, crossbeam

use crate::Result;
use crate::core::error::StressError;
use crate::core::{CancelToken, Family, StressContext, time_now};
use crate::harness::engine::{Engine, Outcome};
use crate::harness::metrics::{AggregatedMetric, Metric, aggregate};
use crate::harness::scratch::{ResourceLedger, ScratchGuard, ScratchParams, Workload};
use crate::workloads::{DfpScratch, IpsecScratch, PrimeScratch};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{Arc, Barrier};
use std::time::Duration;

const LOG_TARGET: &str = "numstress::runner";

/// Configuration for a stress run
#[derive(Debug, Clone)]
pub struct StressConfig {
    pub family: Family,
    pub method_index: usize,
    pub instances: usize,
    pub timeout: Option<Duration>,
    pub max_ops: u64,
    pub unwind_grace: Duration,
    pub verify: bool,
    pub seed: u64,
    pub ipsec_jobs: usize,
    pub ipsec_backend: Option<usize>,
}

impl StressConfig {
    pub fn new(family: Family, method_index: usize) -> Self {
        Self {
            family,
            method_index,
            instances: 1,
            timeout: None,
            max_ops: 0,
            unwind_grace: Duration::from_secs(2),
            verify: false,
            seed: 0x5eed_cafe_f00d_d00d,
            ipsec_jobs: 128,
            ipsec_backend: None,
        }
    }

    /// Scratch parameters for one instance; every instance gets its own
    /// seed stream.
    pub fn scratch_params(&self, instance: usize) -> ScratchParams {
        ScratchParams {
            seed: self
                .seed
                .wrapping_add((instance as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)),
            jobs: self.ipsec_jobs,
            backend: self.ipsec_backend,
        }
    }

    pub fn method_name(&self) -> &'static str {
        self.family
            .method_names()
            .get(self.method_index)
            .copied()
            .unwrap_or("unknown")
    }
}

/// How an instance's timed loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Op budget used up, or a single pass finished, without interruption
    Completed,
    /// Stopped cooperatively by the supervisor
    Cancelled,
    /// Left through the recovery boundary after a forced unwind
    Unwound,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub instance: usize,
    pub status: RunStatus,
    pub bogo_ops: u64,
    pub elapsed: f64,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceFailure {
    pub instance: usize,
    pub message: String,
    #[serde(skip)]
    pub error: StressError,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub family: Family,
    pub method: &'static str,
    pub instances: Vec<InstanceReport>,
    pub failures: Vec<InstanceFailure>,
    pub metrics: Vec<AggregatedMetric>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_bogo_ops(&self) -> u64 {
        self.instances.iter().map(|r| r.bogo_ops).sum()
    }
}

/// Main stress runner
pub struct StressRunner {
    config: StressConfig,
    tokens: Vec<Arc<CancelToken>>,
}

impl StressRunner {
    pub fn new(config: StressConfig) -> Self {
        let tokens = (0..config.instances.max(1))
            .map(|_| Arc::new(CancelToken::new()))
            .collect();
        Self { config, tokens }
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Cancellation tokens, one per instance, for the supervisor.
    pub fn tokens(&self) -> Vec<Arc<CancelToken>> {
        self.tokens.clone()
    }

    /// Runs every instance to completion and aggregates the results.
    pub fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        info!(target: LOG_TARGET,
            "🧪 Starting {} instance(s) of {} method '{}'{}",
            self.tokens.len(),
            config.family.as_str(),
            config.method_name(),
            if config.verify { " with verification" } else { "" }
        );

        let barrier = Barrier::new(self.tokens.len());
        let results: Vec<Result<InstanceReport>> = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = self
                .tokens
                .iter()
                .enumerate()
                .map(|(instance, token)| {
                    let barrier = &barrier;
                    s.spawn(move |_| {
                        let ledger = ResourceLedger::new();
                        let mut ctx = StressContext::new(
                            config.family.as_str(),
                            instance,
                            Arc::clone(token),
                            config.max_ops,
                        );
                        let result = run_family(config, &mut ctx, &ledger, Some(barrier));
                        if !ledger.is_balanced() {
                            warn!(target: LOG_TARGET,
                                "Instance {}: {} scratch acquisitions but {} releases",
                                instance,
                                ledger.acquired(),
                                ledger.released()
                            );
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(instance, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(StressError::Instance {
                            instance,
                            reason: "worker thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        })
        .map_err(|_| StressError::Instance {
            instance: 0,
            reason: "worker scope panicked".to_string(),
        })?;

        let mut instances = Vec::new();
        let mut failures = Vec::new();
        for (instance, result) in results.into_iter().enumerate() {
            match result {
                Ok(report) => instances.push(report),
                Err(error) => {
                    if error.is_fatal_to_instance() {
                        warn!(target: LOG_TARGET, "Instance {} aborted: {}", instance, error);
                    }
                    failures.push(InstanceFailure {
                        instance,
                        message: error.to_string(),
                        error,
                    });
                }
            }
        }

        let metrics = aggregate(instances.iter().map(|r| r.metrics.as_slice()));
        Ok(RunReport {
            family: config.family,
            method: config.method_name(),
            instances,
            failures,
            metrics,
        })
    }
}

/// Runs one instance of the configured family on the calling thread.
pub fn run_family(
    config: &StressConfig,
    ctx: &mut StressContext,
    ledger: &Arc<ResourceLedger>,
    start: Option<&Barrier>,
) -> Result<InstanceReport> {
    match config.family {
        Family::Dfp => run_instance::<DfpScratch>(config, ctx, ledger, start),
        Family::Prime => run_instance::<PrimeScratch>(config, ctx, ledger, start),
        Family::Ipsec => run_instance::<IpsecScratch>(config, ctx, ledger, start),
    }
}

/// Drives one instance: acquire scratch, wait for the start barrier, loop
/// `run_once` inside the recovery boundary, release scratch.
pub fn run_instance<W: Workload>(
    config: &StressConfig,
    ctx: &mut StressContext,
    ledger: &Arc<ResourceLedger>,
    start: Option<&Barrier>,
) -> Result<InstanceReport> {
    let table = W::methods();
    if table.get(config.method_index).is_none() {
        return Err(StressError::Configuration {
            family: table.family(),
            name: format!("#{}", config.method_index),
            valid: table.names(),
        });
    }

    let params = config.scratch_params(ctx.instance);
    let acquired = ScratchGuard::<W>::acquire(ledger, &params);

    // Every instance must reach the barrier, even one that failed to acquire
    if let Some(barrier) = start {
        barrier.wait();
    }
    let mut guard = acquired?;

    let mut engine = Engine::<W>::new(config.verify);
    let cancel = Arc::clone(ctx.cancel());
    let index = config.method_index;
    let started = time_now();

    let protected = cancel.protect(|| -> Result<()> {
        loop {
            match engine.run_once(ctx, &mut guard, index)? {
                Outcome::Cancelled => return Ok(()),
                Outcome::Completed if !ctx.keep_running() => return Ok(()),
                Outcome::Completed => {}
            }
        }
    });
    let elapsed = time_now() - started;

    let status = match protected {
        Ok(Ok(())) if cancel.raise_count() > 0 => RunStatus::Cancelled,
        Ok(Ok(())) => RunStatus::Completed,
        Ok(Err(e)) => return Err(e),
        Err(_) => {
            guard.mark_unwound();
            RunStatus::Unwound
        }
    };

    let mut metrics = engine.report();
    metrics.extend(guard.extra_metrics());
    drop(guard);

    debug!(target: LOG_TARGET,
        "Instance {}: {:?} after {} bogo ops in {:.2}s",
        ctx.instance,
        status,
        ctx.bogo_ops(),
        elapsed
    );

    Ok(InstanceReport {
        instance: ctx.instance,
        status,
        bogo_ops: ctx.bogo_ops(),
        elapsed,
        metrics,
    })
}

// Changelog:
// - v1.1.0 (2026-10-19): Instances run on scoped threads behind a start
//   barrier; failures are collected per instance instead of aborting the run.
// - v1.0.0 (2026-10-19): Reworked from the benchmark runner.
//   - Purpose: Drives timed, verified workload loops and aggregates rates.
//   - Note: The recovery boundary wraps the whole timed loop; scratch is
//     acquired before it and released after it on every path.
