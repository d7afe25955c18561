// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/engine.rs
// Version: 1.0.5
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the execution and verification engine. Each call runs
// a method once on the primary path, optionally again on the replica path,
// and compares both results bitwise. Per-method operation and time totals are
// accumulated here and nowhere else.
//
// Tree Location:
// - src/harness/engine.rs (Engine, Outcome)
// - Depends on: harness/registry, harness/scratch, harness/metrics

use crate::Result;
use crate::core::error::StressError;
use crate::core::{StressContext, Variant};
use crate::harness::metrics::{MethodStats, Metric};
use crate::harness::registry::{Dispatch, WorkloadFn};
use crate::harness::scratch::Workload;
use log::{debug, error};
use std::marker::PhantomData;

const LOG_TARGET: &str = "numstress::engine";

/// Result of one `run_once` that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The instance was told to stop while the call was in flight
    Cancelled,
}

pub struct Engine<W: Workload> {
    stats: Vec<MethodStats>,
    verify: bool,
    _family: PhantomData<fn() -> W>,
}

impl<W: Workload> Engine<W> {
    pub fn new(verify: bool) -> Self {
        Self {
            stats: vec![MethodStats::default(); W::methods().len()],
            verify,
            _family: PhantomData,
        }
    }

    pub fn stats(&self) -> &[MethodStats] {
        &self.stats
    }

    /// Runs the method at `index` once; the fan-out entry runs every concrete
    /// method once.
    pub fn run_once(&mut self, ctx: &mut StressContext, scratch: &mut W, index: usize) -> Result<Outcome> {
        let table = W::methods();
        let entry = table.get(index).ok_or_else(|| StressError::Configuration {
            family: table.family(),
            name: format!("#{}", index),
            valid: table.names(),
        })?;

        match entry.dispatch {
            Dispatch::FanOut => self.fan_out(ctx, scratch),
            Dispatch::Concrete(run) => self.call_method(ctx, scratch, index, run),
        }
    }

    fn fan_out(&mut self, ctx: &mut StressContext, scratch: &mut W) -> Result<Outcome> {
        let table = W::methods();
        for (index, entry) in table.entries().iter().enumerate().skip(1) {
            if !ctx.keep_running() {
                return Ok(Outcome::Cancelled);
            }
            let Dispatch::Concrete(run) = entry.dispatch else {
                continue;
            };
            if self.call_method(ctx, scratch, index, run)? == Outcome::Cancelled {
                return Ok(Outcome::Cancelled);
            }
        }
        Ok(Outcome::Completed)
    }

    fn call_method(
        &mut self,
        ctx: &mut StressContext,
        scratch: &mut W,
        index: usize,
        run: WorkloadFn<W>,
    ) -> Result<Outcome> {
        let entry = &W::methods().entries()[index];
        let ops = scratch.ops_per_call(entry);

        let dt = run(ctx, scratch, Variant::Primary)?;
        if dt < 0.0 {
            return Err(StressError::NegativeElapsed { method: entry.name });
        }
        self.stats[index].record(ops, dt);

        if self.verify {
            let dt = run(ctx, scratch, Variant::Replica)?;
            if dt < 0.0 {
                return Err(StressError::NegativeElapsed { method: entry.name });
            }
            self.stats[index].record(ops, dt);

            // An interrupt can legitimately truncate the replica pass, so its
            // result says nothing about correctness
            if !ctx.keep_running() {
                debug!(target: LOG_TARGET,
                    "{}: instance {} stopped during {}, skipping verification",
                    ctx.name, ctx.instance, entry.name
                );
                return Ok(Outcome::Cancelled);
            }

            if let Err(e) = scratch.verify(index, entry) {
                error!(target: LOG_TARGET, "❌ {}: instance {}: {}", ctx.name, ctx.instance, e);
                return Err(e);
            }
        }

        let outcome = if ctx.keep_running() {
            Outcome::Completed
        } else {
            Outcome::Cancelled
        };
        ctx.bogo_inc();
        Ok(outcome)
    }

    /// Per-method rates for every method that ran for a measurable time.
    pub fn report(&self) -> Vec<Metric> {
        W::methods()
            .entries()
            .iter()
            .zip(self.stats.iter())
            .skip(1)
            .filter_map(|(entry, stats)| {
                let rate = stats.finalize()?;
                Some(Metric::harmonic(
                    format!("{}, {}", W::RATE_UNIT, entry.description),
                    rate / W::RATE_SCALE,
                    stats.duration,
                ))
            })
            .collect()
    }
}

// Changelog:
// - v1.0.5 (2026-10-19): Removed the unused verify accessor.
// - v1.0.4 (2026-10-19): Bogo-op counted after verification so an op budget
//   never voids the final comparison.
// - v1.0.3 (2026-10-19): Fan-out stops between methods once cancelled.
// - v1.0.2 (2026-10-19): Negative elapsed time is an immediate failure.
// - v1.0.1 (2026-10-19): Verification skipped when cancelled mid replica.
// - v1.0.0 (2026-10-19): Initial engine, adapted from the benchmark runner's
//   per-thread accounting.
