// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/scratch.rs
// Version: 1.0.3
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the resource lifecycle of workload scratch state. A
// guard acquires and seeds the scratch before the timed loop, lends it to
// workload calls, and releases it exactly once when dropped, whichever way the
// loop ended.
//
// Tree Location:
// - src/harness/scratch.rs (Workload trait, ScratchGuard, ResourceLedger)
// - Depends on: harness/registry, harness/metrics, log

use crate::Result;
use crate::core::error::StressError;
use crate::harness::metrics::Metric;
use crate::harness::registry::{MethodEntry, MethodTable};
use log::debug;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const LOG_TARGET: &str = "numstress::scratch";

/// Scratch state of one workload family, together with the family's method
/// table.
pub trait Workload: Sized + 'static {
    /// Name the scratch is registered under in diagnostics
    const LABEL: &'static str;

    /// Metric label prefix, e.g. "Mdfp-ops per sec"
    const RATE_UNIT: &'static str;

    /// Divisor applied to raw rates before reporting
    const RATE_SCALE: f64 = 1.0;

    fn methods() -> &'static MethodTable<Self>;

    /// Allocates zeroed scratch and seeds it deterministically from
    /// `params.seed`.
    fn acquire(params: &ScratchParams) -> Result<Self>;

    /// Work units one call of `entry` performs
    fn ops_per_call(&self, entry: &MethodEntry<Self>) -> f64;

    /// Bitwise comparison of the primary and replica results left by the
    /// last two calls of the entry at `index`.
    fn verify(&self, index: usize, entry: &MethodEntry<Self>) -> Result<()>;

    /// Family specific metrics besides the per-method rates
    fn extra_metrics(&self) -> Vec<Metric> {
        Vec::new()
    }

    /// Final teardown. `unwound` is set when the timed loop was left through
    /// a forced unwind; implementations must not finalize working values that
    /// may have been mid-update at that point.
    fn release(self, unwound: bool) {
        let _ = unwound;
    }

    /// Approximate footprint, for diagnostics only
    fn footprint(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

/// Inputs for scratch acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchParams {
    pub seed: u64,
    /// Jobs per call for queue based families
    pub jobs: usize,
    /// Restrict queue based families to one backend
    pub backend: Option<usize>,
}

impl ScratchParams {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            jobs: 128,
            backend: None,
        }
    }
}

/// Acquisition and release counters for one instance
#[derive(Debug, Default)]
pub struct ResourceLedger {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl ResourceLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::Acquire)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::Acquire)
    }

    pub fn is_balanced(&self) -> bool {
        self.acquired() == self.released()
    }
}

/// Owns a family's scratch between acquisition and release.
pub struct ScratchGuard<W: Workload> {
    scratch: Option<W>,
    ledger: Arc<ResourceLedger>,
    unwound: bool,
}

impl<W: Workload> ScratchGuard<W> {
    pub fn acquire(ledger: &Arc<ResourceLedger>, params: &ScratchParams) -> Result<Self> {
        let scratch = W::acquire(params)?;
        ledger.acquired.fetch_add(1, Ordering::AcqRel);
        debug!(target: LOG_TARGET,
            "Registered {} scratch ({} bytes, seed {:#018x})",
            W::LABEL,
            scratch.footprint(),
            params.seed
        );
        Ok(Self {
            scratch: Some(scratch),
            ledger: Arc::clone(ledger),
            unwound: false,
        })
    }

    /// Marks the scratch as abandoned by a forced unwind.
    pub fn mark_unwound(&mut self) {
        self.unwound = true;
    }
}

impl<W: Workload> Deref for ScratchGuard<W> {
    type Target = W;

    fn deref(&self) -> &W {
        // Only None after drop has run
        self.scratch.as_ref().expect("scratch accessed after release")
    }
}

impl<W: Workload> DerefMut for ScratchGuard<W> {
    fn deref_mut(&mut self) -> &mut W {
        self.scratch.as_mut().expect("scratch accessed after release")
    }
}

impl<W: Workload> Drop for ScratchGuard<W> {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            scratch.release(self.unwound);
            self.ledger.released.fetch_add(1, Ordering::AcqRel);
            debug!(target: LOG_TARGET,
                "Released {} scratch{}",
                W::LABEL,
                if self.unwound { " after forced unwind" } else { "" }
            );
        }
    }
}

/// Fallible zeroed allocation of `count` elements, mapped to a resource error.
pub fn alloc_zeroed<T: Default + Clone>(label: &'static str, count: usize) -> Result<Vec<T>> {
    let mut buf: Vec<T> = Vec::new();
    buf.try_reserve_exact(count).map_err(|e| StressError::Resource {
        label,
        reason: e.to_string(),
    })?;
    buf.resize(count, T::default());
    Ok(buf)
}

// Changelog:
// - v1.0.3 (2026-10-19): Removed the unused unwind accessor.
// - v1.0.2 (2026-10-19): Release receives the forced unwind flag.
// - v1.0.1 (2026-10-19): Added ResourceLedger for acquire/release accounting.
// - v1.0.0 (2026-10-19): Initial scratch lifecycle.
//   - Purpose: Guarantees scratch is released exactly once on every exit path.
