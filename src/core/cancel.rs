// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/cancel.rs
// Version: 1.0.3
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the per-instance cancellation signal. An external
// supervisor raises it on budget expiry or operator interrupt, the op budget
// stops it internally, and a second raise while a stop is pending escalates to
// a forced unwind out of whatever computation is in flight.
//
// Tree Location:
// - src/core/cancel.rs (CancelToken, recovery boundary)
// - Depends on: std, log

use log::{debug, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

const LOG_TARGET: &str = "numstress::cancel";

const RUNNING: u8 = 0;
const STOP_REQUESTED: u8 = 1;
const FORCE_UNWIND: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelState {
    Running,
    StopRequested,
    ForceUnwind,
}

impl CancelState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            RUNNING => CancelState::Running,
            STOP_REQUESTED => CancelState::StopRequested,
            _ => CancelState::ForceUnwind,
        }
    }
}

/// Panic payload carried from a checkpoint to the recovery boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedUnwind;

/// Cancellation signal owned by one instance.
///
/// All transitions are single atomic operations, so the token can be raised
/// from a supervisor task or signal listener while the instance is deep inside
/// a workload body.
#[derive(Debug, Default)]
pub struct CancelToken {
    state: AtomicU8,
    armed: AtomicBool,
    raises: AtomicUsize,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CancelState {
        CancelState::from_raw(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Relaxed) == RUNNING
    }

    /// External interrupt: Running -> StopRequested -> ForceUnwind.
    pub fn raise(&self) -> CancelState {
        self.raises.fetch_add(1, Ordering::Relaxed);
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let next = match current {
                RUNNING => STOP_REQUESTED,
                _ => FORCE_UNWIND,
            };
            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return CancelState::from_raw(next),
                Err(actual) => current = actual,
            }
        }
    }

    /// Internal alarm (op budget reached). Never escalates.
    pub fn request_stop(&self) {
        let _ = self
            .state
            .compare_exchange(RUNNING, STOP_REQUESTED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Number of external raises seen so far.
    pub fn raise_count(&self) -> usize {
        self.raises.load(Ordering::Relaxed)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Safepoint for long computations. Only a forced unwind with an armed
    /// recovery boundary leaves this function abnormally; a plain stop
    /// request is ignored here.
    #[inline]
    pub fn checkpoint(&self) {
        if self.state.load(Ordering::Relaxed) == FORCE_UNWIND && self.armed.load(Ordering::Acquire) {
            panic::resume_unwind(Box::new(ForcedUnwind));
        }
    }

    /// Runs `f` inside the recovery boundary. Returns `Err(ForcedUnwind)` if a
    /// checkpoint unwound out of it. Any other panic passes through untouched.
    pub fn protect<T, F>(&self, f: F) -> Result<T, ForcedUnwind>
    where
        F: FnOnce() -> T,
    {
        let was_armed = self.armed.swap(true, Ordering::AcqRel);
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        self.armed.store(was_armed, Ordering::Release);

        match result {
            Ok(value) => Ok(value),
            Err(payload) => {
                if is_forced_unwind(payload.as_ref()) {
                    warn!(target: LOG_TARGET, "⚠️ Forced unwind reached the recovery point");
                    Err(ForcedUnwind)
                } else {
                    debug!(target: LOG_TARGET, "Foreign panic crossed the recovery boundary, re-raising");
                    panic::resume_unwind(payload)
                }
            }
        }
    }
}

fn is_forced_unwind(payload: &(dyn Any + Send)) -> bool {
    payload.is::<ForcedUnwind>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_escalates() {
        let token = CancelToken::new();
        assert_eq!(token.state(), CancelState::Running);
        assert_eq!(token.raise(), CancelState::StopRequested);
        assert_eq!(token.raise(), CancelState::ForceUnwind);
        assert_eq!(token.raise(), CancelState::ForceUnwind);
        assert_eq!(token.raise_count(), 3);
    }

    #[test]
    fn test_request_stop_does_not_escalate() {
        let token = CancelToken::new();
        token.request_stop();
        token.request_stop();
        assert_eq!(token.state(), CancelState::StopRequested);
        assert_eq!(token.raise(), CancelState::ForceUnwind);
    }

    #[test]
    fn test_checkpoint_without_boundary_is_noop() {
        let token = CancelToken::new();
        token.raise();
        token.raise();
        token.checkpoint();
        assert!(!token.is_armed());
    }

    #[test]
    fn test_protect_catches_forced_unwind() {
        let token = CancelToken::new();
        let mut reached_end = false;
        let result = token.protect(|| {
            token.raise();
            token.checkpoint();
            token.raise();
            token.checkpoint();
            reached_end = true;
        });
        assert_eq!(result, Err(ForcedUnwind));
        assert!(!reached_end, "checkpoint must unwind after the second raise");
        assert!(!token.is_armed(), "boundary must be removed after protect");
    }

    #[test]
    fn test_protect_passes_through_value() {
        let token = CancelToken::new();
        assert_eq!(token.protect(|| 42), Ok(42));
    }

    #[test]
    fn test_foreign_panic_is_not_swallowed() {
        let token = CancelToken::new();
        let outer = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = token.protect(|| -> () { panic!("boom") });
        }));
        assert!(outer.is_err());
    }
}

// Changelog:
// - v1.0.3 (2026-10-19): Foreign panics are re-raised from the boundary.
// - v1.0.2 (2026-10-19): Op budget stop no longer counts as an interrupt.
// - v1.0.1 (2026-10-19): Boundary arming restored after nested protect calls.
// - v1.0.0 (2026-10-19): Initial cancellation signal.
//   - Purpose: Cooperative stop flag plus a forced unwind path for workloads
//     that never poll the flag.
//   - Note: The unwind is delivered at checkpoints rather than from a signal
//     handler, which keeps every transition async-signal-safe.
