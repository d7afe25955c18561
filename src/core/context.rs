// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/context.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the per-instance context handed to every workload call.
// It owns the bogo-op counter and the op budget, and shares the cancellation
// token with the supervisor.
//
// Tree Location:
// - src/core/context.rs (StressContext)
// - Depends on: core/cancel

use super::cancel::CancelToken;
use log::debug;
use std::sync::Arc;

const LOG_TARGET: &str = "numstress::context";

pub struct StressContext {
    pub name: String,
    pub instance: usize,
    cancel: Arc<CancelToken>,
    bogo_ops: u64,
    max_ops: u64,
}

impl StressContext {
    /// `max_ops == 0` means no op budget.
    pub fn new(name: impl Into<String>, instance: usize, cancel: Arc<CancelToken>, max_ops: u64) -> Self {
        Self {
            name: name.into(),
            instance,
            cancel,
            bogo_ops: 0,
            max_ops,
        }
    }

    pub fn cancel(&self) -> &Arc<CancelToken> {
        &self.cancel
    }

    /// Loop condition for cooperative workload bodies.
    #[inline]
    pub fn keep_running(&self) -> bool {
        self.cancel.is_running()
    }

    /// Safepoint for non-cooperative bodies, see [`CancelToken::checkpoint`].
    #[inline]
    pub fn checkpoint(&self) {
        self.cancel.checkpoint();
    }

    pub fn bogo_ops(&self) -> u64 {
        self.bogo_ops
    }

    pub fn max_ops(&self) -> u64 {
        self.max_ops
    }

    /// Count one completed timed call; raises the internal alarm once the op
    /// budget is used up.
    pub fn bogo_inc(&mut self) {
        self.bogo_ops += 1;
        if self.max_ops > 0 && self.bogo_ops >= self.max_ops {
            if self.cancel.is_running() {
                debug!(target: LOG_TARGET, "{}: instance {} reached op budget {}", self.name, self.instance, self.max_ops);
            }
            self.cancel.request_stop();
        }
    }
}

// Changelog:
// - v1.0.1 (2026-10-19): Op budget routed through the cancellation token.
// - v1.0.0 (2026-10-19): Initial per-instance context.
