// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/supervisor.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the run supervisor. It watches the wall clock budget
// and operator interrupts on the async runtime and raises every instance's
// cancellation token. A raise after the unwind grace period, or a second
// Ctrl-C, escalates the instances still running to a forced unwind.
//
// Tree Location:
// - src/supervisor.rs (Supervisor)
// - Depends on: core/cancel, tokio

use crate::core::{CancelState, CancelToken};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};

const LOG_TARGET: &str = "numstress::supervisor";

/// What the supervisor did before the run finished
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorOutcome {
    pub timed_out: bool,
    pub interrupts: usize,
    pub escalated: bool,
}

pub struct Supervisor {
    tokens: Vec<Arc<CancelToken>>,
    timeout: Option<Duration>,
    unwind_grace: Duration,
}

impl Supervisor {
    pub fn new(tokens: Vec<Arc<CancelToken>>, timeout: Option<Duration>, unwind_grace: Duration) -> Self {
        Self {
            tokens,
            timeout,
            unwind_grace,
        }
    }

    /// Raises every token once. Returns true if any instance escalated to a
    /// forced unwind.
    pub fn raise_all(&self) -> bool {
        self.tokens
            .iter()
            .map(|token| token.raise())
            .fold(false, |escalated, state| escalated | (state == CancelState::ForceUnwind))
    }

    /// Supervises until `finished` resolves.
    pub async fn run(self, mut finished: oneshot::Receiver<()>) -> SupervisorOutcome {
        let mut outcome = SupervisorOutcome::default();
        let mut deadline = self.timeout.map(|t| Instant::now() + t);
        let mut escalation: Option<Instant> = None;
        let mut listen_signal = true;

        loop {
            let next = escalation.or(deadline);
            tokio::select! {
                _ = &mut finished => return outcome,
                _ = sleep_until_opt(next) => {
                    if escalation.take().is_some() {
                        warn!(target: LOG_TARGET, "⚠️ Instances still running {:?} after timeout, forcing unwind", self.unwind_grace);
                    } else {
                        deadline = None;
                        outcome.timed_out = true;
                        info!(target: LOG_TARGET, "⏱️ Time budget expired, stopping instances");
                        escalation = Some(Instant::now() + self.unwind_grace);
                    }
                    outcome.escalated |= self.raise_all();
                }
                result = tokio::signal::ctrl_c(), if listen_signal => {
                    match result {
                        Ok(()) => {
                            outcome.interrupts += 1;
                            info!(target: LOG_TARGET, "🛑 Interrupt received, stopping instances");
                            outcome.escalated |= self.raise_all();
                        }
                        Err(e) => {
                            warn!(target: LOG_TARGET, "Unable to listen for Ctrl-C: {}", e);
                            listen_signal = false;
                        }
                    }
                }
            }
        }
    }
}

async fn sleep_until_opt(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_all_reports_escalation() {
        let tokens = vec![Arc::new(CancelToken::new()), Arc::new(CancelToken::new())];
        let supervisor = Supervisor::new(tokens.clone(), None, Duration::ZERO);
        assert!(!supervisor.raise_all());
        assert!(tokens.iter().all(|t| t.state() == CancelState::StopRequested));
        assert!(supervisor.raise_all());
        assert!(tokens.iter().all(|t| t.state() == CancelState::ForceUnwind));
    }
}

// Changelog:
// - v1.0.1 (2026-10-19): Unwind grace alarm escalates after the timeout.
// - v1.0.0 (2026-10-19): Initial supervisor on the tokio runtime.
