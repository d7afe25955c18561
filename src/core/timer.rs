// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/timer.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides the timestamp primitive every duration measurement in the
// harness is built from. Readings are seconds since a process-wide monotonic
// anchor.
//
// Tree Location:
// - src/core/timer.rs (monotonic timestamps)
// - Depends on: std

use std::sync::OnceLock;
use std::time::Instant;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed since the first call in this process. Never decreases;
/// `Instant` already saturates on platforms whose clock steps backwards.
#[inline]
pub fn time_now() -> f64 {
    ANCHOR.get_or_init(Instant::now).elapsed().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_now_is_monotonic() {
        let mut prev = time_now();
        for _ in 0..10_000 {
            let now = time_now();
            assert!(now >= prev, "time_now went backwards: {} < {}", now, prev);
            prev = now;
        }
    }

}

// Changelog:
// - v1.0.1 (2026-10-19): Dropped the unused wall clock fallback.
//   - Changes: time_now is the only timestamp source.
// - v1.0.0 (2026-10-19): Initial timer utility.
//   - Purpose: Single timestamp source for workload timing.
//   - Features: Monotonic anchor based time_now and a clamped wall clock
//     fallback with the same never-decreasing contract.
