// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides formatting helpers for run reports: rates with unit
// prefixes, elapsed seconds and large operation counts.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

/// Formatting helpers for run reports
pub struct FormatUtils;

impl FormatUtils {
    /// Rate with a k/M/G prefix on `unit`, e.g. "1.25 Mops/s"
    pub fn format_rate(rate: f64, unit: &str) -> String {
        if rate >= 1_000_000_000.0 {
            format!("{:.2} G{}", rate / 1_000_000_000.0, unit)
        } else if rate >= 1_000_000.0 {
            format!("{:.2} M{}", rate / 1_000_000.0, unit)
        } else if rate >= 1_000.0 {
            format!("{:.2} k{}", rate / 1_000.0, unit)
        } else {
            format!("{:.2} {}", rate, unit)
        }
    }

    /// Elapsed time as seconds, minutes or hours
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs_f64();
        if secs < 60.0 {
            format!("{:.2}s", secs)
        } else if secs < 3600.0 {
            format!("{:.1}m", secs / 60.0)
        } else {
            format!("{:.1}h", secs / 3600.0)
        }
    }

    /// Large counts with K/M/B suffixes
    pub fn format_number(num: u64) -> String {
        if num >= 1_000_000_000 {
            format!("{:.1}B", num as f64 / 1_000_000_000.0)
        } else if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }
}


// Changelog:
// - v1.1.0 (2026-10-19): Hashrate formatting generalised to any rate unit;
//   durations print elapsed time instead of age.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
