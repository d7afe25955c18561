// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/metrics.rs
// Version: 1.0.3
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the metrics aggregator. Per-method running totals of
// operations and seconds become rates, and repeated measurements of the same
// metric are merged with a harmonic mean so short, truncated runs with
// inflated instantaneous rates do not dominate the result.
//
// Tree Location:
// - src/harness/metrics.rs (MethodStats, Metric, aggregation)
// - Depends on: serde

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for one method
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodStats {
    pub ops: f64,
    pub duration: f64,
}

impl MethodStats {
    pub fn record(&mut self, ops: f64, duration: f64) {
        self.ops += ops;
        self.duration += duration;
    }

    /// `ops / duration`, or `None` if the method never ran for a measurable
    /// time.
    pub fn finalize(&self) -> Option<f64> {
        (self.duration > 0.0 && self.ops > 0.0).then(|| self.ops / self.duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    HarmonicMean,
}

/// One reported rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub rate: f64,
    /// Seconds the rate was measured over
    pub duration: f64,
    pub kind: AggregationKind,
}

impl Metric {
    pub fn harmonic(label: impl Into<String>, rate: f64, duration: f64) -> Self {
        Self {
            label: label.into(),
            rate,
            duration,
            kind: AggregationKind::HarmonicMean,
        }
    }
}

/// A metric merged across instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetric {
    pub label: String,
    pub rate: f64,
    pub samples: usize,
    pub kind: AggregationKind,
}

/// Plain harmonic mean. Non-positive rates carry no information and are
/// skipped.
pub fn harmonic_mean(rates: &[f64]) -> Option<f64> {
    let (count, inverse_sum) = rates
        .iter()
        .filter(|r| **r > 0.0 && r.is_finite())
        .fold((0usize, 0.0f64), |(n, sum), r| (n + 1, sum + 1.0 / r));
    (count > 0).then(|| count as f64 / inverse_sum)
}

/// Harmonic mean of `(rate, duration)` samples weighted by duration:
/// `Σd / Σ(d / r)`.
pub fn weighted_harmonic_mean(samples: &[(f64, f64)]) -> Option<f64> {
    let (weight, inverse_sum) = samples
        .iter()
        .filter(|(r, d)| *r > 0.0 && *d > 0.0 && r.is_finite())
        .fold((0.0f64, 0.0f64), |(w, sum), (r, d)| (w + d, sum + d / r));
    (weight > 0.0).then(|| weight / inverse_sum)
}

/// Merges per-instance metric sets by label, keeping first-seen label order.
/// Samples are weighted by the duration they were measured over; a label
/// whose samples carry no duration falls back to the plain harmonic mean.
pub fn aggregate<'a, I>(instances: I) -> Vec<AggregatedMetric>
where
    I: IntoIterator<Item = &'a [Metric]>,
{
    let mut order: Vec<String> = Vec::new();
    let mut samples: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();

    for metrics in instances {
        for metric in metrics {
            let entry = samples.entry(metric.label.clone()).or_insert_with(|| {
                order.push(metric.label.clone());
                Vec::new()
            });
            entry.push((metric.rate, metric.duration));
        }
    }

    order
        .into_iter()
        .filter_map(|label| {
            let merged = samples.get(&label)?;
            let rate = weighted_harmonic_mean(merged).or_else(|| {
                let rates: Vec<f64> = merged.iter().map(|(r, _)| *r).collect();
                harmonic_mean(&rates)
            })?;
            Some(AggregatedMetric {
                samples: merged.len(),
                label,
                rate,
                kind: AggregationKind::HarmonicMean,
            })
        })
        .collect()
}


// Changelog:
// - v1.0.3 (2026-10-19): Cross-instance merge weighted by measured duration.
// - v1.0.2 (2026-10-19): Added duration weighted harmonic mean.
// - v1.0.1 (2026-10-19): Cross-instance aggregation keeps label order.
// - v1.0.0 (2026-10-19): Replaces miner hashrate stats.
//   - Purpose: Rates from running totals; harmonic mean aggregation.
