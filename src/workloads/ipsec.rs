// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/ipsec.rs
// Version: 1.0.2
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the crypto job family. Each call submits a batch of
// cipher, MAC or digest jobs over the same random input to every enabled
// multi-buffer backend and waits for all of them to complete. The replica
// path computes the same jobs one by one without a queue.
//
// Tree Location:
// - src/workloads/ipsec.rs (IpsecScratch, backends)
// - Depends on: workloads/queue, harness, rand, hex

use crate::Result;
use crate::core::error::StressError;
use crate::core::{Category, StressContext, Variant, time_now};
use crate::harness::metrics::{MethodStats, Metric};
use crate::harness::registry::{MethodEntry, MethodTable};
use crate::harness::scratch::{ScratchParams, Workload, alloc_zeroed};
use crate::workloads::queue::{Job, JobKind, JobQueue, JobStatus, KeyMaterial, compute_direct};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::LazyLock;

const LOG_TARGET: &str = "numstress::ipsec";

/// Bytes of random input every job processes
pub const DATA_LEN: usize = 8192;

/// Multi-buffer backends and their lane widths
pub const BACKENDS: [(&str, usize); 4] = [("serial", 1), ("mb4", 4), ("mb8", 8), ("mb16", 16)];

/// Index into `BACKENDS` for a backend name.
pub fn resolve_backend(name: &str) -> Result<usize> {
    BACKENDS
        .iter()
        .position(|(backend, _)| *backend == name)
        .ok_or_else(|| StressError::Configuration {
            family: "ipsec-backend",
            name: name.to_string(),
            valid: BACKENDS.iter().map(|(backend, _)| *backend).collect(),
        })
}

pub struct IpsecScratch {
    data: Vec<u8>,
    keys: KeyMaterial,
    jobs: usize,
    /// Enabled backends, as indices into `BACKENDS`
    backends: Vec<usize>,
    queues: Vec<JobQueue>,
    /// Job outputs of the last call, indexed by `Variant::index`
    results: [Vec<Vec<u8>>; 2],
    backend_stats: Vec<MethodStats>,
}

impl IpsecScratch {
    pub fn backends(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| BACKENDS[*b].0).collect()
    }

    pub fn results(&self, variant: Variant) -> &[Vec<u8>] {
        &self.results[variant.index()]
    }
}

/// Every submitted job must come back completed.
fn check_completed(method: &'static str, submitted: usize, jobs: &[Job]) -> Result<()> {
    let completed = jobs.iter().filter(|job| job.status == JobStatus::Completed).count();
    if completed != submitted {
        return Err(StressError::IncompleteJobs {
            method,
            completed,
            submitted,
        });
    }
    Ok(())
}

fn run_jobs(
    ctx: &mut StressContext,
    scratch: &mut IpsecScratch,
    variant: Variant,
    kind: JobKind,
    method: &'static str,
) -> Result<f64> {
    let idx = variant.index();
    let mut outputs = std::mem::take(&mut scratch.results[idx]);
    outputs.clear();

    let t = time_now();
    for (slot, queue) in scratch.queues.iter_mut().enumerate() {
        let started = time_now();
        let mut done = 0usize;
        match variant {
            Variant::Primary => {
                queue.reset();
                for id in 0..scratch.jobs {
                    if !ctx.keep_running() {
                        break;
                    }
                    queue.submit(Job::new(id, kind), &scratch.keys, &scratch.data)?;
                }
                queue.flush(&scratch.data);

                let submitted = queue.completion_status().submitted;
                let mut jobs = queue.drain();
                check_completed(method, submitted, &jobs)?;
                jobs.sort_by_key(|job| job.id);
                done = jobs.len();
                outputs.extend(jobs.into_iter().map(|job| job.output));
            }
            Variant::Replica => {
                for id in 0..scratch.jobs {
                    if !ctx.keep_running() {
                        break;
                    }
                    outputs.push(compute_direct(kind, id, &scratch.keys, &scratch.data)?);
                }
            }
        }
        if variant == Variant::Primary {
            scratch.backend_stats[slot].record(done as f64, time_now() - started);
        }
    }
    let dt = time_now() - t;

    scratch.results[idx] = outputs;
    Ok(dt)
}

macro_rules! job_method {
    ($name:ident, $kind:expr, $label:literal) => {
        fn $name(ctx: &mut StressContext, scratch: &mut IpsecScratch, variant: Variant) -> Result<f64> {
            run_jobs(ctx, scratch, variant, $kind, $label)
        }
    };
}

job_method!(cmac, JobKind::Cmac, "cmac");
job_method!(ctr, JobKind::Ctr, "ctr");
job_method!(cbc, JobKind::Cbc, "cbc");
job_method!(des, JobKind::Des, "des");
job_method!(hmac_md5, JobKind::HmacMd5, "hmac-md5");
job_method!(hmac_sha1, JobKind::HmacSha1, "hmac-sha1");
job_method!(hmac_sha512, JobKind::HmacSha512, "hmac-sha512");
job_method!(sha, JobKind::Sha512, "sha");
job_method!(sha3, JobKind::Sha3, "sha3");

static METHODS: LazyLock<MethodTable<IpsecScratch>> = LazyLock::new(|| {
    MethodTable::new(
        "ipsec",
        "all crypto job methods",
        vec![
            MethodEntry::new("cmac", "AES-128 CMAC", Category::Mac, cmac),
            MethodEntry::new("ctr", "AES-256 CTR", Category::Cipher, ctr),
            MethodEntry::new("cbc", "AES-256 CBC", Category::Cipher, cbc),
            MethodEntry::new("des", "DES CBC", Category::Cipher, des),
            MethodEntry::new("hmac-md5", "HMAC MD5", Category::Mac, hmac_md5),
            MethodEntry::new("hmac-sha1", "HMAC SHA1", Category::Mac, hmac_sha1),
            MethodEntry::new("hmac-sha512", "HMAC SHA512", Category::Mac, hmac_sha512),
            MethodEntry::new("sha", "SHA512", Category::Digest, sha),
            MethodEntry::new("sha3", "SHA3-256", Category::Digest, sha3),
        ],
    )
});

pub fn methods() -> &'static MethodTable<IpsecScratch> {
    &METHODS
}

impl Workload for IpsecScratch {
    const LABEL: &'static str = "ipsec";
    const RATE_UNIT: &'static str = "jobs per sec";

    fn methods() -> &'static MethodTable<Self> {
        methods()
    }

    fn acquire(params: &ScratchParams) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut data: Vec<u8> = alloc_zeroed(Self::LABEL, DATA_LEN)?;
        rng.fill(&mut data[..]);
        let keys = KeyMaterial::random(&mut rng);

        let backends: Vec<usize> = match params.backend {
            Some(index) if index < BACKENDS.len() => vec![index],
            Some(index) => {
                return Err(StressError::Resource {
                    label: Self::LABEL,
                    reason: format!("no backend #{}", index),
                });
            }
            None => (0..BACKENDS.len()).collect(),
        };
        let queues = backends.iter().map(|b| JobQueue::new(BACKENDS[*b].1)).collect();
        debug!(target: LOG_TARGET,
            "{} jobs per call on backends: {}",
            params.jobs,
            backends.iter().map(|b| BACKENDS[*b].0).collect::<Vec<_>>().join(" ")
        );

        Ok(Self {
            data,
            keys,
            jobs: params.jobs.max(1),
            backend_stats: vec![MethodStats::default(); backends.len()],
            backends,
            queues,
            results: [Vec::new(), Vec::new()],
        })
    }

    fn ops_per_call(&self, _entry: &MethodEntry<Self>) -> f64 {
        (self.jobs * self.backends.len()) as f64
    }

    fn verify(&self, _index: usize, entry: &MethodEntry<Self>) -> Result<()> {
        let [primary, replica] = &self.results;
        if primary.len() != replica.len() {
            return Err(StressError::Verification {
                method: entry.name,
                element: primary.len().min(replica.len()),
                expected: format!("{} job outputs", primary.len()),
                got: format!("{} job outputs", replica.len()),
            });
        }
        for (i, (p, r)) in primary.iter().zip(replica).enumerate() {
            if p != r {
                return Err(StressError::Verification {
                    method: entry.name,
                    element: i,
                    expected: hex::encode(p),
                    got: hex::encode(r),
                });
            }
        }
        Ok(())
    }

    fn extra_metrics(&self) -> Vec<Metric> {
        self.backends
            .iter()
            .zip(&self.backend_stats)
            .filter_map(|(b, stats)| {
                let rate = stats.finalize()?;
                Some(Metric::harmonic(
                    format!("{} bogo ops per sec", BACKENDS[*b].0),
                    rate,
                    stats.duration,
                ))
            })
            .collect()
    }

    fn footprint(&self) -> usize {
        self.data.len() + std::mem::size_of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_backend() {
        assert_eq!(resolve_backend("mb8"), Ok(2));
        let err = resolve_backend("avx512").unwrap_err();
        assert!(err.to_string().contains("serial mb4 mb8 mb16"), "got: {}", err);
    }

    #[test]
    fn test_pending_job_is_incomplete() {
        let mut jobs: Vec<Job> = (0..3).map(|id| Job::new(id, JobKind::Sha3)).collect();
        for job in &mut jobs[..2] {
            job.status = JobStatus::Completed;
        }
        assert_eq!(
            check_completed("sha3", 3, &jobs),
            Err(StressError::IncompleteJobs {
                method: "sha3",
                completed: 2,
                submitted: 3,
            })
        );

        jobs[2].status = JobStatus::Completed;
        assert_eq!(check_completed("sha3", 3, &jobs), Ok(()));
        assert!(check_completed("sha3", 4, &jobs).is_err(), "a lost job is incomplete too");
    }

    #[test]
    fn test_single_backend_selection() {
        let params = ScratchParams {
            seed: 3,
            jobs: 5,
            backend: Some(1),
        };
        let scratch = IpsecScratch::acquire(&params).unwrap();
        assert_eq!(scratch.backends(), vec!["mb4"]);
        assert_eq!(scratch.queues[0].lanes(), 4);
    }
}

// Changelog:
// - v1.0.2 (2026-10-19): Completion checked on every drained job; DES method.
// - v1.0.1 (2026-10-19): Per-backend throughput metrics; backend selection.
// - v1.0.0 (2026-10-19): Initial crypto job family.
