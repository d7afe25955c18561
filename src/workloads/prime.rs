// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/prime.rs
// Version: 1.0.2
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the prime search family. Each method repeatedly finds
// the smallest probable prime above a start value and then advances the
// start by its own strategy, so the numbers grow without bound. The search
// never polls the stop flag; it only passes a checkpoint per candidate, which
// makes it the family that relies on forced unwinding to stop in time.
//
// Tree Location:
// - src/workloads/prime.rs (PrimeScratch, next-prime searches)
// - Depends on: harness, num-bigint, num-traits

use crate::Result;
use crate::core::error::StressError;
use crate::core::{Category, StressContext, Variant, time_now};
use crate::harness::registry::{MethodEntry, MethodTable};
use crate::harness::scratch::{ScratchParams, Workload};
use log::{info, warn};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::mem::ManuallyDrop;
use std::sync::LazyLock;

const LOG_TARGET: &str = "numstress::prime";

/// Small primes used for trial division ahead of Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin witnesses; deterministic below 3.3e24
const MR_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Residues modulo 30 that are coprime to 2, 3 and 5
const WHEEL_30: [u32; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

/// How a method moves its start value after each prime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Multiply by a running counter starting at 2
    Factorial,
    /// Continue two past the last prime found
    Increment,
    Pwr2,
    Pwr10,
}

/// Search state of one method
#[derive(Debug, Clone)]
pub struct PrimeLane {
    pub advance: Advance,
    pub start: BigUint,
    pub factorial: u64,
    /// Last prime found, indexed by `Variant::index`
    pub results: [Option<BigUint>; 2],
    /// Advance the start before the next primary search
    pending: bool,
    pub primes: u64,
    pub largest_bits: u64,
}

impl PrimeLane {
    pub fn new(advance: Advance) -> Self {
        Self {
            advance,
            start: BigUint::one(),
            factorial: 2,
            results: [None, None],
            pending: false,
            primes: 0,
            largest_bits: 0,
        }
    }

    fn apply_advance(&mut self) {
        match self.advance {
            Advance::Factorial => {
                self.start *= self.factorial;
                self.factorial += 1;
            }
            Advance::Increment => {
                if let Some(last) = &self.results[Variant::Primary.index()] {
                    self.start = last + 2u32;
                }
            }
            Advance::Pwr2 => self.start *= 2u32,
            Advance::Pwr10 => self.start *= 10u32,
        }
    }
}

/// Working values live in `ManuallyDrop`: after a forced unwind they are
/// abandoned rather than finalized.
pub struct PrimeScratch {
    lanes: ManuallyDrop<Vec<PrimeLane>>,
}

impl PrimeScratch {
    pub fn lane(&self, index: usize) -> Option<&PrimeLane> {
        index.checked_sub(1).and_then(|i| self.lanes.get(i))
    }

    fn lane_mut(&mut self, index: usize) -> Option<&mut PrimeLane> {
        index.checked_sub(1).and_then(|i| self.lanes.get_mut(i))
    }

    fn largest(&self) -> Option<&BigUint> {
        self.lanes
            .iter()
            .filter_map(|lane| lane.results[Variant::Primary.index()].as_ref())
            .max()
    }
}

/// Trial division by the small primes followed by Miller-Rabin with fixed
/// witnesses. Passes a checkpoint per witness.
pub fn is_probable_prime(ctx: &StressContext, n: &BigUint) -> bool {
    if let Some(small) = n.to_u32() {
        if small < 2 {
            return false;
        }
        if SMALL_PRIMES.contains(&small) {
            return true;
        }
    }
    if SMALL_PRIMES.iter().any(|p| (n % *p).is_zero()) {
        return false;
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for base in MR_BASES {
        ctx.checkpoint();
        let mut x = BigUint::from(base).modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Smallest probable prime >= `start`, stepping through odd candidates.
/// Smallest probable prime strictly greater than `start`, stepping over odd
/// candidates.
pub fn next_prime_odd(ctx: &StressContext, start: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    let mut candidate = start + 1u32;
    if candidate <= two {
        return two;
    }
    if (&candidate % 2u32).is_zero() {
        candidate += 1u32;
    }
    loop {
        ctx.checkpoint();
        if is_probable_prime(ctx, &candidate) {
            return candidate;
        }
        candidate += 2u32;
    }
}

/// Smallest probable prime >= `start`, visiting only residues coprime to 30.
/// Same bound as [`next_prime_odd`], stepping over the residues coprime to 30.
pub fn next_prime_wheel(ctx: &StressContext, start: &BigUint) -> BigUint {
    let from_value = start + 1u32;
    for p in [2u32, 3, 5, 7] {
        if from_value <= BigUint::from(p) {
            return BigUint::from(p);
        }
    }

    let offset = (&from_value % 30u32).to_u32().unwrap_or(0);
    let mut base = &from_value - offset;
    let mut from = WHEEL_30.iter().position(|r| *r >= offset).unwrap_or(WHEEL_30.len());
    loop {
        for residue in &WHEEL_30[from..] {
            ctx.checkpoint();
            let candidate = &base + *residue;
            if is_probable_prime(ctx, &candidate) {
                return candidate;
            }
        }
        base += 30u32;
        from = 0;
    }
}

fn run_search(ctx: &mut StressContext, scratch: &mut PrimeScratch, index: usize, variant: Variant) -> Result<f64> {
    let lane = scratch.lane_mut(index).ok_or_else(|| StressError::Configuration {
        family: "prime",
        name: format!("#{}", index),
        valid: methods().names(),
    })?;

    if variant == Variant::Primary && lane.pending {
        lane.apply_advance();
    }

    let t = time_now();
    let prime = match variant {
        Variant::Primary => next_prime_odd(ctx, &lane.start),
        Variant::Replica => next_prime_wheel(ctx, &lane.start),
    };
    let dt = time_now() - t;

    if variant == Variant::Primary {
        lane.pending = true;
        lane.primes += 1;
        lane.largest_bits = lane.largest_bits.max(prime.bits());
    }
    lane.results[variant.index()] = Some(prime);
    Ok(dt)
}

fn factorial(ctx: &mut StressContext, scratch: &mut PrimeScratch, variant: Variant) -> Result<f64> {
    run_search(ctx, scratch, 1, variant)
}

fn inc(ctx: &mut StressContext, scratch: &mut PrimeScratch, variant: Variant) -> Result<f64> {
    run_search(ctx, scratch, 2, variant)
}

fn pwr2(ctx: &mut StressContext, scratch: &mut PrimeScratch, variant: Variant) -> Result<f64> {
    run_search(ctx, scratch, 3, variant)
}

fn pwr10(ctx: &mut StressContext, scratch: &mut PrimeScratch, variant: Variant) -> Result<f64> {
    run_search(ctx, scratch, 4, variant)
}

static METHODS: LazyLock<MethodTable<PrimeScratch>> = LazyLock::new(|| {
    MethodTable::new(
        "prime",
        "all prime search methods",
        vec![
            MethodEntry::new("factorial", "factorial start", Category::BigInt, factorial),
            MethodEntry::new("inc", "incrementing start", Category::BigInt, inc),
            MethodEntry::new("pwr2", "doubling start", Category::BigInt, pwr2),
            MethodEntry::new("pwr10", "tenfold start", Category::BigInt, pwr10),
        ],
    )
});

pub fn methods() -> &'static MethodTable<PrimeScratch> {
    &METHODS
}

impl Workload for PrimeScratch {
    const LABEL: &'static str = "prime";
    const RATE_UNIT: &'static str = "primes per sec";

    fn methods() -> &'static MethodTable<Self> {
        methods()
    }

    fn acquire(_params: &ScratchParams) -> Result<Self> {
        let lanes = vec![
            PrimeLane::new(Advance::Factorial),
            PrimeLane::new(Advance::Increment),
            PrimeLane::new(Advance::Pwr2),
            PrimeLane::new(Advance::Pwr10),
        ];
        Ok(Self {
            lanes: ManuallyDrop::new(lanes),
        })
    }

    fn ops_per_call(&self, _entry: &MethodEntry<Self>) -> f64 {
        1.0
    }

    fn verify(&self, index: usize, entry: &MethodEntry<Self>) -> Result<()> {
        let Some(lane) = self.lane(index) else {
            return Ok(());
        };
        let [primary, replica] = &lane.results;
        if primary != replica {
            let render = |v: &Option<BigUint>| v.as_ref().map_or_else(|| "none".to_string(), |n| n.to_string());
            return Err(StressError::Verification {
                method: entry.name,
                element: 0,
                expected: render(primary),
                got: render(replica),
            });
        }
        Ok(())
    }

    fn release(self, unwound: bool) {
        let found: u64 = self.lanes.iter().map(|lane| lane.primes).sum();
        let digits = self.largest().map_or(0, |n| n.to_str_radix(10).len());
        info!(target: LOG_TARGET, "🔢 {} primes found, largest prime: {} digits long", found, digits);

        if unwound {
            warn!(target: LOG_TARGET, "Abandoning big integer working values after forced unwind");
        } else {
            drop(ManuallyDrop::into_inner(self.lanes));
        }
    }

    fn footprint(&self) -> usize {
        self.lanes
            .iter()
            .map(|lane| std::mem::size_of::<PrimeLane>() + (lane.start.bits() / 8) as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CancelToken;
    use std::sync::Arc;

    fn ctx() -> StressContext {
        StressContext::new("prime", 0, Arc::new(CancelToken::new()), 0)
    }

    #[test]
    fn test_small_primality() {
        let ctx = ctx();
        let primes: Vec<u32> = (0u32..60)
            .filter(|n| is_probable_prime(&ctx, &BigUint::from(*n)))
            .collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]);
    }

    #[test]
    fn test_known_next_primes() {
        let ctx = ctx();
        assert_eq!(next_prime_odd(&ctx, &BigUint::from(90u32)), BigUint::from(97u32));
        assert_eq!(next_prime_wheel(&ctx, &BigUint::from(90u32)), BigUint::from(97u32));
        assert_eq!(next_prime_odd(&ctx, &BigUint::one()), BigUint::from(2u32));
        assert_eq!(next_prime_wheel(&ctx, &BigUint::one()), BigUint::from(2u32));
        assert_eq!(next_prime_odd(&ctx, &BigUint::from(2u32)), BigUint::from(3u32));
        assert_eq!(next_prime_wheel(&ctx, &BigUint::from(7u32)), BigUint::from(11u32));
        // 2^61 - 1 is a Mersenne prime
        let m61 = (BigUint::one() << 61u32) - 1u32;
        let below = &m61 - 1u32;
        assert_eq!(next_prime_odd(&ctx, &below), m61);
        assert_eq!(next_prime_wheel(&ctx, &below), m61);
        assert_ne!(next_prime_odd(&ctx, &m61), m61, "a prime start is never returned");
    }

    #[test]
    fn test_searches_agree() {
        let ctx = ctx();
        for start in (0u32..2000).step_by(7) {
            let start = BigUint::from(start);
            assert_eq!(
                next_prime_odd(&ctx, &start),
                next_prime_wheel(&ctx, &start),
                "searches disagree from {}",
                start
            );
        }
    }

    #[test]
    fn test_lane_sequences() {
        let mut ctx = ctx();
        let mut scratch = PrimeScratch::acquire(&ScratchParams::with_seed(0)).unwrap();
        let mut sequence = |index: usize| -> Vec<String> {
            (0..4)
                .map(|_| {
                    run_search(&mut ctx, &mut scratch, index, Variant::Primary).unwrap();
                    let lane = scratch.lane(index).unwrap();
                    lane.results[0].as_ref().unwrap().to_string()
                })
                .collect()
        };
        assert_eq!(sequence(1), vec!["2", "3", "7", "29"], "factorial lane");
        assert_eq!(sequence(2), vec!["2", "5", "11", "17"], "increment lane");
        assert_eq!(sequence(3), vec!["2", "3", "5", "11"], "doubling lane");
        assert_eq!(sequence(4), vec!["2", "11", "101", "1009"], "tenfold lane");
    }

    #[test]
    fn test_advance_strategies() {
        let mut lane = PrimeLane::new(Advance::Factorial);
        lane.apply_advance();
        lane.apply_advance();
        lane.apply_advance();
        assert_eq!(lane.start, BigUint::from(24u32));

        let mut lane = PrimeLane::new(Advance::Increment);
        lane.results[0] = Some(BigUint::from(11u32));
        lane.apply_advance();
        assert_eq!(lane.start, BigUint::from(13u32));

        let mut lane = PrimeLane::new(Advance::Pwr10);
        lane.apply_advance();
        assert_eq!(lane.start, BigUint::from(10u32));
    }
}

// Changelog:
// - v1.0.2 (2026-10-19): Next prime is strictly greater than the start.
// - v1.0.1 (2026-10-19): Per-method lanes; the start only advances before the
//   next primary search so the replica always sees the same start.
// - v1.0.0 (2026-10-19): Initial prime search family.
//   - Note: Big integer state is abandoned, not dropped, after a forced
//     unwind.
