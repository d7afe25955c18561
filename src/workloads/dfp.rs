// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/dfp.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the decimal floating point arithmetic family. Eight
// elements are advanced through forward/inverse operand pairs in the IEEE 754
// decimal32, decimal64 and decimal128 formats, with binary32 and binary64
// alongside for comparison. The primary path walks the iterations in the
// outer loop, the replica path walks the elements in the outer loop; both
// must land on bit-identical results.
//
// Tree Location:
// - src/workloads/dfp.rs (DfpScratch, Element, ArithOp)
// - Depends on: harness, dec, rand

use crate::Result;
use crate::core::error::StressError;
use crate::core::{Category, StressContext, Variant, time_now};
use crate::harness::registry::{MethodEntry, MethodTable};
use crate::harness::scratch::{ScratchParams, Workload};
use dec::{Context, Decimal32, Decimal64, Decimal128};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;
use std::sync::LazyLock;

/// Elements advanced per call
pub const DFP_ELEMENTS: usize = 8;

/// Arithmetic operations per element per call
pub const LOOPS_PER_CALL: usize = 32768;

/// Fractional bits of seeded values. Every intermediate of a pair then needs
/// at most seven significant digits, which decimal32 holds exactly.
const SEED_FRACTION_BITS: u32 = 3;

/// Exponents of the power-of-two multipliers
const MUL_EXPONENTS: [i32; 6] = [-2, -1, 1, 2, 3, 4];

/// Per-width state of one element
#[derive(Debug, Clone, Copy)]
pub struct Lane<T> {
    pub init: T,
    /// Result slots indexed by `Variant::index`
    pub result: [T; 2],
    pub add: T,
    pub add_rev: T,
    pub mul: T,
    pub mul_rev: T,
}

impl<T: Element> Lane<T> {
    fn seeded(init: i64, add: i64, exp: i32) -> Result<Self> {
        let value = T::dyadic(init, SEED_FRACTION_BITS)?;
        Ok(Self {
            init: value,
            result: [value; 2],
            add: T::dyadic(add, SEED_FRACTION_BITS)?,
            add_rev: T::dyadic(-add, SEED_FRACTION_BITS)?,
            mul: power_of_two(exp)?,
            mul_rev: power_of_two(-exp)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArithElement {
    pub df32: Lane<Decimal32>,
    pub df64: Lane<Decimal64>,
    pub df128: Lane<Decimal128>,
    pub fp32: Lane<f32>,
    pub fp64: Lane<f64>,
}

impl ArithElement {
    fn seeded(init: i64, add: i64, exp: i32) -> Result<Self> {
        Ok(Self {
            df32: Lane::seeded(init, add, exp)?,
            df64: Lane::seeded(init, add, exp)?,
            df128: Lane::seeded(init, add, exp)?,
            fp32: Lane::seeded(init, add, exp)?,
            fp64: Lane::seeded(init, add, exp)?,
        })
    }
}

/// One arithmetic width
pub trait Element: Copy + Debug {
    const CATEGORY: Category;

    /// Exact value of `num / 2^shift`
    fn dyadic(num: i64, shift: u32) -> Result<Self>;

    fn op_add(self, rhs: Self) -> Self;

    fn op_mul(self, rhs: Self) -> Self;

    fn op_div(self, rhs: Self) -> Self;

    /// Numeric equality, ignoring the decimal cohort
    fn same_value(self, other: Self) -> bool;

    /// Raw representation used for bitwise comparison
    fn bit_pattern(self) -> u128;

    /// Human readable, full precision rendering
    fn render(self) -> String;

    fn lane(element: &ArithElement) -> &Lane<Self>;

    fn lane_mut(element: &mut ArithElement) -> &mut Lane<Self>;
}

macro_rules! binary_element {
    ($ty:ty, $bits:ty, $category:expr, $field:ident, $width:literal) => {
        impl Element for $ty {
            const CATEGORY: Category = $category;

            fn dyadic(num: i64, shift: u32) -> Result<Self> {
                Ok(num as $ty / (1u64 << shift) as $ty)
            }

            #[inline(always)]
            fn op_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn op_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn op_div(self, rhs: Self) -> Self {
                self / rhs
            }

            fn same_value(self, other: Self) -> bool {
                self == other
            }

            fn bit_pattern(self) -> u128 {
                self.to_bits() as u128
            }

            fn render(self) -> String {
                format!("{:e} ({:#0w$x})", self, self.to_bits() as $bits, w = $width)
            }

            fn lane(element: &ArithElement) -> &Lane<Self> {
                &element.$field
            }

            fn lane_mut(element: &mut ArithElement) -> &mut Lane<Self> {
                &mut element.$field
            }
        }
    };
}

binary_element!(f32, u32, Category::Binary32, fp32, 10);
binary_element!(f64, u64, Category::Binary64, fp64, 18);

/// `num / 2^shift` as a decimal string: `num * 5^shift` scaled by `10^-shift`
fn dyadic_literal(num: i64, shift: u32) -> String {
    format!("{}E-{}", num * 5i64.pow(shift), shift)
}

fn parse_error(e: impl std::fmt::Display) -> StressError {
    StressError::Resource {
        label: "dfp",
        reason: e.to_string(),
    }
}

macro_rules! decimal_element {
    ($ty:ty, $bits:ty, $category:expr, $field:ident, $width:literal) => {
        impl Element for $ty {
            const CATEGORY: Category = $category;

            fn dyadic(num: i64, shift: u32) -> Result<Self> {
                dyadic_literal(num, shift).parse::<$ty>().map_err(parse_error)
            }

            #[inline(always)]
            fn op_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn op_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn op_div(self, rhs: Self) -> Self {
                self / rhs
            }

            fn same_value(self, other: Self) -> bool {
                self == other
            }

            fn bit_pattern(self) -> u128 {
                <$bits>::from_le_bytes(self.to_le_bytes()) as u128
            }

            fn render(self) -> String {
                format!("{} ({:#0w$x})", self, <$bits>::from_le_bytes(self.to_le_bytes()), w = $width)
            }

            fn lane(element: &ArithElement) -> &Lane<Self> {
                &element.$field
            }

            fn lane_mut(element: &mut ArithElement) -> &mut Lane<Self> {
                &mut element.$field
            }
        }
    };
}

decimal_element!(Decimal64, u64, Category::Decimal64, df64, 18);
decimal_element!(Decimal128, u128, Category::Decimal128, df128, 34);

/// decimal32 is a storage format: operands are widened to decimal64 and each
/// result is rounded back into seven digits.
#[inline(always)]
fn narrow(value: Decimal64) -> Decimal32 {
    Context::<Decimal32>::default().from_decimal64(value)
}

impl Element for Decimal32 {
    const CATEGORY: Category = Category::Decimal32;

    fn dyadic(num: i64, shift: u32) -> Result<Self> {
        dyadic_literal(num, shift).parse::<Decimal32>().map_err(parse_error)
    }

    #[inline(always)]
    fn op_add(self, rhs: Self) -> Self {
        narrow(Decimal64::from(self) + Decimal64::from(rhs))
    }

    #[inline(always)]
    fn op_mul(self, rhs: Self) -> Self {
        narrow(Decimal64::from(self) * Decimal64::from(rhs))
    }

    #[inline(always)]
    fn op_div(self, rhs: Self) -> Self {
        narrow(Decimal64::from(self) / Decimal64::from(rhs))
    }

    fn same_value(self, other: Self) -> bool {
        Decimal64::from(self) == Decimal64::from(other)
    }

    fn bit_pattern(self) -> u128 {
        u32::from_le_bytes(self.to_le_bytes()) as u128
    }

    fn render(self) -> String {
        format!("{} ({:#010x})", self, u32::from_le_bytes(self.to_le_bytes()))
    }

    fn lane(element: &ArithElement) -> &Lane<Self> {
        &element.df32
    }

    fn lane_mut(element: &mut ArithElement) -> &mut Lane<Self> {
        &mut element.df32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Mul,
    Div,
}

impl ArithOp {
    /// One forward operation followed by its inverse
    #[inline(always)]
    pub fn pair<T: Element>(self, x: T, lane: &Lane<T>) -> T {
        match self {
            ArithOp::Add => x.op_add(lane.add).op_add(lane.add_rev),
            ArithOp::Mul => x.op_mul(lane.mul).op_mul(lane.mul_rev),
            ArithOp::Div => x.op_div(lane.mul).op_div(lane.mul_rev),
        }
    }
}

pub struct DfpScratch {
    elements: Vec<ArithElement>,
}

impl DfpScratch {
    pub fn elements(&self) -> &[ArithElement] {
        &self.elements
    }

    /// Element `i` starts in `[i, i + 1)`; every width gets the same values.
    fn seeded(seed: u64) -> Result<Self> {
        let mut elements = Vec::new();
        elements
            .try_reserve_exact(DFP_ELEMENTS)
            .map_err(|e| StressError::Resource {
                label: "dfp",
                reason: e.to_string(),
            })?;

        let mut rng = StdRng::seed_from_u64(seed);
        let one = 1i64 << SEED_FRACTION_BITS;
        for i in 0..DFP_ELEMENTS {
            let init = i as i64 * one + rng.gen_range(0..one);
            let add = rng.gen_range(1..one);
            let exp = MUL_EXPONENTS[rng.gen_range(0..MUL_EXPONENTS.len())];
            elements.push(ArithElement::seeded(init, add, exp)?);
        }
        Ok(Self { elements })
    }

    fn compare<T: Element>(&self, method: &'static str) -> Result<()> {
        for (i, element) in self.elements.iter().enumerate() {
            let lane = T::lane(element);
            let [primary, replica] = lane.result;
            if primary.bit_pattern() != replica.bit_pattern() {
                return Err(StressError::Verification {
                    method,
                    element: i,
                    expected: primary.render(),
                    got: replica.render(),
                });
            }
        }
        Ok(())
    }
}

fn power_of_two<T: Element>(exp: i32) -> Result<T> {
    if exp >= 0 {
        T::dyadic(1i64 << exp, 0)
    } else {
        T::dyadic(1, exp.unsigned_abs())
    }
}

fn run_arith<T: Element>(ctx: &mut StressContext, scratch: &mut DfpScratch, variant: Variant, op: ArithOp) -> Result<f64> {
    let idx = variant.index();
    let pairs = LOOPS_PER_CALL / 2;

    for element in scratch.elements.iter_mut() {
        let lane = T::lane_mut(element);
        lane.result[idx] = lane.init;
    }

    let t = time_now();
    match variant {
        Variant::Primary => {
            for _ in 0..pairs {
                if !ctx.keep_running() {
                    break;
                }
                for element in scratch.elements.iter_mut() {
                    let lane = T::lane_mut(element);
                    let next = op.pair(lane.result[idx], lane);
                    lane.result[idx] = next;
                }
            }
        }
        Variant::Replica => {
            for element in scratch.elements.iter_mut() {
                let lane = T::lane_mut(element);
                let mut x = lane.result[idx];
                for _ in 0..pairs {
                    if !ctx.keep_running() {
                        break;
                    }
                    x = op.pair(x, lane);
                }
                lane.result[idx] = x;
            }
        }
    }
    Ok(time_now() - t)
}

macro_rules! arith_method {
    ($name:ident, $ty:ty, $op:expr) => {
        fn $name(ctx: &mut StressContext, scratch: &mut DfpScratch, variant: Variant) -> Result<f64> {
            run_arith::<$ty>(ctx, scratch, variant, $op)
        }
    };
}

arith_method!(df32add, Decimal32, ArithOp::Add);
arith_method!(df64add, Decimal64, ArithOp::Add);
arith_method!(df128add, Decimal128, ArithOp::Add);
arith_method!(fp32add, f32, ArithOp::Add);
arith_method!(fp64add, f64, ArithOp::Add);
arith_method!(df32mul, Decimal32, ArithOp::Mul);
arith_method!(df64mul, Decimal64, ArithOp::Mul);
arith_method!(df128mul, Decimal128, ArithOp::Mul);
arith_method!(fp32mul, f32, ArithOp::Mul);
arith_method!(fp64mul, f64, ArithOp::Mul);
arith_method!(df32div, Decimal32, ArithOp::Div);
arith_method!(df64div, Decimal64, ArithOp::Div);
arith_method!(df128div, Decimal128, ArithOp::Div);
arith_method!(fp32div, f32, ArithOp::Div);
arith_method!(fp64div, f64, ArithOp::Div);

static METHODS: LazyLock<MethodTable<DfpScratch>> = LazyLock::new(|| {
    MethodTable::new(
        "dfp",
        "all decimal and binary floating point methods",
        vec![
            MethodEntry::new("df32add", "decimal32 add", Category::Decimal32, df32add),
            MethodEntry::new("df64add", "decimal64 add", Category::Decimal64, df64add),
            MethodEntry::new("df128add", "decimal128 add", Category::Decimal128, df128add),
            MethodEntry::new("fp32add", "binary32 add", Category::Binary32, fp32add),
            MethodEntry::new("fp64add", "binary64 add", Category::Binary64, fp64add),
            MethodEntry::new("df32mul", "decimal32 multiply", Category::Decimal32, df32mul),
            MethodEntry::new("df64mul", "decimal64 multiply", Category::Decimal64, df64mul),
            MethodEntry::new("df128mul", "decimal128 multiply", Category::Decimal128, df128mul),
            MethodEntry::new("fp32mul", "binary32 multiply", Category::Binary32, fp32mul),
            MethodEntry::new("fp64mul", "binary64 multiply", Category::Binary64, fp64mul),
            MethodEntry::new("df32div", "decimal32 divide", Category::Decimal32, df32div),
            MethodEntry::new("df64div", "decimal64 divide", Category::Decimal64, df64div),
            MethodEntry::new("df128div", "decimal128 divide", Category::Decimal128, df128div),
            MethodEntry::new("fp32div", "binary32 divide", Category::Binary32, fp32div),
            MethodEntry::new("fp64div", "binary64 divide", Category::Binary64, fp64div),
        ],
    )
});

pub fn methods() -> &'static MethodTable<DfpScratch> {
    &METHODS
}

impl Workload for DfpScratch {
    const LABEL: &'static str = "dfp";
    const RATE_UNIT: &'static str = "Mdfp-ops per sec";
    const RATE_SCALE: f64 = 1_000_000.0;

    fn methods() -> &'static MethodTable<Self> {
        methods()
    }

    fn acquire(params: &ScratchParams) -> Result<Self> {
        Self::seeded(params.seed)
    }

    fn ops_per_call(&self, _entry: &MethodEntry<Self>) -> f64 {
        (DFP_ELEMENTS * LOOPS_PER_CALL) as f64
    }

    fn verify(&self, _index: usize, entry: &MethodEntry<Self>) -> Result<()> {
        match entry.category {
            Category::Decimal32 => self.compare::<Decimal32>(entry.name),
            Category::Decimal64 => self.compare::<Decimal64>(entry.name),
            Category::Decimal128 => self.compare::<Decimal128>(entry.name),
            Category::Binary32 => self.compare::<f32>(entry.name),
            Category::Binary64 => self.compare::<f64>(entry.name),
            _ => Ok(()),
        }
    }

    fn footprint(&self) -> usize {
        self.elements.len() * std::mem::size_of::<ArithElement>()
    }
}


// Changelog:
// - v1.1.0 (2026-10-19): Real IEEE decimal32, decimal64 and decimal128
//   widths (df32*, df64*, df128*); binary widths kept next to them.
// - v1.0.2 (2026-10-19): Seeding uses dyadic values and power-of-two
//   multipliers so a forward/inverse pair is exact in every width.
// - v1.0.1 (2026-10-19): One generic body for all nine methods.
// - v1.0.0 (2026-10-19): Initial floating point family.
