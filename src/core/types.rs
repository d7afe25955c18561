// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.0.2
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines core data structures for the harness: command-line
// arguments, workload families, method categories and the variant index that
// selects the primary or replica computation path.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde

use crate::core::error::StressError;
use crate::harness::runner::StressConfig;
use crate::workloads::{dfp, ipsec, prime};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Workload families the harness can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Decimal and binary floating point add/mul/div
    Dfp,
    /// Next-prime search on arbitrary precision integers
    Prime,
    /// Multi-buffer cipher, hash and MAC jobs
    Ipsec,
}

impl Family {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Family::Dfp => "dfp",
            Family::Prime => "prime",
            Family::Ipsec => "ipsec",
        }
    }

    /// Valid method names for this family, fan-out entry first.
    pub fn method_names(&self) -> Vec<&'static str> {
        match self {
            Family::Dfp => dfp::methods().names(),
            Family::Prime => prime::methods().names(),
            Family::Ipsec => ipsec::methods().names(),
        }
    }

    /// Resolves `name` to a method index, rejecting unknown names with the
    /// full list of valid ones.
    pub fn resolve_method(&self, name: &str) -> Result<usize, StressError> {
        match self {
            Family::Dfp => dfp::methods().resolve(name),
            Family::Prime => prime::methods().resolve(name),
            Family::Ipsec => ipsec::methods().resolve(name),
        }
    }
}

/// Arithmetic kind of a method, used for labelling and result comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    All,
    Binary32,
    Binary64,
    Decimal32,
    Decimal64,
    Decimal128,
    BigInt,
    Cipher,
    Digest,
    Mac,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Binary32 => "binary32",
            Category::Binary64 => "binary64",
            Category::Decimal32 => "decimal32",
            Category::Decimal64 => "decimal64",
            Category::Decimal128 => "decimal128",
            Category::BigInt => "bigint",
            Category::Cipher => "cipher",
            Category::Digest => "digest",
            Category::Mac => "mac",
        }
    }
}

/// Which of the two independent computation paths a workload runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Primary = 0,
    Replica = 1,
}

impl Variant {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Command-line arguments for numstress
#[derive(Parser, Debug)]
#[command(
    name = "numstress",
    version = "1.0.0",
    about = "Pluggable CPU/compute workload harness",
    long_about = "numstress runs a numeric or cryptographic method repeatedly inside a timed loop,\n\
                  reports throughput, optionally verifies every result through an independent code\n\
                  path, and stops promptly when its time or op budget runs out.\n\n\
                  Examples:\n\
                    Decimal float: numstress --stressor dfp --method df128mul --timeout 10 --verify\n\
                    Prime search: numstress --stressor prime --method factorial --instances 4\n\
                    Crypto jobs: numstress --stressor ipsec --method hmac-sha512 --ipsec-jobs 256\n\
                    List methods: numstress --stressor ipsec --list-methods"
)]
pub struct Args {
    /// Workload family to run
    #[arg(short, long, value_enum, default_value = "dfp")]
    pub stressor: Family,

    /// Method within the family ('all' exercises every method in turn)
    #[arg(short, long, default_value = "all", value_name = "NAME")]
    pub method: String,

    /// Number of concurrent instances (0 = one per CPU)
    #[arg(short, long, default_value = "1", value_name = "COUNT")]
    pub instances: usize,

    /// Wall clock budget in seconds (0 = run until the op budget or Ctrl-C)
    #[arg(short, long, default_value = "10", value_name = "SECS")]
    pub timeout: u64,

    /// Stop each instance after N bogo operations (0 = unlimited)
    #[arg(long, default_value = "0", value_name = "N")]
    pub ops: u64,

    /// Seconds to wait after the timeout before forcing an unwind
    #[arg(long, default_value = "2", value_name = "SECS")]
    pub unwind_grace: u64,

    /// Double-run every method and compare results bitwise
    #[arg(long, default_value = "false")]
    pub verify: bool,

    /// Seed for scratch initialisation (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Jobs submitted per ipsec call
    #[arg(long, default_value = "128", value_name = "N", value_parser = clap::value_parser!(u32).range(1..=65536))]
    pub ipsec_jobs: u32,

    /// Restrict ipsec to one multi-buffer backend (serial, mb4, mb8, mb16)
    #[arg(long, value_name = "BACKEND")]
    pub ipsec_backend: Option<String>,

    /// Print the methods of the selected family and exit
    #[arg(long, default_value = "false")]
    pub list_methods: bool,

    /// Print extended option help with usage examples and exit
    #[arg(long, default_value = "false")]
    pub examples: bool,

    /// Write the aggregated metrics as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub metrics_json: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

impl Args {
    /// Validates option values that clap cannot check on its own.
    pub fn validate(&self) -> Result<(), StressError> {
        self.stressor.resolve_method(&self.method)?;
        if let Some(backend) = &self.ipsec_backend {
            ipsec::resolve_backend(backend)?;
        }
        Ok(())
    }

    pub fn to_config(&self) -> Result<StressConfig, StressError> {
        let method_index = self.stressor.resolve_method(&self.method)?;
        let backend = match &self.ipsec_backend {
            Some(name) => Some(ipsec::resolve_backend(name)?),
            None => None,
        };
        let instances = if self.instances == 0 {
            num_cpus::get()
        } else {
            self.instances
        };

        Ok(StressConfig {
            family: self.stressor,
            method_index,
            instances,
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            max_ops: self.ops,
            unwind_grace: Duration::from_secs(self.unwind_grace),
            verify: self.verify,
            seed: self.seed.unwrap_or_else(rand::random),
            ipsec_jobs: self.ipsec_jobs as usize,
            ipsec_backend: backend,
        })
    }
}

// Changelog:
// - v1.0.2 (2026-10-19): Added ipsec backend selection and metrics JSON path.
// - v1.0.1 (2026-10-19): Added op budget and unwind grace options.
// - v1.0.0 (2026-10-19): Replaced miner arguments with harness arguments.
//   - Purpose: Command-line surface for family, method, budgets and
//     verification, plus the Category and Variant types shared by workloads.
