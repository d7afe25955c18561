// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module root for the workload families hosted by the
// harness: decimal/binary floating point, big integer prime search and the
// multi-buffer crypto job pipeline.
//
// Tree Location:
// - src/workloads/mod.rs (workload family exports)
// - Submodules: dfp, prime, ipsec, queue

pub mod dfp;
pub mod ipsec;
pub mod prime;
pub mod queue;

pub use dfp::DfpScratch;
pub use ipsec::IpsecScratch;
pub use prime::PrimeScratch;

// Changelog:
// - v1.0.0 (2026-10-19): Initial workload family exports.
