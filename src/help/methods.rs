// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/help/methods.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file renders the method tables of the workload families for
// --list-methods and for configuration errors.
//
// Tree Location:
// - src/help/methods.rs (method listings)
// - Depends on: harness/registry, workloads

use crate::core::Family;
use crate::harness::registry::MethodTable;
use crate::workloads::{dfp, ipsec, prime};

/// One row per method: name, category, description.
pub fn method_rows(family: Family) -> Vec<(&'static str, &'static str, &'static str)> {
    match family {
        Family::Dfp => rows(dfp::methods()),
        Family::Prime => rows(prime::methods()),
        Family::Ipsec => rows(ipsec::methods()),
    }
}

fn rows<S>(table: &MethodTable<S>) -> Vec<(&'static str, &'static str, &'static str)> {
    table
        .entries()
        .iter()
        .map(|entry| (entry.name, entry.category.as_str(), entry.description))
        .collect()
}

pub fn print_method_list(family: Family) {
    println!("📋 {} methods:", family.as_str());
    for (name, category, description) in method_rows(family) {
        println!("  {:<12} {:<11} {}", name, category, description);
    }
    if family == Family::Ipsec {
        let backends: Vec<&str> = ipsec::BACKENDS.iter().map(|(name, _)| *name).collect();
        println!();
        println!("  backends: {}", backends.join(" "));
    }
}

// Changelog:
// - v1.0.0 (2026-10-19): Method listings for every family.
