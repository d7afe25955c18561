// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/help/mod.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the help module: extended option help, usage examples
// and method listings.
//
// Tree Location:
// - src/help/mod.rs (help module entry point)
// - Submodules: commands, methods

pub mod commands;
pub mod methods;

pub use commands::{get_command_examples, print_command_examples, print_extended_help};
pub use methods::{method_rows, print_method_list};

/// Display comprehensive help information
pub fn display_full_help() {
    println!("🧪 numstress - Compute Workload Harness");
    println!("=======================================");
    println!();

    commands::print_extended_help();
    println!();

    commands::print_command_examples();
}

/// Display quick help summary
pub fn display_quick_help() {
    println!("🧪 numstress - Quick Help");
    println!("=========================");
    println!();
    println!("RUN A METHOD:");
    println!("  numstress --stressor dfp --method fp64mul --timeout 10 --verify");
    println!();
    println!("LIST METHODS:");
    println!("  numstress --stressor prime --list-methods");
    println!();
    println!("Use --help for detailed options.");
}

// Changelog:
// - v1.1.0 (2026-10-19): Help reworked for the workload harness; method
//   listings replace the mining and benchmark sections.
// - v1.0.0 (2025-06-15): Initial help module creation.
