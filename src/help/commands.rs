// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/help/commands.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides extended command-line help and usage examples for the
// harness options: family and method selection, budgets, verification and
// output.
//
// Tree Location:
// - src/help/commands.rs (command help and examples)
// - Depends on: none

/// Print extended help information with detailed descriptions
pub fn print_extended_help() {
    println!("COMMAND LINE OPTIONS:");
    println!("=====================");
    println!();

    println!("WORKLOAD:");
    println!("  -s, --stressor <FAMILY>    Workload family: dfp, prime, ipsec [default: dfp]");
    println!("  -m, --method <NAME>        Method within the family [default: all]");
    println!("  -i, --instances <COUNT>    Concurrent instances (0 = one per CPU) [default: 1]");
    println!("  --list-methods             List the methods of the selected family");
    println!();

    println!("BUDGETS:");
    println!("  -t, --timeout <SECS>       Wall clock budget (0 = none) [default: 10]");
    println!("  --ops <N>                  Stop each instance after N bogo ops (0 = none)");
    println!("  --unwind-grace <SECS>      Wait before forcing an unwind after timeout [default: 2]");
    println!();

    println!("VERIFICATION:");
    println!("  --verify                   Recompute every result on an independent path");
    println!("  --seed <SEED>              Seed for scratch initialisation [default: random]");
    println!();

    println!("CRYPTO JOBS:");
    println!("  --ipsec-jobs <N>           Jobs per call, 1..65536 [default: 128]");
    println!("  --ipsec-backend <NAME>     Only use one backend: serial, mb4, mb8, mb16");
    println!();

    println!("OUTPUT:");
    println!("  --metrics-json <PATH>      Write aggregated metrics as JSON");
    println!("  --log-level <LEVEL>        error, warn, info, debug, trace [default: info]");
    println!("  -h, --help                 Show this help message");
    println!("  -V, --version              Show version information");
}

/// Get practical command examples
pub fn get_command_examples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Every floating point method, verified", "numstress --stressor dfp --verify --timeout 30"),
        ("Decimal multiply on every CPU", "numstress --stressor dfp --method df128mul --instances 0"),
        ("Prime search with an op budget", "numstress --stressor prime --method pwr10 --ops 200 --timeout 0"),
        ("SHA3 jobs on the widest backend", "numstress --stressor ipsec --method sha3 --ipsec-backend mb16"),
        ("Save metrics for later comparison", "numstress --stressor ipsec --timeout 20 --metrics-json ipsec.json"),
    ]
}

/// Print command examples with descriptions
pub fn print_command_examples() {
    println!("USAGE EXAMPLES:");
    println!("===============");
    println!();

    for (description, command) in get_command_examples() {
        println!("{}:", description);
        println!("  {}", command);
        println!();
    }
}

// Changelog:
// - v1.1.0 (2026-10-19): Harness options replace mining and pool options.
// - v1.0.0 (2025-06-15): Initial command help implementation.
