// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/workloads_test.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains integration tests for the workload families. It checks
// that seeded arithmetic returns to its start without drift and that every
// concrete method of every family verifies against its replica path.
//
// Tree Location:
// - tests/workloads_test.rs (workload family tests)
// - Depends on: numstress

#[cfg(test)]
mod tests {
    use numstress::core::{CancelToken, StressContext, Variant};
    use numstress::harness::engine::{Engine, Outcome};
    use numstress::harness::scratch::{ScratchParams, Workload};
    use numstress::workloads::dfp::{DfpScratch, Element, Lane};
    use numstress::workloads::ipsec::IpsecScratch;
    use numstress::workloads::prime::PrimeScratch;
    use std::sync::Arc;

    fn context(name: &str) -> StressContext {
        StressContext::new(name, 0, Arc::new(CancelToken::new()), 0)
    }

    /// Runs every concrete method `rounds` times with verification on.
    fn verify_all_methods<W: Workload>(scratch: &mut W, rounds: usize) {
        let mut ctx = context(W::LABEL);
        let mut engine = Engine::<W>::new(true);
        let table = W::methods();
        for index in 1..table.len() {
            for round in 0..rounds {
                let outcome = engine.run_once(&mut ctx, scratch, index);
                assert_eq!(
                    outcome,
                    Ok(Outcome::Completed),
                    "{} method {} failed in round {}",
                    W::LABEL,
                    table.entries()[index].name,
                    round
                );
            }
        }
        assert_eq!(ctx.bogo_ops() as usize, (table.len() - 1) * rounds, "one bogo op per verified call");
    }

    fn assert_returned<T: Element>(lane: &Lane<T>, width: &str, method: &str, element: usize) {
        let result = lane.result[Variant::Primary.index()];
        assert!(
            result.same_value(lane.init),
            "{} drifted after {} on element {}: {} != {}",
            width,
            method,
            element,
            result.render(),
            lane.init.render()
        );
    }

    #[test]
    fn test_dfp_pairs_return_to_start() {
        let mut scratch = DfpScratch::acquire(&ScratchParams::with_seed(0xdf9)).unwrap();
        let mut ctx = context("dfp");
        let mut engine = Engine::<DfpScratch>::new(false);

        for index in 1..DfpScratch::methods().len() {
            let name = DfpScratch::methods().entries()[index].name;
            assert_eq!(engine.run_once(&mut ctx, &mut scratch, index), Ok(Outcome::Completed));
            for (i, element) in scratch.elements().iter().enumerate() {
                assert_returned(&element.df32, "decimal32", name, i);
                assert_returned(&element.df64, "decimal64", name, i);
                assert_returned(&element.df128, "decimal128", name, i);
                assert_returned(&element.fp32, "binary32", name, i);
                assert_returned(&element.fp64, "binary64", name, i);
                assert_eq!(
                    element.fp64.result[0].bit_pattern(),
                    element.fp64.init.bit_pattern(),
                    "binary64 must return bit for bit"
                );
            }
        }
    }

    #[test]
    fn test_dfp_every_method_verifies() {
        let mut scratch = DfpScratch::acquire(&ScratchParams::with_seed(11)).unwrap();
        verify_all_methods(&mut scratch, 3);
    }

    #[test]
    fn test_dfp_fan_out_verifies() {
        let mut scratch = DfpScratch::acquire(&ScratchParams::with_seed(12)).unwrap();
        let mut ctx = context("dfp");
        let mut engine = Engine::<DfpScratch>::new(true);
        assert_eq!(engine.run_once(&mut ctx, &mut scratch, 0), Ok(Outcome::Completed));
        assert_eq!(ctx.bogo_ops(), 15, "fan-out runs each of the fifteen methods once");

        let metrics = engine.report();
        assert_eq!(metrics.len(), 15, "every method reports a rate");
        assert_eq!(metrics[0].label, "Mdfp-ops per sec, decimal32 add");
        assert!(metrics[0].label.starts_with("Mdfp-ops per sec, "), "label was {}", metrics[0].label);
    }

    #[test]
    fn test_prime_every_method_verifies() {
        let mut scratch = PrimeScratch::acquire(&ScratchParams::with_seed(0)).unwrap();
        verify_all_methods(&mut scratch, 6);

        let lane = scratch.lane(3).expect("pwr2 lane");
        assert_eq!(lane.primes, 6, "pwr2 found one prime per call");
        scratch.release(false);
    }

    #[test]
    fn test_ipsec_every_method_verifies() {
        let params = ScratchParams {
            seed: 99,
            jobs: 7,
            backend: None,
        };
        let mut scratch = IpsecScratch::acquire(&params).unwrap();
        verify_all_methods(&mut scratch, 2);

        assert_eq!(scratch.results(Variant::Primary).len(), 7 * 4, "jobs times backends outputs");
        let extra = scratch.extra_metrics();
        assert_eq!(extra.len(), 4, "one throughput metric per backend");
        assert_eq!(extra[0].label, "serial bogo ops per sec");
    }
}

// Changelog:
// - v1.0.1 (2026-10-19): Decimal32/64/128 widths in the dfp checks.
// - v1.0.0 (2026-10-19): Initial tests.
