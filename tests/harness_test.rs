// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/harness_test.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains integration tests for the harness contract: fan-out
// short-circuit on verification failure, method name rejection before any
// scratch is acquired, op budgets, rate aggregation and JSON metrics output.
//
// Tree Location:
// - tests/harness_test.rs (harness tests)
// - Depends on: numstress, tempfile, serde_json

#[cfg(test)]
mod tests {
    use numstress::core::{Category, CancelToken, Family, StressContext, StressError, Variant};
    use numstress::harness::engine::{Engine, Outcome};
    use numstress::harness::metrics::{Metric, aggregate, weighted_harmonic_mean};
    use numstress::harness::registry::{MethodEntry, MethodTable};
    use numstress::harness::runner::{RunStatus, StressConfig, StressRunner, run_instance};
    use numstress::harness::scratch::{ResourceLedger, ScratchParams, Workload};
    use numstress::Result;
    use std::sync::{Arc, LazyLock};
    use tempfile::tempdir;

    /// Records which methods ran; method "b" never verifies.
    struct Recorder {
        calls: Vec<&'static str>,
    }

    fn record(scratch: &mut Recorder, name: &'static str, variant: Variant) -> Result<f64> {
        if variant == Variant::Primary {
            scratch.calls.push(name);
        }
        Ok(0.001)
    }

    fn a(_: &mut StressContext, s: &mut Recorder, v: Variant) -> Result<f64> {
        record(s, "a", v)
    }

    fn b(_: &mut StressContext, s: &mut Recorder, v: Variant) -> Result<f64> {
        record(s, "b", v)
    }

    fn c(_: &mut StressContext, s: &mut Recorder, v: Variant) -> Result<f64> {
        record(s, "c", v)
    }

    static RECORDER_METHODS: LazyLock<MethodTable<Recorder>> = LazyLock::new(|| {
        MethodTable::new(
            "recorder",
            "all recorder methods",
            vec![
                MethodEntry::new("a", "method a", Category::Binary64, a),
                MethodEntry::new("b", "method b", Category::Binary64, b),
                MethodEntry::new("c", "method c", Category::Binary64, c),
            ],
        )
    });

    impl Workload for Recorder {
        const LABEL: &'static str = "recorder";
        const RATE_UNIT: &'static str = "calls per sec";

        fn methods() -> &'static MethodTable<Self> {
            &RECORDER_METHODS
        }

        fn acquire(_params: &ScratchParams) -> Result<Self> {
            Ok(Self { calls: Vec::new() })
        }

        fn ops_per_call(&self, _entry: &MethodEntry<Self>) -> f64 {
            1.0
        }

        fn verify(&self, _index: usize, entry: &MethodEntry<Self>) -> Result<()> {
            if entry.name == "b" {
                return Err(StressError::Verification {
                    method: entry.name,
                    element: 0,
                    expected: "1".to_string(),
                    got: "2".to_string(),
                });
            }
            Ok(())
        }
    }

    /// Replica pass is cut short by an interrupt and leaves a different
    /// result behind than the primary.
    struct Interrupted {
        primary: u64,
        replica: u64,
    }

    fn interrupted_in_replica(ctx: &mut StressContext, s: &mut Interrupted, v: Variant) -> Result<f64> {
        match v {
            Variant::Primary => s.primary = 42,
            Variant::Replica => {
                s.replica = 7;
                ctx.cancel().request_stop();
            }
        }
        Ok(0.001)
    }

    static INTERRUPTED_METHODS: LazyLock<MethodTable<Interrupted>> = LazyLock::new(|| {
        MethodTable::new(
            "interrupted",
            "all interrupted methods",
            vec![MethodEntry::new("halt", "halts in replica", Category::Binary64, interrupted_in_replica)],
        )
    });

    impl Workload for Interrupted {
        const LABEL: &'static str = "interrupted";
        const RATE_UNIT: &'static str = "calls per sec";

        fn methods() -> &'static MethodTable<Self> {
            &INTERRUPTED_METHODS
        }

        fn acquire(_params: &ScratchParams) -> Result<Self> {
            Ok(Self { primary: 0, replica: 0 })
        }

        fn ops_per_call(&self, _entry: &MethodEntry<Self>) -> f64 {
            1.0
        }

        fn verify(&self, _index: usize, entry: &MethodEntry<Self>) -> Result<()> {
            if self.primary != self.replica {
                return Err(StressError::Verification {
                    method: entry.name,
                    element: 0,
                    expected: self.primary.to_string(),
                    got: self.replica.to_string(),
                });
            }
            Ok(())
        }
    }

    fn context(max_ops: u64) -> StressContext {
        StressContext::new("test", 0, Arc::new(CancelToken::new()), max_ops)
    }

    #[test]
    fn test_fan_out_stops_at_first_failure() {
        let mut scratch = Recorder::acquire(&ScratchParams::with_seed(0)).unwrap();
        let mut ctx = context(0);
        let mut engine = Engine::<Recorder>::new(true);

        let err = engine.run_once(&mut ctx, &mut scratch, 0).unwrap_err();
        assert_eq!(err.method(), Some("b"), "failure should name method b, got {}", err);
        assert_eq!(scratch.calls, vec!["a", "b"], "c must not run after b fails");
        assert_eq!(ctx.bogo_ops(), 1, "only a completed");
    }

    #[test]
    fn test_fan_out_without_verification_runs_everything() {
        let mut scratch = Recorder::acquire(&ScratchParams::with_seed(0)).unwrap();
        let mut ctx = context(0);
        let mut engine = Engine::<Recorder>::new(false);

        assert!(engine.run_once(&mut ctx, &mut scratch, 0).is_ok());
        assert_eq!(scratch.calls, vec!["a", "b", "c"]);
        assert_eq!(engine.stats()[2].ops, 1.0, "b counted one op");
    }

    #[test]
    fn test_stop_during_replica_skips_verification() {
        // Direct call and through the fan-out entry
        for index in [1, 0] {
            let mut scratch = Interrupted::acquire(&ScratchParams::with_seed(0)).unwrap();
            let mut ctx = context(0);
            let mut engine = Engine::<Interrupted>::new(true);

            let outcome = engine.run_once(&mut ctx, &mut scratch, index);
            assert!(
                matches!(outcome, Ok(Outcome::Cancelled)),
                "index {}: a truncated replica must not be verified, got {:?}",
                index,
                outcome
            );
            assert_ne!(scratch.primary, scratch.replica, "replica really diverged");
            assert_eq!(ctx.bogo_ops(), 0, "cancelled call is not a completed bogo op");
        }
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let err = Family::Dfp.resolve_method("fp128add").unwrap_err();
        match &err {
            StressError::Configuration { name, valid, .. } => {
                assert_eq!(name, "fp128add");
                assert_eq!(valid[0], "all", "fan-out entry is listed first");
                assert!(valid.contains(&"df128div"), "valid names: {:?}", valid);
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert!(err.to_string().contains("allowed options are: all df32add"), "message: {}", err);
    }

    #[test]
    fn test_unknown_index_acquires_nothing() {
        let config = StressConfig::new(Family::Dfp, 42);
        let ledger = ResourceLedger::new();
        let mut ctx = context(0);

        let result = run_instance::<Recorder>(&config, &mut ctx, &ledger, None);
        assert!(matches!(result, Err(StressError::Configuration { .. })), "got {:?}", result.map(|r| r.status));
        assert_eq!(ledger.acquired(), 0, "no scratch may be acquired for an unknown method");
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_op_budget_stops_every_instance() {
        let mut config = StressConfig::new(Family::Dfp, Family::Dfp.resolve_method("fp32add").unwrap());
        config.instances = 2;
        config.max_ops = 10;
        config.verify = true;

        let report = StressRunner::new(config).run().unwrap();
        assert!(report.is_success(), "failures: {:?}", report.failures);
        assert_eq!(report.instances.len(), 2);
        for instance in &report.instances {
            assert_eq!(instance.bogo_ops, 10, "instance {} overran its budget", instance.instance);
            assert_eq!(instance.status, RunStatus::Completed);
        }
        assert_eq!(report.total_bogo_ops(), 20);
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].samples, 2, "one sample per instance");
    }

    #[test]
    fn test_prime_op_budget_with_verification() {
        let mut config = StressConfig::new(Family::Prime, Family::Prime.resolve_method("inc").unwrap());
        config.max_ops = 25;
        config.verify = true;

        let report = StressRunner::new(config).run().unwrap();
        assert!(report.is_success(), "failures: {:?}", report.failures);
        assert_eq!(report.total_bogo_ops(), 25);
        assert_eq!(report.metrics[0].label, "primes per sec, incrementing start");
    }

    #[test]
    fn test_harmonic_aggregation() {
        let merged = weighted_harmonic_mean(&[(100.0, 1.0), (50.0, 10.0)]).unwrap();
        assert!((merged - 52.38).abs() < 0.01, "expected about 52.38 ops/s, got {}", merged);

        let first = vec![Metric::harmonic("x per sec, x", 100.0, 1.0)];
        let second = vec![Metric::harmonic("x per sec, x", 50.0, 10.0)];
        let across = aggregate([first.as_slice(), second.as_slice()]);
        assert_eq!(across.len(), 1);
        assert!(
            (across[0].rate - 52.38).abs() < 0.01,
            "instances merge weighted by duration, got {}",
            across[0].rate
        );
    }

    #[test]
    fn test_metrics_json_output() {
        let mut config = StressConfig::new(Family::Ipsec, Family::Ipsec.resolve_method("sha3").unwrap());
        config.max_ops = 2;
        config.ipsec_jobs = 4;
        config.ipsec_backend = Some(0);

        let report = StressRunner::new(config).run().unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["family"], "ipsec");
        assert_eq!(json["method"], "sha3");
        let labels: Vec<&str> = json["metrics"]
            .as_array()
            .expect("metrics array")
            .iter()
            .filter_map(|m| m["label"].as_str())
            .collect();
        assert!(labels.contains(&"jobs per sec, SHA3-256"), "labels: {:?}", labels);
        assert!(labels.contains(&"serial bogo ops per sec"), "labels: {:?}", labels);
        assert_eq!(json["metrics"][0]["kind"], "harmonic_mean");
    }
}

// Changelog:
// - v1.0.1 (2026-10-19): Stop during the replica pass skips verification;
//   duration weighted aggregation.
// - v1.0.0 (2026-10-19): Initial tests.
