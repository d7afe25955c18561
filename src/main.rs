// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/main.rs
// Version: 3.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the numstress binary. It parses options, sets up logging,
// runs the selected workload on blocking worker threads while the supervisor
// watches the time budget and Ctrl-C on the async runtime, then reports and
// optionally saves the aggregated metrics.
//
// Tree Location:
// - src/main.rs (binary entry point)
// - Depends on: numstress library, clap, log4rs, tokio, serde_json

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, error, info, warn};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use numstress::harness::runner::{RunReport, RunStatus, StressConfig};
use numstress::supervisor::SupervisorOutcome;
use numstress::utils::FormatUtils;
use numstress::{Args, StressError, StressRunner, Supervisor, help};
use std::path::Path;
use std::time::Duration;
use tokio::sync::oneshot;

const LOG_TARGET: &str = "numstress";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.examples {
        help::display_full_help();
        return Ok(());
    }
    if args.list_methods {
        help::print_method_list(args.stressor);
        return Ok(());
    }

    init_logging(&args.log_level)?;

    // Validate arguments
    let config = match args.validate().and_then(|()| args.to_config()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ Error: {}", err);
            if matches!(err, StressError::Configuration { .. }) {
                help::display_quick_help();
            }
            std::process::exit(1);
        }
    };

    log_config(&config);

    let runner = StressRunner::new(config.clone());
    let supervisor = Supervisor::new(runner.tokens(), config.timeout, config.unwind_grace);
    let (done_tx, done_rx) = oneshot::channel();
    let supervision = tokio::spawn(supervisor.run(done_rx));

    let started = std::time::Instant::now();
    let result = tokio::task::spawn_blocking(move || runner.run())
        .await
        .context("harness task failed")?;
    let _ = done_tx.send(());
    let outcome = supervision.await.context("supervisor task failed")?;

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            error!(target: LOG_TARGET, "❌ {}", err);
            std::process::exit(2);
        }
    };

    log_report(&report, &outcome, started.elapsed());

    if let Some(path) = &args.metrics_json {
        write_metrics(path, &report)?;
        info!(target: LOG_TARGET, "💾 Metrics written to {}", path.display());
    }

    if !report.is_success() {
        std::process::exit(2);
    }
    Ok(())
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let level: LevelFilter = level
        .parse()
        .with_context(|| format!("invalid log level '{}'", level))?;

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .context("invalid logging configuration")?;
    log4rs::init_config(config).context("failed to install logger")?;
    Ok(())
}

fn log_config(config: &StressConfig) {
    info!(target: LOG_TARGET, "🚀 numstress v{}", env!("CARGO_PKG_VERSION"));
    info!(target: LOG_TARGET, "🧪 Stressor: {} (method: {})", config.family.as_str(), config.method_name());
    info!(target: LOG_TARGET, "🧵 Instances: {}", config.instances);
    match config.timeout {
        Some(timeout) => info!(target: LOG_TARGET, "⏱️ Timeout: {}s", timeout.as_secs()),
        None => info!(target: LOG_TARGET, "⏱️ Timeout: none"),
    }
    if config.max_ops > 0 {
        info!(target: LOG_TARGET, "🎯 Op budget: {} per instance", config.max_ops);
    }
    info!(target: LOG_TARGET, "🔍 Verification: {}", if config.verify { "on" } else { "off" });
    info!(target: LOG_TARGET, "🌱 Seed: {:#018x}", config.seed);
}

fn log_report(report: &RunReport, outcome: &SupervisorOutcome, elapsed: Duration) {
    info!(target: LOG_TARGET, "📊 Run complete after {}", FormatUtils::format_duration(elapsed));
    if outcome.timed_out {
        info!(target: LOG_TARGET, "⏱️ Stopped by the time budget");
    }
    if outcome.interrupts > 0 {
        info!(target: LOG_TARGET, "🛑 Interrupted {} time(s)", outcome.interrupts);
    }

    for instance in &report.instances {
        let note = match instance.status {
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Unwound => "forced unwind",
        };
        let rate = if instance.elapsed > 0.0 { instance.bogo_ops as f64 / instance.elapsed } else { 0.0 };
        info!(target: LOG_TARGET,
            "   instance {}: {} bogo ops in {:.2}s, {} ({})",
            instance.instance,
            FormatUtils::format_number(instance.bogo_ops),
            instance.elapsed,
            FormatUtils::format_rate(rate, "ops/s"),
            note
        );
    }
    for failure in &report.failures {
        error!(target: LOG_TARGET, "❌ instance {}: {}", failure.instance, failure.message);
    }

    if report.metrics.is_empty() {
        warn!(target: LOG_TARGET, "No method ran long enough to report a rate");
    }
    for metric in &report.metrics {
        info!(target: LOG_TARGET,
            "⚡ {:>14.3} {} (harmonic mean of {})",
            metric.rate,
            metric.label,
            metric.samples
        );
    }
    info!(target: LOG_TARGET, "📈 Total bogo ops: {}", report.total_bogo_ops());
}

fn write_metrics(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialise metrics")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// Changelog:
// - v3.0.0 (2026-10-19): Reworked into the numstress harness binary.
//   - Mining and benchmark modes replaced by one supervised harness run.
//   - log4rs console logging with the level taken from --log-level.
//   - Exit code 1 for configuration errors, 2 for failed instances.
// - v2.0.0: Feature-based mining modes.
