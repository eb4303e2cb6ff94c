//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the execution
//! logic for each subcommand and rayon configuration. Reports go to stdout as
//! JSON; logs go to stderr.

use anyhow::{anyhow, bail, Result};
use rug::Integer;
use serde::Serialize;
use shunia::harness::{self, HarnessConfig, SuiteReport};
use shunia::{estimate_digits, primality};
use std::path::Path;
use tracing::{info, warn};

use super::Cli;

/// Harness settings implied by the global flags alone.
fn base_config(cli: &Cli) -> HarnessConfig {
    HarnessConfig {
        aux_check: cli.aux.unwrap_or_default(),
        ring_check: cli.ring.unwrap_or_default(),
        log_every_result: cli.log_all,
        ..HarnessConfig::default()
    }
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn finish_suite(report: &SuiteReport) -> Result<()> {
    print_report(report)?;
    if !report.passed() {
        bail!(
            "suite '{}' failed with {} mismatch(es)",
            report.name,
            report.mismatches.len() as u64 + report.earlier_mismatches
        );
    }
    Ok(())
}

// ── Spot Checks ─────────────────────────────────────────────────

/// Test each argument and print its verdict. All arguments are parsed before
/// any is tested.
pub fn run_check(cli: &Cli, numbers: &[String], json: bool) -> Result<()> {
    let aux = cli.aux.unwrap_or_default();
    let ring = cli.ring.unwrap_or_default();
    let values = numbers
        .iter()
        .map(|raw| {
            Integer::parse(raw.trim())
                .map(Integer::from)
                .map_err(|e| anyhow!("invalid integer '{}': {}", raw, e))
        })
        .collect::<Result<Vec<_>>>()?;

    for n in &values {
        let verdict = primality::check(n, aux, ring)?;
        if cli.log_all {
            info!(n = %n, verdict = %verdict, "primality result");
        }
        if json {
            let line = serde_json::json!({
                "n": n.to_string(),
                "digits": estimate_digits(n),
                "aux_check": aux,
                "ring_check": ring,
                "probable_prime": verdict.is_probable_prime(),
                "verdict": verdict.to_string(),
            });
            println!("{}", line);
        } else {
            println!("{}: {}", n, verdict);
        }
    }
    Ok(())
}

// ── Suites ──────────────────────────────────────────────────────

pub fn run_file(cli: &Cli, path: &Path, expect_prime: bool, count: usize) -> Result<()> {
    let cfg = HarnessConfig {
        max_per_file: count,
        ..base_config(cli)
    };
    let report = harness::run_with_progress(|progress| {
        harness::run_file_suite(path, expect_prime, &cfg, progress)
    })?;
    finish_suite(&report)
}

pub fn run_range(
    cli: &Cli,
    start: u64,
    end: u64,
    checkpoint: Option<&Path>,
    block_size: usize,
) -> Result<()> {
    let cfg = HarnessConfig {
        run_file_tests: false,
        run_exhaustive_range_test: true,
        range_start: start,
        range_end: end,
        block_size,
        ..base_config(cli)
    };
    cfg.validate()?;
    info!(
        start,
        end,
        threads = rayon::current_num_threads(),
        aux_check = %cfg.aux_check,
        ring_check = %cfg.ring_check,
        "range sweep starting"
    );
    let report = harness::run_with_progress(|progress| {
        harness::run_range_suite(&cfg, progress, checkpoint)
    })?;
    finish_suite(&report)
}

/// Full run from a TOML config. Global flags override the file.
pub fn run_configured(cli: &Cli, config: Option<&Path>, checkpoint: &Path) -> Result<()> {
    let mut cfg = match config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(aux) = cli.aux {
        cfg.aux_check = aux;
    }
    if let Some(ring) = cli.ring {
        cfg.ring_check = ring;
    }
    if cli.log_all {
        cfg.log_every_result = true;
    }

    let report = harness::run_all(&cfg, Some(checkpoint))?;
    print_report(&report)?;
    if !report.passed() {
        bail!("validation run failed with {} mismatch(es)", report.mismatch_count());
    }
    info!(suites = report.suites.len(), "validation run passed");
    Ok(())
}

// ── Rayon Configuration ─────────────────────────────────────────

/// Configure the rayon global thread pool size (`None` or 0 = all cores).
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
