//! # Harness — Verdict Validation Suites
//!
//! Drives the layered test over large candidate sets and compares every
//! verdict against an expected value:
//!
//! - **File suites**: every integer in a list file is expected to be prime
//!   (e.g. all primes below 10^7) or composite (e.g. base-2 pseudoprimes).
//! - **Range suite**: every odd `n` in `[range_start, range_end)`, with the
//!   expected verdict from [`reference::is_prime_expected`]. Progress is
//!   checkpointed after each block so long sweeps can resume.
//!
//! Candidates within a block are tested in parallel with rayon; mismatches
//! are reported in input order. What runs is decided by [`HarnessConfig`],
//! loaded from TOML.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::checkpoint::{self, Checkpoint};
use crate::corpus;
use crate::primality::{is_probable_prime_with, AuxCheck, RingCheck};
use crate::progress::{Progress, REPORT_INTERVAL};
use crate::reference;

/// Which suites run and how verdicts are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub run_file_tests: bool,
    pub run_exhaustive_range_test: bool,
    pub log_every_result: bool,
    /// Composites that must be rejected.
    pub pseudoprimes: Option<PathBuf>,
    /// Primes that must be accepted.
    pub primes: Option<PathBuf>,
    pub range_start: u64,
    /// Exclusive.
    pub range_end: u64,
    /// Cap on integers read per file (0 = all).
    pub max_per_file: usize,
    /// Candidates per parallel block (and per checkpoint in range sweeps).
    pub block_size: usize,
    pub aux_check: AuxCheck,
    pub ring_check: RingCheck,
    pub stop_on_mismatch: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            run_file_tests: true,
            run_exhaustive_range_test: false,
            log_every_result: false,
            pseudoprimes: Some(PathBuf::from("perrin_mr2_pseudoprimes.txt")),
            primes: Some(PathBuf::from("primes.txt")),
            range_start: 5,
            range_end: 1 << 32,
            max_per_file: 0,
            block_size: 10_000,
            aux_check: AuxCheck::default(),
            ring_check: RingCheck::default(),
            stop_on_mismatch: true,
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: HarnessConfig =
            toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.range_start > self.range_end {
            bail!(
                "range_start ({}) exceeds range_end ({})",
                self.range_start,
                self.range_end
            );
        }
        if self.block_size == 0 {
            bail!("block_size must be positive");
        }
        if self.run_file_tests && self.primes.is_none() && self.pseudoprimes.is_none() {
            bail!("run_file_tests is set but neither `primes` nor `pseudoprimes` is configured");
        }
        Ok(())
    }
}

/// A candidate whose verdict disagreed with the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub n: String,
    pub verdict: bool,
    pub expected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub tested: u64,
    pub mismatches: Vec<Mismatch>,
    /// Mismatches recorded by an earlier, resumed run of this suite.
    pub earlier_mismatches: u64,
    /// False when the suite stopped early on a mismatch.
    pub completed: bool,
    pub elapsed_secs: f64,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty() && self.earlier_mismatches == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub aux_check: AuxCheck,
    pub ring_check: RingCheck,
    pub suites: Vec<SuiteReport>,
    pub elapsed_secs: f64,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::passed)
    }

    pub fn mismatch_count(&self) -> u64 {
        self.suites
            .iter()
            .map(|s| s.mismatches.len() as u64 + s.earlier_mismatches)
            .sum()
    }
}

/// Test one candidate; a verdict different from `expected` is an error, as
/// is an arithmetic failure inside the test.
pub fn run_primality_test(
    n: &Integer,
    expected: bool,
    aux: AuxCheck,
    ring: RingCheck,
    log_every_result: bool,
) -> Result<bool> {
    let verdict = is_probable_prime_with(n, aux, ring)
        .with_context(|| format!("testing N={}", n))?;
    if log_every_result {
        info!(n = %n, verdict, expected, "primality result");
    }
    if verdict != expected {
        return Err(anyhow!(
            "expected verdict '{}' but found '{}' for N={}",
            expected,
            verdict,
            n
        ));
    }
    Ok(verdict)
}

/// Test a block in parallel, returning mismatches in input order.
fn test_block<F>(
    candidates: &[Integer],
    expected: F,
    cfg: &HarnessConfig,
    progress: &Progress,
) -> Vec<Mismatch>
where
    F: Fn(&Integer) -> bool + Sync,
{
    candidates
        .par_iter()
        .filter_map(|n| {
            let want = expected(n);
            let result =
                run_primality_test(n, want, cfg.aux_check, cfg.ring_check, cfg.log_every_result);
            progress.tested.fetch_add(1, Ordering::Relaxed);
            match result {
                Ok(_) => None,
                Err(e) => {
                    error!(error = %e, "verdict mismatch");
                    progress.mismatches.fetch_add(1, Ordering::Relaxed);
                    Some(Mismatch {
                        n: n.to_string(),
                        verdict: !want,
                        expected: want,
                    })
                }
            }
        })
        .collect()
}

/// Check every candidate against one fixed expectation.
pub fn run_candidates(
    name: &str,
    candidates: &[Integer],
    expected: bool,
    cfg: &HarnessConfig,
    progress: &Progress,
) -> Result<SuiteReport> {
    if cfg.block_size == 0 {
        bail!("block_size must be positive");
    }
    let start = Instant::now();
    let mut tested = 0u64;
    let mut mismatches = Vec::new();
    let mut completed = true;

    for block in candidates.chunks(cfg.block_size) {
        progress.set_current(format!("{} from N={}", name, block[0]));
        mismatches.extend(test_block(block, |_| expected, cfg, progress));
        tested += block.len() as u64;
        if cfg.stop_on_mismatch && !mismatches.is_empty() {
            completed = tested == candidates.len() as u64;
            break;
        }
    }

    let report = SuiteReport {
        name: name.to_string(),
        tested,
        mismatches,
        earlier_mismatches: 0,
        completed,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    log_suite(&report);
    Ok(report)
}

/// Every integer in `path` must get the verdict `expected`.
pub fn run_file_suite(
    path: &Path,
    expected: bool,
    cfg: &HarnessConfig,
    progress: &Progress,
) -> Result<SuiteReport> {
    let candidates = corpus::read_integers(path, cfg.max_per_file)?;
    let kind = if expected { "primes" } else { "composites" };
    info!(path = %path.display(), count = candidates.len(), kind, "file suite starting");
    let name = format!("{} ({})", path.display(), kind);
    run_candidates(&name, &candidates, expected, cfg, progress)
}

/// Sweep odd `n` in `[range_start, range_end)` against the reference oracle.
///
/// With a checkpoint path, state is saved after every clean block and a
/// matching checkpoint (same bounds and checks) is resumed from. The
/// checkpoint is cleared once the sweep completes.
pub fn run_range_suite(
    cfg: &HarnessConfig,
    progress: &Progress,
    checkpoint_path: Option<&Path>,
) -> Result<SuiteReport> {
    cfg.validate()?;
    let start = Instant::now();
    let end = cfg.range_end;
    let mut next = cfg.range_start | 1;
    let mut tested = 0u64;
    let mut earlier_mismatches = 0u64;

    if let Some(path) = checkpoint_path {
        if let Some(Checkpoint::Range {
            last_n,
            start: cp_start,
            end: cp_end,
            aux_check,
            ring_check,
            tested: cp_tested,
            mismatches: cp_mismatches,
        }) = checkpoint::load(path)
        {
            if cp_start == cfg.range_start
                && cp_end == end
                && aux_check == cfg.aux_check
                && ring_check == cfg.ring_check
                && last_n >= next
                && last_n < end
            {
                info!(last_n, tested = cp_tested, "resuming range sweep");
                next = last_n + 2;
                tested = cp_tested;
                earlier_mismatches = cp_mismatches;
            }
        }
    }

    info!(from = next, end, "range suite starting");
    let mut mismatches = Vec::new();
    let mut completed = true;
    let block_size = cfg.block_size as u64;

    while next < end {
        let count = (end - next).div_ceil(2).min(block_size);
        let block: Vec<Integer> = (0..count).map(|i| Integer::from(next + 2 * i)).collect();
        let last_n = next + 2 * (count - 1);
        progress.set_current(format!("range [{}, {}]", next, last_n));

        let found = test_block(&block, reference::is_prime_expected, cfg, progress);
        tested += count;
        let block_clean = found.is_empty();
        mismatches.extend(found);

        if cfg.stop_on_mismatch && !block_clean {
            completed = last_n + 2 >= end;
            break;
        }
        if let Some(path) = checkpoint_path {
            checkpoint::save(
                path,
                &Checkpoint::Range {
                    last_n,
                    start: cfg.range_start,
                    end,
                    aux_check: cfg.aux_check,
                    ring_check: cfg.ring_check,
                    tested,
                    mismatches: earlier_mismatches + mismatches.len() as u64,
                },
            )
            .with_context(|| format!("saving checkpoint {}", path.display()))?;
        }
        next = last_n + 2;
    }

    if completed {
        if let Some(path) = checkpoint_path {
            checkpoint::clear(path);
        }
    }

    let report = SuiteReport {
        name: format!("odd range [{}, {})", cfg.range_start, end),
        tested,
        mismatches,
        earlier_mismatches,
        completed,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    log_suite(&report);
    Ok(report)
}

fn log_suite(report: &SuiteReport) {
    info!(
        suite = %report.name,
        tested = report.tested,
        mismatches = report.mismatches.len(),
        completed = report.completed,
        elapsed = format_args!("{:.2}s", report.elapsed_secs),
        "suite finished"
    );
}

/// Run `f` with a live [`Progress`] and its status reporter, stopping the
/// reporter whether or not `f` succeeds.
pub fn run_with_progress<T>(f: impl FnOnce(&Progress) -> Result<T>) -> Result<T> {
    let progress: Arc<Progress> = Progress::new();
    let reporter = progress.start_reporter(REPORT_INTERVAL);
    let result = f(progress.as_ref());
    progress.stop();
    let _ = reporter.join();
    progress.print_status();
    result
}

/// Run every enabled suite: pseudoprimes, then primes, then the range sweep.
pub fn run_all(cfg: &HarnessConfig, checkpoint_path: Option<&Path>) -> Result<RunReport> {
    cfg.validate()?;
    let started_at = Utc::now();
    let start = Instant::now();
    info!(
        aux_check = %cfg.aux_check,
        ring_check = %cfg.ring_check,
        "validation run starting"
    );

    let suites = run_with_progress(|progress| {
        let mut suites: Vec<SuiteReport> = Vec::new();
        let halted = |suites: &[SuiteReport]| {
            cfg.stop_on_mismatch && suites.iter().any(|s| !s.passed())
        };

        if cfg.run_file_tests {
            let files = [(&cfg.pseudoprimes, false), (&cfg.primes, true)];
            for (path, expected) in files {
                if let Some(path) = path {
                    if halted(&suites) {
                        break;
                    }
                    suites.push(run_file_suite(path, expected, cfg, progress)?);
                }
            }
        }
        if cfg.run_exhaustive_range_test && !halted(&suites) {
            suites.push(run_range_suite(cfg, progress, checkpoint_path)?);
        }
        Ok(suites)
    })?;

    let report = RunReport {
        started_at,
        aux_check: cfg.aux_check,
        ring_check: cfg.ring_check,
        suites,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };
    info!(
        suites = report.suites.len(),
        mismatches = report.mismatch_count(),
        elapsed = format_args!("{:.2}s", report.elapsed_secs),
        "validation run finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_list(dir: &Path, name: &str, values: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        for v in values {
            writeln!(f, "{}", v).unwrap();
        }
        path
    }

    fn quiet_config() -> HarnessConfig {
        HarnessConfig {
            run_file_tests: false,
            pseudoprimes: None,
            primes: None,
            ..HarnessConfig::default()
        }
    }

    // ── Configuration ───────────────────────────────────────────────

    #[test]
    fn default_config_runs_file_suites_only() {
        let cfg = HarnessConfig::default();
        assert!(cfg.run_file_tests);
        assert!(!cfg.run_exhaustive_range_test);
        assert!(!cfg.log_every_result);
        assert_eq!(cfg.range_start, 5);
        assert_eq!(cfg.range_end, 4_294_967_296);
        assert_eq!(cfg.aux_check, AuxCheck::Power);
        assert_eq!(cfg.ring_check, RingCheck::Eval);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let cfg: HarnessConfig = toml::from_str(
            r#"
            run_exhaustive_range_test = true
            range_end = 100000
            aux_check = "gcd"
            ring_check = "coefficients"
            primes = "data/primes.txt"
            "#,
        )
        .unwrap();
        assert!(cfg.run_exhaustive_range_test);
        assert_eq!(cfg.range_end, 100_000);
        assert_eq!(cfg.range_start, 5);
        assert_eq!(cfg.aux_check, AuxCheck::Gcd);
        assert_eq!(cfg.ring_check, RingCheck::Coefficients);
        assert_eq!(cfg.primes, Some(PathBuf::from("data/primes.txt")));
        assert!(cfg.run_file_tests);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let cfg = HarnessConfig {
            range_start: 100,
            range_end: 10,
            ..quiet_config()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("range_start"), "{}", err);
    }

    #[test]
    fn validate_rejects_file_tests_without_files() {
        let cfg = HarnessConfig {
            run_file_tests: true,
            ..quiet_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.toml");
        fs::write(&path, "block_size = 0\n").unwrap();
        assert!(HarnessConfig::load(&path).is_err());

        fs::write(&path, "block_size = 64\nlog_every_result = true\n").unwrap();
        let cfg = HarnessConfig::load(&path).unwrap();
        assert_eq!(cfg.block_size, 64);
        assert!(cfg.log_every_result);
    }

    // ── Single candidate ────────────────────────────────────────────

    #[test]
    fn run_primality_test_reports_mismatch() {
        let n = Integer::from(341);
        assert!(!run_primality_test(&n, false, AuxCheck::Power, RingCheck::Eval, true).unwrap());
        let ring = RingCheck::Coefficients;
        let err = run_primality_test(&n, true, AuxCheck::Power, ring, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected verdict 'true' but found 'false' for N=341"
        );
    }

    // ── File suites ─────────────────────────────────────────────────

    #[test]
    fn file_suites_pass_for_correct_expectations() {
        let dir = tempfile::tempdir().unwrap();
        let primes = write_list(
            dir.path(),
            "primes.txt",
            &["2", "3", "97", "7919", "1000000007"],
        );
        let psp = write_list(dir.path(), "psp.txt", &["341", "561", "2047", "3215031751"]);
        let cfg = quiet_config();
        let progress = Progress::new();

        let report = run_file_suite(&primes, true, &cfg, &progress).unwrap();
        assert!(report.passed());
        assert_eq!(report.tested, 5);

        let report = run_file_suite(&psp, false, &cfg, &progress).unwrap();
        assert!(report.passed());
        assert!(report.completed);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 9);
    }

    #[test]
    fn file_suite_respects_max_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let primes = write_list(dir.path(), "primes.txt", &["5", "7", "11", "13"]);
        let cfg = HarnessConfig {
            max_per_file: 3,
            ..quiet_config()
        };
        let report = run_file_suite(&primes, true, &cfg, &Progress::new()).unwrap();
        assert_eq!(report.tested, 3);
    }

    #[test]
    fn mismatches_listed_in_input_order() {
        let candidates: Vec<Integer> = [9, 11, 15, 13, 21].into_iter().map(Integer::from).collect();
        let cfg = HarnessConfig {
            stop_on_mismatch: false,
            ..quiet_config()
        };
        let progress = Progress::new();
        let report = run_candidates("odd mix", &candidates, true, &cfg, &progress).unwrap();
        let ns: Vec<&str> = report.mismatches.iter().map(|m| m.n.as_str()).collect();
        assert_eq!(ns, vec!["9", "15", "21"]);
        assert!(report.mismatches.iter().all(|m| !m.verdict && m.expected));
        assert!(report.completed);
        assert!(!report.passed());
    }

    #[test]
    fn stop_on_mismatch_halts_after_block() {
        let candidates: Vec<Integer> = (0..10).map(|i| Integer::from(9 + 6 * i)).collect();
        let cfg = HarnessConfig {
            block_size: 2,
            ..quiet_config()
        };
        let progress = Progress::new();
        let report =
            run_candidates("multiples of three", &candidates, true, &cfg, &progress).unwrap();
        assert_eq!(report.tested, 2);
        assert_eq!(report.mismatches.len(), 2);
        assert!(!report.completed);
    }

    #[test]
    fn zero_block_size_is_rejected_by_candidate_and_file_suites() {
        let dir = tempfile::tempdir().unwrap();
        let primes = write_list(dir.path(), "primes.txt", &["5", "7"]);
        let candidates = vec![Integer::from(5), Integer::from(7)];
        let cfg = HarnessConfig {
            block_size: 0,
            ..quiet_config()
        };
        let progress = Progress::new();

        let err = run_candidates("tiny", &candidates, true, &cfg, &progress).unwrap_err();
        assert!(err.to_string().contains("block_size"), "{}", err);
        let err = run_file_suite(&primes, true, &cfg, &progress).unwrap_err();
        assert!(err.to_string().contains("block_size"), "{}", err);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn coefficient_ring_check_passes_file_suites() {
        let dir = tempfile::tempdir().unwrap();
        let primes = write_list(dir.path(), "primes.txt", &["97", "7919", "1000000007"]);
        let psp = write_list(dir.path(), "psp.txt", &["341", "561", "2047", "3215031751"]);
        let cfg = HarnessConfig {
            ring_check: RingCheck::Coefficients,
            ..quiet_config()
        };
        let progress = Progress::new();
        assert!(run_file_suite(&primes, true, &cfg, &progress).unwrap().passed());
        assert!(run_file_suite(&psp, false, &cfg, &progress).unwrap().passed());
    }

    // ── Range suite ─────────────────────────────────────────────────

    #[test]
    fn range_suite_small_sweep_matches_reference() {
        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 3001,
            block_size: 256,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), None).unwrap();
        assert!(report.passed(), "{:?}", report.mismatches);
        assert!(report.completed);
        // odd numbers 5, 7, ..., 2999
        assert_eq!(report.tested, 1498);
    }

    #[test]
    fn range_suite_even_start_rounds_up_to_odd() {
        let cfg = HarnessConfig {
            range_start: 10,
            range_end: 20,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), None).unwrap();
        // 11, 13, 15, 17, 19
        assert_eq!(report.tested, 5);
        assert!(report.passed());
    }

    #[test]
    fn range_suite_empty_range() {
        let cfg = HarnessConfig {
            range_start: 7,
            range_end: 7,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), None).unwrap();
        assert_eq!(report.tested, 0);
        assert!(report.completed);
    }

    #[test]
    fn range_suite_rejects_zero_block_size() {
        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 101,
            block_size: 0,
            ..quiet_config()
        };
        let progress = Progress::new();
        let err = run_range_suite(&cfg, &progress, None).unwrap_err();
        assert!(err.to_string().contains("block_size"), "{}", err);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn range_suite_with_coefficient_ring_check_matches_reference() {
        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 2001,
            block_size: 128,
            aux_check: AuxCheck::Gcd,
            ring_check: RingCheck::Coefficients,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), None).unwrap();
        assert!(report.passed(), "{:?}", report.mismatches);
        assert_eq!(report.tested, 998);
    }

    #[test]
    fn range_suite_checkpoints_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");
        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 1005,
            block_size: 100,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), Some(&path)).unwrap();
        assert_eq!(report.tested, 500);
        assert!(report.completed);
        assert!(checkpoint::load(&path).is_none(), "checkpoint should be cleared");
    }

    #[test]
    fn range_suite_resumes_from_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");
        checkpoint::save(
            &path,
            &Checkpoint::Range {
                last_n: 503,
                start: 5,
                end: 1005,
                aux_check: AuxCheck::Power,
                ring_check: RingCheck::Eval,
                tested: 250,
                mismatches: 0,
            },
        )
        .unwrap();

        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 1005,
            block_size: 100,
            ..quiet_config()
        };
        let progress = Progress::new();
        let report = run_range_suite(&cfg, &progress, Some(&path)).unwrap();
        // 250 from the checkpoint + 505..=1003 (250 more)
        assert_eq!(report.tested, 500);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 250);
        assert!(report.passed());
    }

    #[test]
    fn range_suite_ignores_checkpoint_for_other_ring_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");
        checkpoint::save(
            &path,
            &Checkpoint::Range {
                last_n: 503,
                start: 5,
                end: 1005,
                aux_check: AuxCheck::Power,
                ring_check: RingCheck::Coefficients,
                tested: 250,
                mismatches: 0,
            },
        )
        .unwrap();

        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 1005,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), Some(&path)).unwrap();
        assert_eq!(report.tested, 500);
    }

    #[test]
    fn range_suite_ignores_checkpoint_for_other_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");
        checkpoint::save(
            &path,
            &Checkpoint::Range {
                last_n: 503,
                start: 5,
                end: 9999,
                aux_check: AuxCheck::Power,
                ring_check: RingCheck::Eval,
                tested: 250,
                mismatches: 0,
            },
        )
        .unwrap();

        let cfg = HarnessConfig {
            range_start: 5,
            range_end: 1005,
            ..quiet_config()
        };
        let report = run_range_suite(&cfg, &Progress::new(), Some(&path)).unwrap();
        assert_eq!(report.tested, 500);
    }

    // ── Full run ────────────────────────────────────────────────────

    #[test]
    fn run_all_sequences_enabled_suites() {
        let dir = tempfile::tempdir().unwrap();
        let primes = write_list(dir.path(), "primes.txt", &["101", "103", "107"]);
        let psp = write_list(dir.path(), "psp.txt", &["1105", "1729"]);
        let cfg = HarnessConfig {
            run_file_tests: true,
            run_exhaustive_range_test: true,
            primes: Some(primes),
            pseudoprimes: Some(psp),
            range_start: 5,
            range_end: 501,
            ..HarnessConfig::default()
        };
        let report = run_all(&cfg, Some(&dir.path().join("run.checkpoint"))).unwrap();
        assert!(report.passed());
        assert_eq!(report.suites.len(), 3);
        assert_eq!(report.suites[0].tested, 2);
        assert_eq!(report.suites[1].tested, 3);
        assert_eq!(report.suites[2].tested, 248);
        assert_eq!(report.mismatch_count(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aux_check"], "power");
        assert_eq!(json["ring_check"], "eval");
        assert!(json["started_at"].is_string());
    }

    #[test]
    fn run_all_halts_after_failing_suite() {
        let dir = tempfile::tempdir().unwrap();
        // the prime 97 listed as a composite
        let psp = write_list(dir.path(), "psp.txt", &["97"]);
        let primes = write_list(dir.path(), "primes.txt", &["89"]);
        let cfg = HarnessConfig {
            run_exhaustive_range_test: true,
            primes: Some(primes),
            pseudoprimes: Some(psp),
            range_end: 101,
            ..HarnessConfig::default()
        };
        let report = run_all(&cfg, None).unwrap();
        assert!(!report.passed());
        assert_eq!(report.suites.len(), 1);
        assert_eq!(report.mismatch_count(), 1);
    }

    #[test]
    fn run_all_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HarnessConfig {
            primes: Some(dir.path().join("missing.txt")),
            pseudoprimes: None,
            ..HarnessConfig::default()
        };
        let err = run_all(&cfg, None).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.txt"));
    }
}
