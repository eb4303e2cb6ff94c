//! # Progress — Shared Sweep Counters
//!
//! Counters shared between the rayon workers of a suite and a background
//! status reporter. `tested` and `mismatches` are lock-free atomics updated
//! per candidate; `current` is a mutex-guarded label updated once per block.
//!
//! The reporter thread logs a status line every interval until [`Progress::stop`]
//! is called.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Default interval between status lines.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(30);

pub struct Progress {
    pub tested: AtomicU64,
    pub mismatches: AtomicU64,
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            mismatches: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn set_current(&self, label: impl Into<String>) {
        if let Ok(mut current) = self.current.lock() {
            *current = label.into();
        }
    }

    /// Candidates per second since creation (0 during the first second).
    pub fn rate(&self) -> f64 {
        let elapsed = self.start.elapsed();
        if elapsed.as_secs() > 0 {
            self.tested.load(Ordering::Relaxed) as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || {
            let tick = interval.clamp(Duration::from_millis(1), Duration::from_millis(100));
            let mut waited = Duration::ZERO;
            while !progress.shutdown.load(Ordering::Relaxed) {
                thread::sleep(tick);
                waited += tick;
                if waited >= interval {
                    waited = Duration::ZERO;
                    progress.print_status();
                }
            }
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let current = self.current.lock().map(|c| c.clone()).unwrap_or_default();
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested = self.tested.load(Ordering::Relaxed),
            rate = format_args!("{:.2}", self.rate()),
            mismatches = self.mismatches.load(Ordering::Relaxed),
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "sweep progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
