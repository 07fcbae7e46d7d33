//! Attempt counters and run statistics

use serde::{Deserialize, Serialize};

/// Floor for the duration used in rate calculations (seconds)
pub const MIN_RATE_DURATION_SECS: f64 = 0.01;

/// Counters for a single run.
///
/// `successes + failures == total` holds after every call to [`record`].
///
/// [`record`]: AttemptCounters::record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptCounters {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
}

impl AttemptCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt outcome
    pub fn record(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    /// Freeze the counters with the elapsed time of the run
    pub fn summarize(&self, elapsed_secs: f64) -> RunSummary {
        RunSummary {
            total: self.total,
            successes: self.successes,
            failures: self.failures,
            elapsed_secs,
        }
    }
}

/// Final statistics of a run, reported on success, exhaustion and interruption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: u64,
    pub successes: u64,
    pub failures: u64,
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Attempts per second, with the duration floored at 10ms
    pub fn attempts_per_second(&self) -> f64 {
        self.total as f64 / self.elapsed_secs.max(MIN_RATE_DURATION_SECS)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Whether any attempt succeeded
    pub success: bool,
    /// The password that matched, if any
    pub password: Option<String>,
    /// Attempts made, including the successful one
    pub attempts: u64,
    /// Seconds from the start of the run to success or exhaustion
    pub elapsed_secs: f64,
}
