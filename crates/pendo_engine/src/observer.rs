//! Observer interface for per-attempt and end-of-run reporting
//!
//! The engine knows nothing about how events are rendered or persisted.
//! Terminal output and the session record both plug in here.

use crate::metrics::RunSummary;
use chrono::{DateTime, Utc};

/// One attempt, as reported to observers.
#[derive(Debug, Clone, Copy)]
pub struct AttemptEvent<'a> {
    /// 1-based attempt number
    pub seq: u64,
    pub username: &'a str,
    pub password: &'a str,
    pub success: bool,
    pub target_mode: &'a str,
    pub at: DateTime<Utc>,
}

/// Receives attempt events during a run and the final summary after it.
pub trait AttemptObserver {
    fn on_attempt(&mut self, _event: &AttemptEvent<'_>) {}

    /// Called exactly once per run, including interrupted runs.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {}

/// Fan-out to several observers in registration order.
#[derive(Default)]
pub struct ObserverSet<'a> {
    observers: Vec<&'a mut dyn AttemptObserver>,
}

impl<'a> ObserverSet<'a> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn with(mut self, observer: &'a mut dyn AttemptObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl AttemptObserver for ObserverSet<'_> {
    fn on_attempt(&mut self, event: &AttemptEvent<'_>) {
        for observer in self.observers.iter_mut() {
            observer.on_attempt(event);
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        for observer in self.observers.iter_mut() {
            observer.on_run_end(summary);
        }
    }
}
