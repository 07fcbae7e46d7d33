//! Attempt strategies keyed by target mode
//!
//! `simulation` compares against the hidden answer. Every other mode is a
//! placeholder: no protocol is implemented and attempts always fail.

use tracing::warn;

/// Target mode handled by [`SimulationStrategy`].
pub const SIMULATION_MODE: &str = "simulation";

/// One credential pair under test, plus the hidden answer it is judged by.
#[derive(Debug, Clone, Copy)]
pub struct Credential<'a> {
    pub username: &'a str,
    pub password: &'a str,
    /// Hidden answer; `None` when the candidate list was empty
    pub answer: Option<&'a str>,
}

/// Decides whether a single attempt succeeds.
pub trait AttemptStrategy: Send + Sync {
    /// Target mode this strategy serves
    fn mode(&self) -> &str;

    /// Check one credential. Must not block; pacing is the engine's job.
    fn check(&self, credential: &Credential<'_>) -> bool;
}

/// Exact string match against the hidden answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStrategy;

impl AttemptStrategy for SimulationStrategy {
    fn mode(&self) -> &str {
        SIMULATION_MODE
    }

    fn check(&self, credential: &Credential<'_>) -> bool {
        credential.answer == Some(credential.password)
    }
}

/// Placeholder for modes without an implementation (e.g. `http`, `ssh`).
#[derive(Debug, Clone)]
pub struct UnsupportedStrategy {
    mode: String,
}

impl UnsupportedStrategy {
    pub fn new(mode: impl Into<String>) -> Self {
        Self { mode: mode.into() }
    }
}

impl AttemptStrategy for UnsupportedStrategy {
    fn mode(&self) -> &str {
        &self.mode
    }

    fn check(&self, _credential: &Credential<'_>) -> bool {
        false
    }
}

/// Resolve the strategy for a target mode.
pub fn for_mode(mode: &str) -> Box<dyn AttemptStrategy> {
    if mode == SIMULATION_MODE {
        Box::new(SimulationStrategy)
    } else {
        warn!(
            target_mode = mode,
            "No connector for target mode; every attempt will fail"
        );
        Box::new(UnsupportedStrategy::new(mode))
    }
}
