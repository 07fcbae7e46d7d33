//! Attempt engine
//!
//! Owns the candidate list, the hidden answer and the counters for one run.
//! A run walks the candidates in order, pacing each attempt by a fixed delay,
//! and stops at the first success.

use crate::cancel::CancellationToken;
use crate::error::EngineError;
use crate::metrics::{AttemptCounters, RunResult, RunSummary};
use crate::observer::{AttemptEvent, AttemptObserver, NoopObserver};
use crate::strategy::{self, AttemptStrategy, Credential};
use crate::target::select_target;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use crate::strategy::SIMULATION_MODE;

/// Default pause before each attempt is evaluated (seconds)
pub const DEFAULT_DELAY_SECS: f64 = 0.5;

/// Configuration for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Username every candidate is paired with
    pub username: String,

    /// Strategy selector (`simulation`, or a placeholder such as `ssh`)
    pub target_mode: String,

    /// Simulated latency per attempt, seconds (>= 0)
    pub delay_secs: f64,
}

impl EngineConfig {
    /// Simulation mode with the default delay
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            target_mode: SIMULATION_MODE.to_string(),
            delay_secs: DEFAULT_DELAY_SECS,
        }
    }

    pub fn with_target_mode(mut self, mode: impl Into<String>) -> Self {
        self.target_mode = mode.into();
        self
    }

    pub fn with_delay_secs(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    /// No pacing at all; used by tests and `--delay 0`
    pub fn without_delay(self) -> Self {
        self.with_delay_secs(0.0)
    }

    /// Reject a blank username or a delay that is not a representable `Duration`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.username.trim().is_empty() {
            return Err(EngineError::invalid_config("username cannot be empty"));
        }
        self.delay().map(|_| ())
    }

    /// The per-attempt pause. Negative, non-finite and overflowing values are errors.
    pub fn delay(&self) -> Result<Duration, EngineError> {
        Duration::try_from_secs_f64(self.delay_secs).map_err(|e| {
            EngineError::invalid_config(format!(
                "delay must be a non-negative number of seconds, got {} ({})",
                self.delay_secs, e
            ))
        })
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Running,
    Succeeded,
    Exhausted,
    Interrupted,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::NotStarted => "not_started",
            RunState::Running => "running",
            RunState::Succeeded => "succeeded",
            RunState::Exhausted => "exhausted",
            RunState::Interrupted => "interrupted",
        }
    }

    /// Whether the run has finished, in any way
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Exhausted | RunState::Interrupted
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the attempt loop ended
enum LoopExit {
    Matched(usize),
    Exhausted,
    Interrupted,
}

/// Drives one simulated brute-force run.
pub struct AttemptEngine {
    config: EngineConfig,
    candidates: Vec<String>,
    answer: Option<String>,
    strategy: Box<dyn AttemptStrategy>,
    delay: Duration,
    counters: AttemptCounters,
    state: RunState,
    summary: Option<RunSummary>,
}

impl AttemptEngine {
    /// Build an engine, drawing the hidden answer with the thread-local RNG.
    pub fn new(config: EngineConfig, candidates: Vec<String>) -> Result<Self, EngineError> {
        Self::with_rng(config, candidates, &mut rand::thread_rng())
    }

    /// Build an engine, drawing the hidden answer from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        config: EngineConfig,
        candidates: Vec<String>,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let answer = select_target(&candidates, rng).map(|idx| candidates[idx].clone());
        Self::with_target(config, candidates, answer)
    }

    /// Build an engine with an explicit hidden answer.
    ///
    /// The answer does not have to be one of the candidates; a foreign answer
    /// simply makes every simulated attempt fail.
    pub fn with_target(
        config: EngineConfig,
        candidates: Vec<String>,
        answer: Option<String>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let delay = config.delay()?;
        let strategy = strategy::for_mode(&config.target_mode);

        debug!(
            username = %config.username,
            target_mode = %config.target_mode,
            candidates = candidates.len(),
            "Attempt engine ready"
        );

        Ok(Self {
            config,
            candidates,
            answer,
            strategy,
            delay,
            counters: AttemptCounters::new(),
            state: RunState::NotStarted,
            summary: None,
        })
    }

    /// Replace the strategy resolved from the target mode.
    pub fn with_strategy(mut self, strategy: Box<dyn AttemptStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn counters(&self) -> AttemptCounters {
        self.counters
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Final statistics, available once a run has ended (also after interruption)
    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Try one password: wait out the delay, then ask the strategy.
    ///
    /// Does not touch the counters.
    pub fn attempt(&self, password: &str) -> bool {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.strategy.check(&Credential {
            username: &self.config.username,
            password,
            answer: self.answer.as_deref(),
        })
    }

    /// Run with no observer and no way to interrupt.
    pub fn run_to_completion(&mut self) -> Result<RunResult, EngineError> {
        self.run(&mut NoopObserver, &CancellationToken::new())
    }

    /// Walk the candidates until the first success or the end of the list.
    ///
    /// `cancel` is checked before every attempt. The final summary is stored
    /// and handed to `observer.on_run_end` before returning, whether the run
    /// matched, exhausted the list or was interrupted. An interrupted run
    /// returns [`EngineError::Interrupted`] carrying that summary.
    ///
    /// An engine runs at most once; later calls return
    /// [`EngineError::AlreadyRun`].
    pub fn run(
        &mut self,
        observer: &mut dyn AttemptObserver,
        cancel: &CancellationToken,
    ) -> Result<RunResult, EngineError> {
        if self.state != RunState::NotStarted {
            return Err(EngineError::AlreadyRun { state: self.state });
        }
        self.state = RunState::Running;

        info!(
            username = %self.config.username,
            target_mode = %self.config.target_mode,
            candidates = self.candidates.len(),
            "Starting run"
        );

        let start = Instant::now();
        let mut exit = LoopExit::Exhausted;

        for idx in 0..self.candidates.len() {
            if cancel.is_cancelled() {
                exit = LoopExit::Interrupted;
                break;
            }

            let password = &self.candidates[idx];
            let success = self.attempt(password);
            self.counters.record(success);

            debug!(seq = self.counters.total, success, "Attempt");
            observer.on_attempt(&AttemptEvent {
                seq: self.counters.total,
                username: &self.config.username,
                password,
                success,
                target_mode: &self.config.target_mode,
                at: Utc::now(),
            });

            if success {
                exit = LoopExit::Matched(idx);
                break;
            }
        }

        let elapsed_secs = start.elapsed().as_secs_f64();
        let summary = self.counters.summarize(elapsed_secs);
        self.summary = Some(summary);
        observer.on_run_end(&summary);

        let (state, password) = match exit {
            LoopExit::Matched(idx) => (RunState::Succeeded, Some(self.candidates[idx].clone())),
            LoopExit::Exhausted => (RunState::Exhausted, None),
            LoopExit::Interrupted => (RunState::Interrupted, None),
        };
        self.state = state;

        info!(
            state = %state,
            attempts = summary.total,
            elapsed_secs,
            "Run finished"
        );

        if state == RunState::Interrupted {
            return Err(EngineError::Interrupted { summary });
        }

        Ok(RunResult {
            success: password.is_some(),
            password,
            attempts: summary.total,
            elapsed_secs,
        })
    }
}

impl fmt::Debug for AttemptEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptEngine")
            .field("config", &self.config)
            .field("candidates", &self.candidates.len())
            .field("answer", &self.answer.as_ref().map(|_| "<hidden>"))
            .field("strategy", &self.strategy.mode())
            .field("counters", &self.counters)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> EngineConfig {
        EngineConfig::new("admin").without_delay()
    }

    /// Records every event and cancels after `cancel_after` attempts.
    struct Recorder {
        seen: Vec<(u64, String, bool)>,
        ends: Vec<RunSummary>,
        cancel_after: Option<(u64, CancellationToken)>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                seen: Vec::new(),
                ends: Vec::new(),
                cancel_after: None,
            }
        }
    }

    impl AttemptObserver for Recorder {
        fn on_attempt(&mut self, event: &AttemptEvent<'_>) {
            self.seen
                .push((event.seq, event.password.to_string(), event.success));
            if let Some((n, token)) = &self.cancel_after {
                if event.seq >= *n {
                    token.cancel();
                }
            }
        }

        fn on_run_end(&mut self, summary: &RunSummary) {
            self.ends.push(*summary);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::new("admin").validate().is_ok());
        assert!(EngineConfig::new("   ").validate().is_err());
        assert!(EngineConfig::new("admin")
            .with_delay_secs(-0.1)
            .validate()
            .is_err());
        assert!(EngineConfig::new("admin")
            .with_delay_secs(f64::NAN)
            .validate()
            .is_err());
        assert!(EngineConfig::new("admin").without_delay().validate().is_ok());
        assert!(EngineConfig::new("admin")
            .with_delay_secs(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_delay_too_large_for_duration_is_rejected() {
        let config = EngineConfig::new("admin").with_delay_secs(1e20);
        assert!(matches!(config.delay(), Err(EngineError::InvalidConfig(_))));

        let err = AttemptEngine::with_target(config, words(&["a"]), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_delay_converts_to_duration() {
        let config = EngineConfig::new("admin").with_delay_secs(0.25);
        assert_eq!(config.delay().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = AttemptEngine::new(EngineConfig::new(""), words(&["a"])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_attempt_is_stateless() {
        let engine =
            AttemptEngine::with_target(config(), words(&["a", "b"]), Some("b".into())).unwrap();
        assert!(!engine.attempt("a"));
        assert!(engine.attempt("b"));
        assert_eq!(engine.counters(), AttemptCounters::default());
        assert_eq!(engine.state(), RunState::NotStarted);
    }

    #[test]
    fn test_answer_drawn_from_candidates() {
        let list = words(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        for seed in 0..50 {
            let engine =
                AttemptEngine::with_rng(config(), list.clone(), &mut ChaCha8Rng::seed_from_u64(seed))
                    .unwrap();
            let answer = engine.answer.clone().unwrap();
            assert!(list.contains(&answer));
            // middle half of 8 is indices 2..6
            assert!(["c", "d", "e", "f"].contains(&answer.as_str()));
        }
    }

    #[test]
    fn test_empty_candidates_have_no_answer() {
        let engine = AttemptEngine::new(config(), Vec::new()).unwrap();
        assert!(engine.answer.is_none());
    }

    #[test]
    fn test_run_stops_at_first_success() {
        let mut engine = AttemptEngine::with_target(
            config(),
            words(&["alpha", "bravo", "charlie", "delta"]),
            Some("bravo".into()),
        )
        .unwrap();
        let mut recorder = Recorder::new();

        let result = engine.run(&mut recorder, &CancellationToken::new()).unwrap();

        assert!(result.success);
        assert_eq!(result.password.as_deref(), Some("bravo"));
        assert_eq!(result.attempts, 2);
        assert_eq!(engine.state(), RunState::Succeeded);
        assert_eq!(
            recorder.seen,
            vec![(1, "alpha".to_string(), false), (2, "bravo".to_string(), true)]
        );
        assert_eq!(recorder.ends.len(), 1);
        assert_eq!(recorder.ends[0].successes, 1);
        assert_eq!(recorder.ends[0].failures, 1);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut engine =
            AttemptEngine::with_target(config(), words(&["x", "y", "x"]), Some("x".into()))
                .unwrap();
        let result = engine.run_to_completion().unwrap();
        assert!(result.success);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_exhausts_list_once() {
        let mut engine =
            AttemptEngine::with_target(config(), words(&["a", "b", "c"]), Some("zzz".into()))
                .unwrap();
        let mut recorder = Recorder::new();
        let result = engine.run(&mut recorder, &CancellationToken::new()).unwrap();

        assert!(!result.success);
        assert_eq!(result.password, None);
        assert_eq!(result.attempts, 3);
        assert_eq!(recorder.seen.len(), 3);
        assert_eq!(engine.state(), RunState::Exhausted);
    }

    #[test]
    fn test_other_mode_always_fails() {
        let list = words(&["only"]);
        let mut engine = AttemptEngine::with_target(
            config().with_target_mode("other"),
            list,
            Some("only".into()),
        )
        .unwrap();
        let result = engine.run_to_completion().unwrap();
        assert!(!result.success);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_empty_run() {
        let mut engine = AttemptEngine::new(config(), Vec::new()).unwrap();
        let mut recorder = Recorder::new();
        let result = engine.run(&mut recorder, &CancellationToken::new()).unwrap();

        assert!(!result.success);
        assert_eq!(result.attempts, 0);
        assert!(result.elapsed_secs < 1.0);
        assert_eq!(recorder.ends.len(), 1);
        assert_eq!(engine.state(), RunState::Exhausted);
    }

    #[test]
    fn test_interrupt_keeps_completed_attempts() {
        let token = CancellationToken::new();
        let mut engine = AttemptEngine::with_target(
            config(),
            words(&["a", "b", "c", "d", "e"]),
            Some("e".into()),
        )
        .unwrap();
        let mut recorder = Recorder::new();
        recorder.cancel_after = Some((2, token.clone()));

        let err = engine.run(&mut recorder, &token).unwrap_err();

        let summary = *err.interrupted_summary().unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failures, 2);
        assert_eq!(engine.summary(), Some(summary));
        assert_eq!(engine.state(), RunState::Interrupted);
        assert_eq!(recorder.ends, vec![summary]);
    }

    #[test]
    fn test_cancelled_before_start_makes_no_attempts() {
        let token = CancellationToken::new();
        token.cancel();
        let mut engine =
            AttemptEngine::with_target(config(), words(&["a", "b"]), Some("a".into())).unwrap();

        let err = engine.run(&mut NoopObserver, &token).unwrap_err();
        assert_eq!(err.interrupted_summary().map(|s| s.total), Some(0));
    }

    #[test]
    fn test_second_run_is_rejected() {
        let mut engine =
            AttemptEngine::with_target(config(), words(&["a", "b"]), Some("b".into())).unwrap();
        engine.run_to_completion().unwrap();
        let counters = engine.counters();

        let err = engine.run_to_completion().unwrap_err();
        assert!(matches!(
            err,
            EngineError::AlreadyRun {
                state: RunState::Succeeded
            }
        ));
        assert_eq!(engine.counters(), counters);
    }

    #[test]
    fn test_delay_paces_attempts() {
        let mut engine = AttemptEngine::with_target(
            EngineConfig::new("admin").with_delay_secs(0.02),
            words(&["a", "b", "c"]),
            None,
        )
        .unwrap();
        let result = engine.run_to_completion().unwrap();
        assert!(result.elapsed_secs >= 0.06);
    }

    #[test]
    fn test_debug_hides_answer() {
        let engine =
            AttemptEngine::with_target(config(), words(&["secret"]), Some("secret".into()))
                .unwrap();
        let rendered = format!("{:?}", engine);
        assert!(rendered.contains("<hidden>"));
        assert!(!rendered.contains("\"secret\""));
    }
}
