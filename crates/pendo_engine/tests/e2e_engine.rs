//! End-to-End tests for the Attempt Engine
//!
//! Tests load REAL wordlist files from disk and run the engine over them.
//! Delays are zero unless the test is about pacing.

use pendo_engine::{
    load_wordlist, variations::expand_candidates, AttemptEngine, AttemptEvent, AttemptObserver,
    AttemptStrategy, CancellationToken, Credential, EngineConfig, EngineError, RunState,
    RunSummary, WordlistError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// HELPERS
// =============================================================================

fn write_wordlist(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn fast_config() -> EngineConfig {
    EngineConfig::new("admin").without_delay()
}

/// Checks the counter invariant after every attempt.
#[derive(Default)]
struct InvariantObserver {
    successes: u64,
    failures: u64,
    last_seq: u64,
    summary: Option<RunSummary>,
}

impl AttemptObserver for InvariantObserver {
    fn on_attempt(&mut self, event: &AttemptEvent<'_>) {
        assert_eq!(event.seq, self.last_seq + 1, "sequence numbers must be contiguous");
        self.last_seq = event.seq;
        if event.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        assert_eq!(self.successes + self.failures, event.seq);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        assert_eq!(summary.successes + summary.failures, summary.total);
        assert_eq!(summary.total, self.last_seq);
        self.summary = Some(*summary);
    }
}

// =============================================================================
// LOAD + RUN
// =============================================================================

#[test]
fn test_load_then_run_finds_pinned_answer() {
    let dir = TempDir::new().unwrap();
    let path = write_wordlist(&dir, "list.txt", "alpha\n bravo \n\ncharlie\ndelta\n");

    let candidates = load_wordlist(&path).unwrap();
    let mut engine =
        AttemptEngine::with_target(fast_config(), candidates, Some("bravo".into())).unwrap();

    let result = engine.run_to_completion().unwrap();
    assert!(result.success);
    assert_eq!(result.password.as_deref(), Some("bravo"));
    assert_eq!(result.attempts, 2);
}

#[test]
fn test_missing_wordlist_fails_before_engine() {
    let dir = TempDir::new().unwrap();
    let err = load_wordlist(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, WordlistError::NotFound { .. }));
}

#[test]
fn test_seeded_runs_succeed_at_answer_index() {
    let candidates: Vec<String> = (0..40).map(|i| format!("pass{:02}", i)).collect();

    for seed in 0..25 {
        let mut observer = InvariantObserver::default();
        let mut engine = AttemptEngine::with_rng(
            fast_config(),
            candidates.clone(),
            &mut ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap();

        let result = engine
            .run(&mut observer, &CancellationToken::new())
            .unwrap();

        assert!(result.success, "simulation always contains its own answer");
        let password = result.password.unwrap();
        let k = candidates.iter().position(|c| *c == password).unwrap();
        assert_eq!(result.attempts, k as u64 + 1);
        assert!((10..30).contains(&k));
        assert_eq!(observer.summary.unwrap().successes, 1);
    }
}

#[test]
fn test_non_simulation_modes_exhaust_list() {
    let candidates: Vec<String> = ["root", "toor", "admin", "root"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for mode in ["http", "ssh", "", "SIMULATION"] {
        let mut observer = InvariantObserver::default();
        let mut engine = AttemptEngine::new(
            fast_config().with_target_mode(mode),
            candidates.clone(),
        )
        .unwrap();

        let result = engine
            .run(&mut observer, &CancellationToken::new())
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.attempts, candidates.len() as u64);
        assert_eq!(engine.state(), RunState::Exhausted);
    }
}

#[test]
fn test_empty_wordlist_runs_instantly() {
    let dir = TempDir::new().unwrap();
    let path = write_wordlist(&dir, "empty.txt", "\n   \n\t\n");

    let candidates = load_wordlist(&path).unwrap();
    assert!(candidates.is_empty());

    // Real default delay: nothing to wait for with no candidates
    let mut engine = AttemptEngine::new(EngineConfig::new("admin"), candidates).unwrap();
    let result = engine.run_to_completion().unwrap();
    assert!(!result.success);
    assert_eq!(result.attempts, 0);
    assert!(result.elapsed_secs < 0.25);
}

#[test]
fn test_interrupt_from_another_thread() {
    let candidates: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
    let token = CancellationToken::new();
    let mut engine = AttemptEngine::with_target(
        EngineConfig::new("admin").with_delay_secs(0.005),
        candidates,
        None,
    )
    .unwrap();

    let handler = token.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(50));
        handler.cancel();
    });

    let mut observer = InvariantObserver::default();
    let err = engine.run(&mut observer, &token).unwrap_err();
    canceller.join().unwrap();

    match err {
        EngineError::Interrupted { summary } => {
            assert!(summary.total > 0);
            assert!(summary.total < 1000);
            assert_eq!(summary.failures, summary.total);
            assert_eq!(observer.summary, Some(summary));
        }
        other => panic!("expected interruption, got {:?}", other),
    }
    assert_eq!(engine.state(), RunState::Interrupted);
}

#[test]
fn test_expanded_candidates_reach_variant_answer() {
    let base = vec!["summer".to_string(), "winter".to_string()];
    let expanded = expand_candidates(&base);

    let mut engine =
        AttemptEngine::with_target(fast_config(), expanded.clone(), Some("Winter".into()))
            .unwrap();
    let result = engine.run_to_completion().unwrap();

    let k = expanded.iter().position(|c| c == "Winter").unwrap();
    assert!(result.success);
    assert_eq!(result.attempts, k as u64 + 1);
}

// =============================================================================
// CUSTOM STRATEGY
// =============================================================================

/// Accepts any password of a given length; stands in for a real connector.
struct LengthOracle {
    len: usize,
}

impl AttemptStrategy for LengthOracle {
    fn mode(&self) -> &str {
        "length-oracle"
    }

    fn check(&self, credential: &Credential<'_>) -> bool {
        credential.username == "admin" && credential.password.len() == self.len
    }
}

#[test]
fn test_injected_strategy_drives_outcome() {
    let candidates: Vec<String> = ["a", "bb", "ccc", "dddd"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut engine = AttemptEngine::new(fast_config().with_target_mode("length-oracle"), candidates)
        .unwrap()
        .with_strategy(Box::new(LengthOracle { len: 3 }));

    let result = engine.run_to_completion().unwrap();
    assert_eq!(result.password.as_deref(), Some("ccc"));
    assert_eq!(result.attempts, 3);
    assert!(engine.state().is_terminal());
}
