//! Attempt Engine - simulated credential brute-force for teaching
//!
//! # Philosophy: Nothing Leaves The Process
//!
//! The engine walks a password list for one username and compares each
//! candidate against a hidden answer picked from the same list. No network
//! connection is ever made: target modes other than `simulation` are
//! placeholders that always fail.
//!
//! # Run Loop
//!
//! 1. Load the wordlist (trimmed, non-empty lines, permissive decoding)
//! 2. Pick the hidden answer from the middle half of the list
//! 3. For each candidate: wait `delay`, check, count, notify observer
//! 4. Stop on the first success, or after the last candidate
//! 5. Finalize statistics (also on interruption) and report them
//!
//! # Termination Conditions
//!
//! - First successful attempt
//! - Candidate list exhausted
//! - User interrupted (cooperative, checked between attempts)

pub mod cancel;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod strategy;
pub mod target;
pub mod variations;
pub mod wordlist;

pub use cancel::CancellationToken;
pub use engine::{AttemptEngine, EngineConfig, RunState, DEFAULT_DELAY_SECS, SIMULATION_MODE};
pub use error::{EngineError, WordlistError};
pub use metrics::{AttemptCounters, RunResult, RunSummary};
pub use observer::{AttemptEvent, AttemptObserver, NoopObserver, ObserverSet};
pub use strategy::{AttemptStrategy, Credential, SimulationStrategy, UnsupportedStrategy};
pub use wordlist::{load_wordlist, parse_wordlist};
