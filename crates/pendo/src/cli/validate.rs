//! Input validation, run before anything touches the wordlist or the logs.

use std::path::Path;
use std::time::Duration;

/// Collect every problem with the inputs instead of stopping at the first.
pub fn validate_inputs(username: &str, wordlist: &Path, delay_secs: f64) -> Vec<String> {
    let mut errors = Vec::new();

    if !wordlist.is_file() {
        errors.push(format!("Wordlist file not found: {}", wordlist.display()));
    }

    // Also catches values too large to sleep for
    if Duration::try_from_secs_f64(delay_secs).is_err() {
        errors.push("Delay must be a non-negative number".to_string());
    }

    if username.trim().is_empty() {
        errors.push("Username cannot be empty".to_string());
    }

    errors
}
