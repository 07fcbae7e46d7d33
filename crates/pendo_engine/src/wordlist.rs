//! Wordlist loading
//!
//! Reads a password list into an ordered sequence of trimmed, non-empty
//! lines. Decoding is permissive: byte sequences that are not valid UTF-8
//! are dropped instead of failing the load, so lists scraped from mixed
//! sources still work.

use crate::error::WordlistError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a wordlist from `path`.
///
/// Returns `WordlistError::NotFound` when the file does not exist and
/// `WordlistError::Load` for any other I/O failure.
pub fn load_wordlist(path: impl AsRef<Path>) -> Result<Vec<String>, WordlistError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| WordlistError::from_io(path, e))?;
    let candidates = parse_wordlist(&bytes);
    debug!(
        path = %path.display(),
        count = candidates.len(),
        "Loaded wordlist"
    );
    Ok(candidates)
}

/// Split raw wordlist bytes into candidates.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line. Lines are trimmed and
/// blank lines skipped; duplicates and order are preserved.
pub fn parse_wordlist(bytes: &[u8]) -> Vec<String> {
    decode_permissive(bytes)
        .split(|c| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode UTF-8, dropping every invalid byte sequence.
fn decode_permissive(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                if let Ok(prefix) = std::str::from_utf8(&rest[..valid_up_to]) {
                    out.push_str(prefix);
                }
                // error_len() is None only for a sequence truncated by end of input
                let skip = err.error_len().unwrap_or(rest.len() - valid_up_to);
                rest = &rest[valid_up_to + skip..];
            }
        }
    }
}
