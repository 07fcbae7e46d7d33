//! Hidden answer selection
//!
//! The answer is drawn from the middle half of the candidate list so a demo
//! neither succeeds on the first attempt nor always runs to the end.

use rand::Rng;
use std::ops::Range;

/// Index range `[len/4, 3*len/4)` the answer is normally drawn from.
pub fn middle_range(len: usize) -> Range<usize> {
    (len / 4)..(len * 3 / 4)
}

/// Pick the index of the hidden answer.
///
/// Uniform over [`middle_range`], falling back to the whole list when that
/// range is empty. Returns `None` for an empty list.
pub fn select_target<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let middle = middle_range(candidates.len());
    let range = if middle.start < middle.end {
        middle
    } else {
        0..candidates.len()
    };

    Some(rng.gen_range(range))
}
