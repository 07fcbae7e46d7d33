//! Password variations
//!
//! Expands a base password into the common variants people reach for:
//! l33t substitutions, year/number suffixes and case changes. Not used by a
//! run unless the caller expands the candidate list explicitly.

use std::collections::HashSet;

/// Character substitutions applied to the lower-cased base
const SUBSTITUTIONS: [(char, char); 6] = [
    ('a', '@'),
    ('e', '3'),
    ('i', '1'),
    ('o', '0'),
    ('s', '$'),
    ('t', '7'),
];

/// Suffixes appended to the unmodified base
const COMMON_SUFFIXES: [&str; 6] = ["123", "!", "1", "2023", "2024", "2025"];

/// All variations of `base`, base first, without duplicates.
pub fn generate_variations(base: &str) -> Vec<String> {
    let mut variations = vec![base.to_string()];

    let lower = base.to_lowercase();
    let substituted = substitute(&lower);
    if substituted != lower {
        variations.push(substituted);
    }

    for suffix in COMMON_SUFFIXES {
        variations.push(format!("{}{}", base, suffix));
    }

    if is_all_lowercase(base) {
        variations.push(capitalize(base));
        variations.push(base.to_uppercase());
    }

    dedup_in_order(variations)
}

/// Replace every candidate with its variations, keeping list order.
pub fn expand_candidates(candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .flat_map(|candidate| generate_variations(candidate))
        .collect()
}

fn substitute(word: &str) -> String {
    word.chars()
        .map(|c| {
            SUBSTITUTIONS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// True when the word has at least one cased letter and none are upper case
fn is_all_lowercase(word: &str) -> bool {
    let mut has_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// First character upper case, the rest lower case
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
    }
}

fn dedup_in_order(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
