//! Token-sort similarity scoring.
//!
//! Multi-word place names show up in any word order ("Springs, Colorado"
//! vs "Colorado Springs"). Sorting tokens before measuring edit distance
//! makes the score order-invariant. Callers hand in already-normalized
//! (lowercase) strings; this module does no case folding of its own.

/// Similarity between two strings on a 0-100 scale, invariant to token
/// order. 100 means the sorted token strings are identical.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    let similarity = strsim::normalized_levenshtein(&a, &b);
    // normalized_levenshtein yields [0.0, 1.0], so the scaled value fits.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (similarity * 100.0).round() as u8
    }
}

/// Tokenizes on whitespace, sorts, and rejoins with single spaces.
fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
