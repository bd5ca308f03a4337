//! Location string cleaning and city-candidate extraction.
//!
//! Raw job locations arrive in every imaginable shape:
//! - With state/country suffixes: `"Denver, CO"`, `"Boulder, Colorado, USA"`
//! - With work-arrangement noise: `"Remote - Boulder Area"`
//! - Abbreviated and punctuated: `"Ft. Collins"`
//!
//! This module scrubs those down to the fragment most likely to name a
//! city, which the resolver then scores against the catalog.

use std::sync::LazyLock;

use job_map_catalog::normalize_key;
use regex::Regex;

/// Regex for whole-word state and country tokens. Word-boundary matched so
/// "United" inside another word survives, while a trailing ", CO" does not.
static STATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(co|colorado|usa|us|united states)\b").expect("valid regex"));

/// Regex for whole-word work-arrangement noise inside a city candidate.
static NOISE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(remote|hybrid|onsite|office|downtown|metro|area)\b").expect("valid regex")
});

/// Cleans a raw location string: lowercase, state/country tokens dropped,
/// punctuation replaced by spaces, whitespace collapsed and trimmed.
///
/// Empty or whitespace-only input yields an empty string, never an error.
#[must_use]
pub fn clean_location(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    let stripped = STATE_TOKEN_RE.replace_all(&lowered, "");
    normalize_key(&stripped)
}

/// Extracts the fragment of a raw location most likely to name a city.
///
/// Splits the cleaned string on `,` or `;` and keeps the first segment,
/// then drops work-arrangement noise words. Cleaning has usually already
/// turned separators into spaces, so the noise-word strip is what actually
/// rescues inputs like "Remote - Boulder Area".
#[must_use]
pub fn extract_city_candidate(raw: &str) -> String {
    let cleaned = clean_location(raw);
    let first_segment = cleaned.split([',', ';']).next().unwrap_or("");
    let without_noise = NOISE_WORD_RE.replace_all(first_segment, "");
    normalize_key(&without_noise)
}
