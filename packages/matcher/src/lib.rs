#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuzzy resolution of free-text job locations to canonical Colorado
//! cities.
//!
//! Resolution runs in tiers, cheapest first: an exact lookup in the alias
//! index, then token-sort similarity against every canonical city name,
//! then the same similarity against every alias key. The first tier to
//! clear the caller's threshold wins; nothing clearing it is not an error
//! but a [`MatchOutcome::NotFound`].

pub mod normalize;
pub mod score;

use job_map_catalog::CityCatalog;
use job_map_job_models::MatchMethod;

pub use normalize::{clean_location, extract_city_candidate};
pub use score::token_sort_ratio;

/// Default similarity threshold for the fuzzy tiers.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Outcome of resolving one location candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The candidate resolved to a canonical city.
    Found {
        /// Canonical city name from the catalog.
        city: String,
        /// Match certainty, 0-100. 100 is reserved for exact alias hits.
        confidence: u8,
        /// Which tier produced the match.
        method: MatchMethod,
    },
    /// Nothing cleared the threshold.
    NotFound,
}

impl MatchOutcome {
    /// Whether the candidate resolved to a city.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Resolves an already-cleaned city candidate against the catalog.
///
/// The candidate must be in normalized form (what
/// [`extract_city_candidate`] produces); use [`resolve_location`] for raw
/// strings. When several names share the maximum similarity the first in
/// catalog iteration order wins, so tied scores depend on catalog ordering.
///
/// `threshold` is applied as-is. Callers own range policy; the CLI
/// restricts it to 60-100.
///
/// The fuzzy tiers scan every city name and alias key, so a batch costs
/// O(rows x (cities + aliases)) in the worst case. That scan is the
/// dominant cost of processing large inputs.
#[must_use]
pub fn resolve(candidate: &str, catalog: &CityCatalog, threshold: u8) -> MatchOutcome {
    if candidate.is_empty() {
        return MatchOutcome::NotFound;
    }

    if let Some(city) = catalog.aliases().resolve(candidate) {
        return MatchOutcome::Found {
            city: city.to_string(),
            confidence: 100,
            method: MatchMethod::ExactAlias,
        };
    }

    let cities = catalog
        .cities()
        .iter()
        .map(|city| (city.city.as_str(), city.city.to_lowercase()));
    if let Some((city, score)) = best_scoring(candidate, cities) {
        if score >= threshold {
            return MatchOutcome::Found {
                city: city.to_string(),
                confidence: score,
                method: MatchMethod::FuzzyCity,
            };
        }
    }

    let aliases = catalog.aliases().entries().map(|(alias, city)| (city, alias));
    if let Some((city, score)) = best_scoring(candidate, aliases) {
        if score >= threshold {
            return MatchOutcome::Found {
                city: city.to_string(),
                confidence: score,
                method: MatchMethod::FuzzyAlias,
            };
        }
    }

    MatchOutcome::NotFound
}

/// Cleans, extracts, and resolves a raw location string in one call.
#[must_use]
pub fn resolve_location(raw: &str, catalog: &CityCatalog, threshold: u8) -> MatchOutcome {
    resolve(&normalize::extract_city_candidate(raw), catalog, threshold)
}

/// Scores the candidate against `(city, comparison_key)` pairs and keeps
/// the best. Strictly-greater comparison keeps the first of a tie.
fn best_scoring<'a, K: AsRef<str>>(
    candidate: &str,
    pairs: impl Iterator<Item = (&'a str, K)>,
) -> Option<(&'a str, u8)> {
    let mut best: Option<(&'a str, u8)> = None;
    for (city, key) in pairs {
        let score = token_sort_ratio(candidate, key.as_ref());
        if best.is_none_or(|(_, high)| score > high) {
            best = Some((city, score));
        }
    }
    best
}
