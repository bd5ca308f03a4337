#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate and summary types consumed by the map visualizer.
//!
//! These are the typed records the core hands to whatever renders the map
//! and report tables. Every field a marker, tooltip, or summary panel
//! needs is explicit here; nothing downstream should have to guess at the
//! shape of an untyped payload.

use serde::{Deserialize, Serialize};

/// Jobs aggregated to one canonical city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityJobCount {
    /// Canonical city name.
    pub city: String,
    /// Number of matched postings in this city.
    pub job_count: u64,
    /// Marker latitude, when the coordinate catalog covers the city.
    pub latitude: Option<f64>,
    /// Marker longitude, when the coordinate catalog covers the city.
    pub longitude: Option<f64>,
    /// Resident population, when the city table carried it.
    pub population: Option<u32>,
    /// Postings per 10,000 residents, rounded to two decimals. `None`
    /// when population is unknown.
    pub jobs_per_10k: Option<f64>,
}

/// Jobs aggregated to one county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyJobCount {
    /// County name without the "County" suffix.
    pub county: String,
    /// Number of matched postings in this county.
    pub job_count: u64,
    /// Approximate county center latitude, when known.
    pub latitude: Option<f64>,
    /// Approximate county center longitude, when known.
    pub longitude: Option<f64>,
}

/// Cross-tabulation cell: postings for one city and one value of a
/// caller-chosen secondary column (e.g. industry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryCount {
    /// Canonical city name.
    pub city: String,
    /// Value of the secondary column.
    pub value: String,
    /// Number of matched postings with this city/value pair.
    pub job_count: u64,
}

/// An unmatched raw location and how often it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedLocation {
    /// The location exactly as the caller provided it.
    pub raw_location: String,
    /// Number of rows with this raw location.
    pub count: u64,
}

/// Summary statistics for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingStats {
    /// Total rows processed.
    pub total: u64,
    /// Rows that resolved to a canonical city.
    pub matched: u64,
    /// Rows that did not resolve.
    pub unmatched: u64,
    /// Matched share of the total as a percentage, two decimals. Zero for
    /// an empty batch.
    pub match_rate_pct: f64,
    /// Mean confidence over matched rows, two decimals. Zero when nothing
    /// matched.
    pub average_confidence: f64,
    /// The five most common unmatched raw locations, most frequent first.
    pub top_unmatched_locations: Vec<UnmatchedLocation>,
}
