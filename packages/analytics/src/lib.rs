#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and summary statistics over resolved job batches.
//!
//! Consumes the `ResolvedTable` a batch run produces and rolls it up into
//! the typed records the map visualizer and report tables consume: per-city
//! and per-county counts, secondary-column cross-tabulations, and the
//! match-rate summary.

use std::collections::BTreeMap;

use job_map_analytics_models::{
    CityJobCount, CountyJobCount, MatchingStats, SecondaryCount, UnmatchedLocation,
};
use job_map_catalog::{CityCatalog, county_center};
use job_map_job_models::ResolvedTable;
use thiserror::Error;

/// How many unmatched locations the stats summary carries.
const TOP_UNMATCHED: usize = 5;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The requested secondary column does not exist in the table.
    #[error("unknown column '{column}'; columns present: {}", .columns.join(", "))]
    UnknownColumn {
        /// The column the caller asked for.
        column: String,
        /// Every column the table actually has.
        columns: Vec<String>,
    },
}

/// Counts matched postings per canonical city and attaches marker data
/// from the catalog.
///
/// Coordinates and population come from the city table, so either can be
/// absent for a city the table does not cover. Groups come back in
/// city-name order; display ordering is the caller's concern.
#[must_use]
pub fn aggregate_by_city(resolved: &ResolvedTable, catalog: &CityCatalog) -> Vec<CityJobCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in resolved.matched() {
        if let Some(city) = record.matched_city.as_deref() {
            *counts.entry(city).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(city, job_count)| {
            let (latitude, longitude) = split_coordinates(catalog.coordinates(city));
            let population = catalog.population(city);
            CityJobCount {
                city: city.to_string(),
                job_count,
                latitude,
                longitude,
                population,
                jobs_per_10k: population
                    .filter(|&residents| residents > 0)
                    .map(|residents| per_10k(job_count, residents)),
            }
        })
        .collect()
}

/// Counts matched postings per county, positioned at the county center.
///
/// Matched records whose county is unknown are left out of the rollup, so
/// the county totals can undercount the city totals when the county table
/// has gaps.
#[must_use]
pub fn aggregate_by_county(resolved: &ResolvedTable) -> Vec<CountyJobCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in resolved.matched() {
        if let Some(county) = record.county.as_deref() {
            *counts.entry(county).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(county, job_count)| {
            let (latitude, longitude) = split_coordinates(county_center(county));
            CountyJobCount {
                county: county.to_string(),
                job_count,
                latitude,
                longitude,
            }
        })
        .collect()
}

/// Cross-tabulates matched postings by city and one other column, e.g.
/// industry per city. Rows with an empty cell in that column are skipped.
///
/// # Errors
///
/// * `AnalyticsError::UnknownColumn` if the table has no column with the
///   requested name.
pub fn aggregate_by_secondary(
    resolved: &ResolvedTable,
    column: &str,
) -> Result<Vec<SecondaryCount>, AnalyticsError> {
    let index = resolved
        .column_index(column)
        .ok_or_else(|| AnalyticsError::UnknownColumn {
            column: column.to_string(),
            columns: resolved.columns.clone(),
        })?;

    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for record in resolved.matched() {
        let Some(city) = record.matched_city.as_deref() else {
            continue;
        };
        let value = record.values.get(index).map_or("", String::as_str).trim();
        if value.is_empty() {
            log::debug!("Skipping row with empty '{column}' cell for {city}");
            continue;
        }
        *counts.entry((city, value)).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((city, value), job_count)| SecondaryCount {
            city: city.to_string(),
            value: value.to_string(),
            job_count,
        })
        .collect())
}

/// Summarizes one batch run: totals, match rate, mean confidence over the
/// matched rows, and the most common unmatched locations.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn matching_stats(resolved: &ResolvedTable) -> MatchingStats {
    let total = resolved.len() as u64;
    let matched = resolved.matched_count() as u64;
    let unmatched = total - matched;

    let match_rate_pct = if total == 0 {
        0.0
    } else {
        round2(matched as f64 / total as f64 * 100.0)
    };

    let confidence_sum: u64 = resolved
        .matched()
        .map(|record| u64::from(record.confidence))
        .sum();
    let average_confidence = if matched == 0 {
        0.0
    } else {
        round2(confidence_sum as f64 / matched as f64)
    };

    let mut top_unmatched_locations = unmatched_report(resolved);
    top_unmatched_locations.truncate(TOP_UNMATCHED);

    MatchingStats {
        total,
        matched,
        unmatched,
        match_rate_pct,
        average_confidence,
        top_unmatched_locations,
    }
}

/// Tallies the unmatched rows by their original raw location string, most
/// frequent first.
#[must_use]
pub fn unmatched_report(resolved: &ResolvedTable) -> Vec<UnmatchedLocation> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in resolved.unmatched() {
        *counts.entry(record.raw_location.as_str()).or_insert(0) += 1;
    }

    let mut report: Vec<UnmatchedLocation> = counts
        .into_iter()
        .map(|(raw_location, count)| UnmatchedLocation {
            raw_location: raw_location.to_string(),
            count,
        })
        .collect();
    // Stable sort over the name-ordered map keeps ties in name order.
    report.sort_by(|a, b| b.count.cmp(&a.count));
    report
}

fn split_coordinates(coordinates: Option<(f64, f64)>) -> (Option<f64>, Option<f64>) {
    coordinates.map_or((None, None), |(latitude, longitude)| {
        (Some(latitude), Some(longitude))
    })
}

#[allow(clippy::cast_precision_loss)]
fn per_10k(job_count: u64, population: u32) -> f64 {
    round2(job_count as f64 / f64::from(population) * 10_000.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use job_map_job_models::{MatchMethod, ResolvedRecord};

    use super::*;

    fn table(columns: &[&str], records: Vec<ResolvedRecord>) -> ResolvedTable {
        ResolvedTable {
            columns: columns.iter().map(ToString::to_string).collect(),
            records,
        }
    }

    fn matched(
        city: &str,
        confidence: u8,
        county: Option<&str>,
        values: &[&str],
    ) -> ResolvedRecord {
        ResolvedRecord {
            values: values.iter().map(ToString::to_string).collect(),
            raw_location: city.to_string(),
            matched_city: Some(city.to_string()),
            confidence,
            method: Some(MatchMethod::FuzzyCity),
            latitude: None,
            longitude: None,
            county: county.map(ToString::to_string),
        }
    }

    fn unmatched(raw: &str) -> ResolvedRecord {
        ResolvedRecord {
            values: vec![raw.to_string()],
            raw_location: raw.to_string(),
            matched_city: None,
            confidence: 0,
            method: None,
            latitude: None,
            longitude: None,
            county: None,
        }
    }

    #[test]
    fn city_counts_cover_every_matched_row() {
        let resolved = table(
            &["location"],
            vec![
                matched("Denver", 100, Some("Denver"), &["Denver"]),
                matched("Denver", 83, Some("Denver"), &["Denvr"]),
                matched("Boulder", 100, Some("Boulder"), &["Boulder"]),
                unmatched("Remote"),
            ],
        );
        let catalog = CityCatalog::embedded();

        let counts = aggregate_by_city(&resolved, &catalog);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].city, "Boulder");
        assert_eq!(counts[0].job_count, 1);
        assert_eq!(counts[1].city, "Denver");
        assert_eq!(counts[1].job_count, 2);
        let total: u64 = counts.iter().map(|count| count.job_count).sum();
        assert_eq!(total, resolved.matched_count() as u64);
    }

    #[test]
    fn city_aggregates_attach_marker_data_from_the_catalog() {
        let resolved = table(
            &["location"],
            vec![
                matched("Denver", 100, Some("Denver"), &["Denver"]),
                matched("Denver", 100, Some("Denver"), &["Denver, CO"]),
            ],
        );
        let catalog = CityCatalog::embedded();

        let counts = aggregate_by_city(&resolved, &catalog);

        assert_eq!(counts.len(), 1);
        let denver = &counts[0];
        assert!((denver.latitude.unwrap() - 39.7392).abs() < f64::EPSILON);
        assert!((denver.longitude.unwrap() - (-104.9903)).abs() < f64::EPSILON);
        assert_eq!(denver.population, Some(715_522));
        assert!((denver.jobs_per_10k.unwrap() - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn county_rollup_excludes_catalog_coverage_gaps() {
        let resolved = table(
            &["location"],
            vec![
                matched("Denver", 100, Some("Denver"), &["Denver"]),
                matched("Boulder", 100, Some("Boulder"), &["Boulder"]),
                matched("Highlands Ranch", 100, None, &["Highlands Ranch"]),
                unmatched("Remote"),
            ],
        );

        let counts = aggregate_by_county(&resolved);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].county, "Boulder");
        assert_eq!(counts[1].county, "Denver");
        let total: u64 = counts.iter().map(|count| count.job_count).sum();
        assert!(total <= resolved.matched_count() as u64);
        assert!((counts[1].latitude.unwrap() - 39.7392).abs() < f64::EPSILON);
    }

    #[test]
    fn secondary_crosstab_groups_city_value_pairs() {
        let resolved = table(
            &["location", "industry"],
            vec![
                matched("Denver", 100, Some("Denver"), &["Denver", "Tech"]),
                matched("Denver", 100, Some("Denver"), &["Denver", "Tech"]),
                matched("Denver", 100, Some("Denver"), &["Denver", "Healthcare"]),
                matched("Boulder", 100, Some("Boulder"), &["Boulder", ""]),
            ],
        );

        let counts = aggregate_by_secondary(&resolved, "industry").unwrap();

        assert_eq!(
            counts,
            vec![
                SecondaryCount {
                    city: "Denver".to_string(),
                    value: "Healthcare".to_string(),
                    job_count: 1,
                },
                SecondaryCount {
                    city: "Denver".to_string(),
                    value: "Tech".to_string(),
                    job_count: 2,
                },
            ]
        );
    }

    #[test]
    fn unknown_secondary_column_is_an_error() {
        let resolved = table(
            &["location"],
            vec![matched("Denver", 100, Some("Denver"), &["Denver"])],
        );

        let err = aggregate_by_secondary(&resolved, "industry").unwrap_err();

        assert!(matches!(err, AnalyticsError::UnknownColumn { .. }));
        assert!(err.to_string().contains("industry"));
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn stats_summarize_rate_and_confidence() {
        let resolved = table(
            &["location"],
            vec![
                matched("Denver", 100, Some("Denver"), &["Denver"]),
                matched("Denver", 83, Some("Denver"), &["Denvr"]),
                unmatched("Remote - anywhere"),
            ],
        );

        let stats = matching_stats(&resolved);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.unmatched, 1);
        assert!((stats.match_rate_pct - 66.67).abs() < f64::EPSILON);
        assert!((stats.average_confidence - 91.5).abs() < f64::EPSILON);
        assert_eq!(
            stats.top_unmatched_locations,
            vec![UnmatchedLocation {
                raw_location: "Remote - anywhere".to_string(),
                count: 1,
            }]
        );
    }

    #[test]
    fn empty_table_yields_zeroed_stats() {
        let resolved = table(&["location"], vec![]);

        let stats = matching_stats(&resolved);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.unmatched, 0);
        assert!(stats.match_rate_pct.abs() < f64::EPSILON);
        assert!(stats.average_confidence.abs() < f64::EPSILON);
        assert!(stats.top_unmatched_locations.is_empty());
    }

    #[test]
    fn stats_keep_only_the_five_most_common_unmatched() {
        let records: Vec<ResolvedRecord> =
            (0..7).map(|i| unmatched(&format!("site {i}"))).collect();
        let resolved = table(&["location"], records);

        let stats = matching_stats(&resolved);

        assert_eq!(stats.top_unmatched_locations.len(), 5);
        assert_eq!(unmatched_report(&resolved).len(), 7);
    }

    #[test]
    fn unmatched_report_orders_by_count_then_name() {
        let resolved = table(
            &["location"],
            vec![
                unmatched("zzz plant"),
                unmatched("Warehouse"),
                unmatched("Warehouse"),
                unmatched("aaa office"),
            ],
        );

        let report = unmatched_report(&resolved);

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].raw_location, "Warehouse");
        assert_eq!(report[0].count, 2);
        assert_eq!(report[1].raw_location, "aaa office");
        assert_eq!(report[2].raw_location, "zzz plant");
    }
}
