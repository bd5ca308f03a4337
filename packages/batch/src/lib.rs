#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch application of the location matcher across a job table.
//!
//! One call to [`process`] turns a caller-supplied [`JobTable`] into a
//! [`ResolvedTable`]: the schema is validated up front, then every row is
//! independently normalized, resolved, and annotated with coordinates and
//! county. Row order is preserved so callers can zip results with their
//! source rows.

pub mod progress;
pub mod table;

use std::sync::Arc;

use job_map_catalog::CityCatalog;
use job_map_job_models::{JobRecord, JobTable, ResolvedRecord, ResolvedTable, SchemaError};
use job_map_matcher::MatchOutcome;
use thiserror::Error;

pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use table::{read_table, read_table_from, write_resolved};

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Explicit location column name; `None` means auto-detect.
    pub location_column: Option<String>,
    /// Similarity threshold for the fuzzy matching tiers.
    pub threshold: u8,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            location_column: None,
            threshold: job_map_matcher::DEFAULT_THRESHOLD,
        }
    }
}

/// Errors from a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input table has no usable location column.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// CSV input or output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File input or output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves every row of a job table against the catalog.
///
/// The location column is validated before any row work, so a schema
/// problem never produces a partial batch. Rows are independent: identical
/// input, catalog, and threshold always yield identical output, and a row
/// that fails to resolve is annotated as unmatched rather than erroring.
///
/// # Errors
///
/// Returns [`BatchError::Schema`] when no usable location column exists.
pub fn process(
    table: &JobTable,
    catalog: &CityCatalog,
    options: &ProcessOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ResolvedTable, BatchError> {
    let location_index = table.location_column(options.location_column.as_deref())?;

    progress.set_total(table.len() as u64);

    let mut records = Vec::with_capacity(table.len());
    for row in &table.rows {
        records.push(resolve_row(row, location_index, catalog, options.threshold));
        progress.inc(1);
    }

    let resolved = ResolvedTable {
        columns: table.columns.clone(),
        records,
    };
    log::info!(
        "resolved {} of {} locations",
        resolved.matched_count(),
        resolved.len()
    );
    Ok(resolved)
}

/// Resolves one row: normalize, resolve, annotate with coordinates and
/// county. Never fails; a row without a usable location is unmatched.
fn resolve_row(
    row: &JobRecord,
    location_index: usize,
    catalog: &CityCatalog,
    threshold: u8,
) -> ResolvedRecord {
    let raw_location = row.value(location_index).unwrap_or_default().to_string();

    let (matched_city, confidence, method) =
        match job_map_matcher::resolve_location(&raw_location, catalog, threshold) {
            MatchOutcome::Found {
                city,
                confidence,
                method,
            } => (Some(city), confidence, Some(method)),
            MatchOutcome::NotFound => (None, 0, None),
        };

    let coordinates = matched_city
        .as_deref()
        .and_then(|city| catalog.coordinates(city));
    let county = matched_city
        .as_deref()
        .and_then(|city| catalog.county(city))
        .map(ToString::to_string);

    ResolvedRecord {
        values: row.values.clone(),
        raw_location,
        matched_city,
        confidence,
        method,
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lon)| lon),
        county,
    }
}
