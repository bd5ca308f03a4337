#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Job posting table types and location match results.
//!
//! The input side is deliberately schema-agnostic: a [`JobTable`] carries
//! whatever columns the caller uploaded, and the pipeline only ever reads
//! the one free-text location column. The output side pairs each input row
//! with its resolution into a canonical Colorado city.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a raw location string was resolved to a canonical city.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMethod {
    /// The cleaned candidate was an exact key in the alias index.
    ExactAlias,
    /// Token-sort similarity against a canonical city name cleared the
    /// threshold.
    FuzzyCity,
    /// Token-sort similarity against an alias key cleared the threshold.
    FuzzyAlias,
}

/// A caller-supplied tabular dataset of job postings.
///
/// The schema is opaque except for one free-text location column; all other
/// columns pass through the pipeline untouched and re-attach to the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTable {
    /// Column names, in input order.
    pub columns: Vec<String>,
    /// Data rows, each aligned positionally with `columns`.
    pub rows: Vec<JobRecord>,
}

/// One input row. Values align with the owning table's columns; rows read
/// from ragged CSV input may be shorter than the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Cell values in column order.
    pub values: Vec<String>,
}

impl JobRecord {
    /// Cell value at a column index, if the row reaches that far.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

impl JobTable {
    /// Index of a column by name, case-insensitively.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Picks the free-text location column.
    ///
    /// An explicit name must exist in the schema (compared
    /// case-insensitively). Without one, the first column whose name
    /// contains "location" wins.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the explicit column is absent or no
    /// column name contains "location". This is checked before any row
    /// processing so a bad schema never produces a partial batch.
    pub fn location_column(&self, explicit: Option<&str>) -> Result<usize, SchemaError> {
        if let Some(name) = explicit {
            return self
                .column_index(name)
                .ok_or_else(|| SchemaError::ColumnNotFound {
                    column: name.to_string(),
                    columns: self.columns.clone(),
                });
        }
        self.columns
            .iter()
            .position(|column| column.to_lowercase().contains("location"))
            .ok_or_else(|| SchemaError::NoLocationColumn {
                columns: self.columns.clone(),
            })
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One input row annotated with its location resolution.
///
/// Created once per input row and never mutated afterwards. `confidence`
/// is 0 and `matched_city` is `None` when nothing cleared the threshold;
/// that pair is the single no-match representation — never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRecord {
    /// Pass-through cell values of the source row.
    pub values: Vec<String>,
    /// The location string exactly as the caller provided it.
    pub raw_location: String,
    /// Canonical city the location resolved to.
    pub matched_city: Option<String>,
    /// Match certainty, 0-100. 100 is reserved for exact alias hits.
    pub confidence: u8,
    /// How the match was made. `None` for unmatched rows.
    pub method: Option<MatchMethod>,
    /// Marker latitude, when the coordinate catalog covers the city.
    pub latitude: Option<f64>,
    /// Marker longitude, when the coordinate catalog covers the city.
    pub longitude: Option<f64>,
    /// County assignment, when the county table covers the city.
    pub county: Option<String>,
}

impl ResolvedRecord {
    /// Whether the row resolved to a canonical city.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.matched_city.is_some()
    }
}

/// Output of batch processing: the input schema plus one resolved row per
/// input row, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTable {
    /// Column names of the source table, in input order.
    pub columns: Vec<String>,
    /// Resolved rows, positionally aligned with the input rows.
    pub records: Vec<ResolvedRecord>,
}

impl ResolvedTable {
    /// Index of a column by name, case-insensitively.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Rows that resolved to a canonical city.
    pub fn matched(&self) -> impl Iterator<Item = &ResolvedRecord> {
        self.records.iter().filter(|record| record.is_matched())
    }

    /// Rows that did not resolve.
    pub fn unmatched(&self) -> impl Iterator<Item = &ResolvedRecord> {
        self.records.iter().filter(|record| !record.is_matched())
    }

    /// Number of rows that resolved to a canonical city.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    /// Number of resolved rows (matched or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Error returned when the input table has no usable location column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No column name contains "location".
    NoLocationColumn {
        /// The column names that were present.
        columns: Vec<String>,
    },
    /// The caller named a column the table does not have.
    ColumnNotFound {
        /// The requested column name.
        column: String,
        /// The column names that were present.
        columns: Vec<String>,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLocationColumn { columns } => write!(
                f,
                "no location column found; columns present: {}",
                columns.join(", ")
            ),
            Self::ColumnNotFound { column, columns } => write!(
                f,
                "column '{column}' not found; columns present: {}",
                columns.join(", ")
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> JobTable {
        JobTable {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn detects_column_containing_location() {
        let table = table(&["Title", "Job Location", "Salary"]);
        assert_eq!(table.location_column(None).unwrap(), 1);
    }

    #[test]
    fn first_location_like_column_wins() {
        let table = table(&["location_raw", "Location"]);
        assert_eq!(table.location_column(None).unwrap(), 0);
    }

    #[test]
    fn explicit_column_is_case_insensitive() {
        let table = table(&["Title", "Location"]);
        assert_eq!(table.location_column(Some("location")).unwrap(), 1);
    }

    #[test]
    fn missing_explicit_column_is_schema_error() {
        let table = table(&["Title", "Location"]);
        let err = table.location_column(Some("city")).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnNotFound { column, .. } if column == "city"));
    }

    #[test]
    fn no_location_column_is_schema_error() {
        let table = table(&["Title", "Salary"]);
        let err = table.location_column(None).unwrap_err();
        assert!(matches!(err, SchemaError::NoLocationColumn { columns } if columns.len() == 2));
    }

    #[test]
    fn match_method_round_trips_through_strings() {
        assert_eq!(MatchMethod::ExactAlias.to_string(), "EXACT_ALIAS");
        assert_eq!(
            "FUZZY_CITY".parse::<MatchMethod>().unwrap(),
            MatchMethod::FuzzyCity
        );
    }

    #[test]
    fn resolved_table_partitions_by_match() {
        let matched = ResolvedRecord {
            values: vec!["Denver, CO".to_string()],
            raw_location: "Denver, CO".to_string(),
            matched_city: Some("Denver".to_string()),
            confidence: 100,
            method: Some(MatchMethod::ExactAlias),
            latitude: Some(39.7392),
            longitude: Some(-104.9903),
            county: Some("Denver".to_string()),
        };
        let unmatched = ResolvedRecord {
            values: vec!["Mars".to_string()],
            raw_location: "Mars".to_string(),
            matched_city: None,
            confidence: 0,
            method: None,
            latitude: None,
            longitude: None,
            county: None,
        };
        let table = ResolvedTable {
            columns: vec!["location".to_string()],
            records: vec![matched, unmatched],
        };
        assert_eq!(table.matched_count(), 1);
        assert_eq!(table.unmatched().count(), 1);
        assert_eq!(table.len(), 2);
    }
}
