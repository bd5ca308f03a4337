//! CSV input and output for job tables.
//!
//! Input is whatever the caller exported from their job tracker; only the
//! location column matters and everything else passes through. Reading is
//! deliberately forgiving: ragged rows are kept and cells with broken
//! encoding are decoded lossily, so one bad row never sinks the batch.

use std::io::Read;
use std::path::Path;

use job_map_job_models::{JobRecord, JobTable, ResolvedRecord, ResolvedTable};

use crate::BatchError;

/// Annotation columns appended to the input schema on output.
const ANNOTATION_COLUMNS: &[&str] = &[
    "matched_city",
    "match_confidence",
    "match_method",
    "latitude",
    "longitude",
    "county",
];

/// Reads a job table from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header row cannot
/// be parsed. Data-row faults are logged and skipped instead.
pub fn read_table(path: &Path) -> Result<JobTable, BatchError> {
    let file = std::fs::File::open(path)?;
    read_table_from(file)
}

/// Parses a job table from any `Read` source.
///
/// # Errors
///
/// Returns an error if the header row cannot be parsed.
pub fn read_table_from(reader: impl Read) -> Result<JobTable, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.byte_records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping unreadable row: {e}");
                continue;
            }
        };
        let values = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();
        rows.push(JobRecord { values });
    }

    Ok(JobTable { columns, rows })
}

/// Writes an annotated table to a CSV file, optionally restricted to
/// matched rows. Returns the number of data rows written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_resolved(
    table: &ResolvedTable,
    path: &Path,
    matched_only: bool,
) -> Result<u64, BatchError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(output_header(&table.columns))?;

    let mut written = 0u64;
    for record in &table.records {
        if matched_only && !record.is_matched() {
            continue;
        }
        writer.write_record(output_row(record, table.columns.len()))?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

/// Output header: the input schema with the annotation columns appended.
fn output_header(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .cloned()
        .chain(ANNOTATION_COLUMNS.iter().map(ToString::to_string))
        .collect()
}

/// One output row: pass-through values padded to the schema width, then
/// the annotation cells. Absent values become empty cells.
fn output_row(record: &ResolvedRecord, width: usize) -> Vec<String> {
    let mut row: Vec<String> = Vec::with_capacity(width + ANNOTATION_COLUMNS.len());
    for index in 0..width {
        row.push(record.values.get(index).cloned().unwrap_or_default());
    }
    row.push(record.matched_city.clone().unwrap_or_default());
    row.push(record.confidence.to_string());
    row.push(
        record
            .method
            .map(|method| method.to_string())
            .unwrap_or_default(),
    );
    row.push(record.latitude.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.longitude.map(|v| v.to_string()).unwrap_or_default());
    row.push(record.county.clone().unwrap_or_default());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_map_job_models::MatchMethod;

    #[test]
    fn parses_headers_and_rows() {
        let data = "title,location\nEngineer,Denver\nAnalyst,Boulder\n";
        let table = read_table_from(data.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["title", "location"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].value(1), Some("Boulder"));
    }

    #[test]
    fn ragged_rows_are_kept() {
        let data = "title,location\nEngineer\nAnalyst,Boulder,extra\n";
        let table = read_table_from(data.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].value(1), None);
        assert_eq!(table.rows[1].value(2), Some("extra"));
    }

    #[test]
    fn broken_encoding_is_decoded_lossily() {
        let data = b"location\nDenv\xFFer\n";
        let table = read_table_from(&data[..]).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0].value(0).unwrap().contains('\u{FFFD}'));
    }

    #[test]
    fn output_header_appends_annotations() {
        let header = output_header(&["title".to_string(), "location".to_string()]);
        assert_eq!(header.len(), 2 + ANNOTATION_COLUMNS.len());
        assert_eq!(header[2], "matched_city");
        assert_eq!(header.last().map(String::as_str), Some("county"));
    }

    #[test]
    fn output_row_pads_and_annotates() {
        let record = ResolvedRecord {
            values: vec!["Engineer".to_string()],
            raw_location: "Denver, CO".to_string(),
            matched_city: Some("Denver".to_string()),
            confidence: 100,
            method: Some(MatchMethod::ExactAlias),
            latitude: Some(39.7392),
            longitude: Some(-104.9903),
            county: Some("Denver".to_string()),
        };
        // Row narrower than the two-column schema: the gap pads out empty.
        let row = output_row(&record, 2);
        assert_eq!(
            row,
            vec![
                "Engineer", "", "Denver", "100", "EXACT_ALIAS", "39.7392", "-104.9903", "Denver"
            ]
        );
    }

    #[test]
    fn unmatched_output_row_has_empty_annotations() {
        let record = ResolvedRecord {
            values: vec!["Mars".to_string()],
            raw_location: "Mars".to_string(),
            matched_city: None,
            confidence: 0,
            method: None,
            latitude: None,
            longitude: None,
            county: None,
        };
        let row = output_row(&record, 1);
        assert_eq!(row, vec!["Mars", "", "0", "", "", "", ""]);
    }
}
