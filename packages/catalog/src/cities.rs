//! Canonical city table: embedded CSV, caller-supplied CSV, and the minimal
//! built-in fallback.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use job_map_catalog_models::CityRecord;
use serde::Deserialize;

use crate::CatalogError;

/// City table embedded at compile time (Colorado cities of roughly fifty
/// thousand residents and up).
const EMBEDDED_CITIES_CSV: &str = include_str!("../data/colorado_cities.csv");

/// Columns the city table must carry. `Population` is optional.
const REQUIRED_COLUMNS: &[&str] = &["City", "Latitude", "Longitude"];

/// Column layout of the city reference CSV.
#[derive(Debug, Deserialize)]
struct CityRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Population", default)]
    population: Option<u32>,
}

/// Parses city rows from any `Read` source.
///
/// Malformed rows are skipped with a warning rather than failing the whole
/// table; a table that yields zero usable rows is an error. Duplicate city
/// names keep the first occurrence.
pub(crate) fn parse_city_csv(reader: impl Read) -> Result<Vec<CityRecord>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(CatalogError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }

    let mut cities: Vec<CityRecord> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for result in csv_reader.deserialize::<CityRow>() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping malformed city row: {e}");
                continue;
            }
        };

        let name = row.city.trim();
        if name.is_empty() {
            log::warn!("skipping city row with an empty name");
            continue;
        }
        if !seen.insert(name.to_lowercase()) {
            log::warn!("duplicate city '{name}' in city table; keeping the first entry");
            continue;
        }

        cities.push(CityRecord {
            city: name.to_string(),
            latitude: row.latitude,
            longitude: row.longitude,
            population: row.population,
        });
    }

    if cities.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(cities)
}

/// Loads the city table from a CSV file on disk.
pub(crate) fn load_city_csv(path: &Path) -> Result<Vec<CityRecord>, CatalogError> {
    let file = std::fs::File::open(path)?;
    parse_city_csv(file)
}

/// Returns the city table embedded in the binary.
///
/// # Panics
///
/// Panics if the embedded CSV is malformed (this is a compile-time
/// guarantee since the table is embedded).
pub(crate) fn embedded_cities() -> Vec<CityRecord> {
    parse_city_csv(EMBEDDED_CITIES_CSV.as_bytes())
        .unwrap_or_else(|e| panic!("Failed to parse embedded city table: {e}"))
}

/// Minimal built-in city set used when no city table can be read at all.
///
/// Coordinates are deliberately coarse; this set exists so the matcher can
/// still resolve the most common locations, not to drive precise mapping.
pub(crate) fn fallback_cities() -> Vec<CityRecord> {
    const FALLBACK: &[(&str, f64, f64)] = &[
        ("Denver", 39.74, -104.99),
        ("Colorado Springs", 38.83, -104.82),
        ("Aurora", 39.73, -104.83),
        ("Fort Collins", 40.59, -105.08),
        ("Lakewood", 39.71, -105.08),
        ("Boulder", 40.02, -105.27),
    ];

    FALLBACK
        .iter()
        .map(|&(city, latitude, longitude)| CityRecord {
            city: city.to_string(),
            latitude,
            longitude,
            population: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses() {
        let cities = embedded_cities();
        assert!(cities.len() >= 20);
        assert!(cities.iter().any(|c| c.city == "Denver"));
        assert!(cities.iter().all(|c| c.population.is_some()));
    }

    #[test]
    fn fallback_has_six_cities_without_population() {
        let cities = fallback_cities();
        assert_eq!(cities.len(), 6);
        assert!(cities.iter().all(|c| c.population.is_none()));
    }

    #[test]
    fn skips_malformed_rows() {
        let data = "City,Latitude,Longitude,Population\n\
                    Denver,39.74,-104.99,715522\n\
                    Badtown,not-a-number,-105.0,1000\n\
                    Boulder,40.02,-105.27,108250\n";
        let cities = parse_city_csv(data.as_bytes()).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].city, "Boulder");
    }

    #[test]
    fn duplicate_city_keeps_first() {
        let data = "City,Latitude,Longitude\n\
                    Denver,39.74,-104.99\n\
                    denver,0.0,0.0\n";
        let cities = parse_city_csv(data.as_bytes()).unwrap();
        assert_eq!(cities.len(), 1);
        assert!((cities[0].latitude - 39.74).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let data = "Name,Latitude,Longitude\nDenver,39.74,-104.99\n";
        let err = parse_city_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn { column } if column == "City"));
    }

    #[test]
    fn all_bad_rows_is_an_error() {
        let data = "City,Latitude,Longitude\nDenver,oops,-104.99\n";
        assert!(matches!(
            parse_city_csv(data.as_bytes()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn population_column_is_optional() {
        let data = "City,Latitude,Longitude\nDenver,39.74,-104.99\n";
        let cities = parse_city_csv(data.as_bytes()).unwrap();
        assert_eq!(cities[0].population, None);
    }
}
