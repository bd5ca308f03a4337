//! City-to-county assignments and approximate county center points.

use std::collections::BTreeMap;
use std::io::Read;

use crate::CatalogError;

/// City-to-county table embedded at compile time. Keys are lowercase city
/// names; values are county names without the "County" suffix.
const EMBEDDED_COUNTIES_CSV: &str = include_str!("../data/colorado_counties.csv");

/// Maps lowercase city names to their county.
#[derive(Debug, Clone, Default)]
pub struct CountyIndex {
    map: BTreeMap<String, String>,
}

impl CountyIndex {
    /// Parses a two-column `city,county` CSV from any `Read` source.
    ///
    /// Duplicate city keys are a data-quality problem in the source table:
    /// each one is logged and the last occurrence wins.
    pub fn parse_csv(reader: impl Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let mut map = BTreeMap::new();
        for result in csv_reader.records() {
            let record = result?;
            let (Some(city), Some(county)) = (record.get(0), record.get(1)) else {
                log::warn!("skipping county row with missing columns");
                continue;
            };
            let city = city.trim().to_lowercase();
            let county = county.trim().to_string();
            if city.is_empty() || county.is_empty() {
                log::warn!("skipping county row with empty city or county");
                continue;
            }
            if let Some(previous) = map.insert(city.clone(), county) {
                log::warn!("duplicate county key '{city}' (was '{previous}'); keeping the last entry");
            }
        }

        Ok(Self { map })
    }

    /// Returns the index embedded in the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded CSV is malformed (this is a compile-time
    /// guarantee since the table is embedded).
    #[must_use]
    pub fn embedded() -> Self {
        Self::parse_csv(EMBEDDED_COUNTIES_CSV.as_bytes())
            .unwrap_or_else(|e| panic!("Failed to parse embedded county table: {e}"))
    }

    /// Looks up the county for a city name, case-insensitively.
    ///
    /// Not every catalog city has a county assignment; callers must treat
    /// `None` as "unknown", not as an error.
    #[must_use]
    pub fn county(&self, city: &str) -> Option<&str> {
        self.map
            .get(&city.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Number of city keys in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index holds no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Approximate center point for counties that commonly carry jobs, as a
/// `(latitude, longitude)` pair. Counties outside this set aggregate fine;
/// they just cannot be placed on a map.
#[must_use]
pub fn county_center(county: &str) -> Option<(f64, f64)> {
    let center = match county {
        "Denver" => (39.7392, -104.9903),
        "Jefferson" => (39.5777, -105.1369),
        "Arapahoe" => (39.6103, -104.8197),
        "Adams" => (39.8764, -104.7688),
        "Boulder" => (40.0150, -105.2705),
        "El Paso" => (38.8339, -104.8214),
        "Larimer" => (40.5853, -105.0844),
        "Weld" => (40.4233, -104.7091),
        "Mesa" => (39.0639, -108.5506),
        "Pueblo" => (38.2544, -104.6091),
        "Douglas" => (39.37, -104.86),
        _ => return None,
    };
    Some(center)
}
