#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference catalog for the Colorado job map.
//!
//! Bundles the three reference tables the pipeline reads from: canonical
//! cities with coordinates and population, alias spellings, and city-to-
//! county assignments. The catalog is built once at startup and passed by
//! reference; nothing downstream mutates it.

pub mod aliases;
pub mod cities;
pub mod counties;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

pub use aliases::{AliasIndex, normalize_key};
pub use counties::{CountyIndex, county_center};
pub use job_map_catalog_models::CityRecord;

/// Errors from loading reference data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reference table could not be read from disk.
    #[error("Failed to read reference table: {0}")]
    Io(#[from] std::io::Error),

    /// Reference table contained unparseable CSV.
    #[error("Failed to parse reference table: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the city table header.
    #[error("City table is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The table parsed but produced no usable rows.
    #[error("Reference table contains no usable rows")]
    Empty,
}

/// Immutable reference data: cities, aliases, and county assignments.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Vec<CityRecord>,
    by_key: BTreeMap<String, usize>,
    aliases: AliasIndex,
    counties: CountyIndex,
}

impl CityCatalog {
    fn assemble(cities: Vec<CityRecord>) -> Self {
        let by_key = cities
            .iter()
            .enumerate()
            .map(|(index, city)| (city.city.to_lowercase(), index))
            .collect();
        let aliases = AliasIndex::build(&cities);
        let counties = CountyIndex::embedded();
        Self {
            cities,
            by_key,
            aliases,
            counties,
        }
    }

    /// Catalog built from the city table embedded in the binary.
    ///
    /// # Panics
    ///
    /// Panics if any embedded reference table is malformed (this is a
    /// compile-time guarantee since the tables are embedded).
    #[must_use]
    pub fn embedded() -> Self {
        Self::assemble(cities::embedded_cities())
    }

    /// Catalog built from an explicit city list. Aliases are generated from
    /// the list; county assignments still come from the embedded table.
    #[must_use]
    pub fn from_cities(cities: Vec<CityRecord>) -> Self {
        Self::assemble(cities)
    }

    /// Catalog built from a city CSV on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is missing a required
    /// column, or yields no usable rows.
    pub fn from_city_csv(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self::assemble(cities::load_city_csv(path)?))
    }

    /// Loads the requested city table, or degrades instead of failing:
    /// an unreadable explicit table falls back to the minimal built-in
    /// city set, and no explicit table means the embedded table.
    #[must_use]
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::embedded();
        };
        match Self::from_city_csv(path) {
            Ok(catalog) => {
                log::info!("loaded {} cities from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                log::warn!(
                    "could not load city table from {}: {e}; using the built-in fallback set",
                    path.display()
                );
                Self::assemble(cities::fallback_cities())
            }
        }
    }

    /// All catalog cities, in table order.
    #[must_use]
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Looks up a city by canonical name, case-insensitively.
    #[must_use]
    pub fn city(&self, name: &str) -> Option<&CityRecord> {
        self.by_key
            .get(&name.to_lowercase())
            .map(|&index| &self.cities[index])
    }

    /// Marker coordinates for a city, when the catalog has them.
    #[must_use]
    pub fn coordinates(&self, name: &str) -> Option<(f64, f64)> {
        self.city(name).map(CityRecord::coordinates)
    }

    /// Population for a city, when the source table carried it.
    #[must_use]
    pub fn population(&self, name: &str) -> Option<u32> {
        self.city(name).and_then(|city| city.population)
    }

    /// County assignment for a city, when the county table covers it.
    #[must_use]
    pub fn county(&self, name: &str) -> Option<&str> {
        self.counties.county(name)
    }

    /// The alias index built from this catalog.
    #[must_use]
    pub const fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }

    /// Number of catalog cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the catalog holds no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
