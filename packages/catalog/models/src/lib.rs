#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference city and county types for the Colorado job map.
//!
//! These types describe the *known-good* side of location matching: the
//! canonical cities a free-text job location can resolve to. They are
//! independent of the job postings themselves.

use serde::{Deserialize, Serialize};

/// A canonical Colorado city as loaded from the reference catalog.
///
/// The `city` name is the identity: matching resolves raw location strings
/// to exactly these names. Coordinates and population are optional because
/// the minimal fallback catalog ships without population data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    /// Canonical city name (e.g. "Fort Collins").
    pub city: String,
    /// Latitude of the city marker.
    pub latitude: f64,
    /// Longitude of the city marker.
    pub longitude: f64,
    /// Resident population, when the source table carries it.
    pub population: Option<u32>,
}

impl CityRecord {
    /// Marker coordinates as a `(latitude, longitude)` pair.
    #[must_use]
    pub const fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
