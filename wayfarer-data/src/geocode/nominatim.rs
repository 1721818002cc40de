//! Nominatim search API response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use serde::Deserialize;

/// One place returned by `/search?format=jsonv2`.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub struct Place {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Full human-readable address of the match.
    pub display_name: Option<String>,
}

impl Place {
    /// Parse the coordinates, rejecting values outside the WGS84 range.
    pub fn coord(&self) -> Option<Coord<f64>> {
        let lat: f64 = self.lat.trim().parse().ok()?;
        let lon: f64 = self.lon.trim().parse().ok()?;
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon))
            .then_some(Coord { x: lon, y: lat })
    }
}
