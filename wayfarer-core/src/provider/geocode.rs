//! Geocoder trait and coordinate-literal parsing.

use geo::Coord;

use super::error::ProviderError;

/// Resolve a free-form descriptor to a WGS84 position.
///
/// The returned coordinate uses `x = longitude` and `y = latitude`.
pub trait Geocoder {
    /// Resolve `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when nothing matches, or a
    /// transport error from the underlying service.
    fn resolve(&self, descriptor: &str) -> Result<Coord<f64>, ProviderError>;
}

impl<T> Geocoder for &T
where
    T: Geocoder + ?Sized,
{
    fn resolve(&self, descriptor: &str) -> Result<Coord<f64>, ProviderError> {
        (**self).resolve(descriptor)
    }
}

/// Parse a `"lat, long"` descriptor such as `"48.8583701, 2.2944813"`.
///
/// Returns `None` unless the text is exactly two comma-separated finite
/// numbers within the WGS84 latitude and longitude ranges.
///
/// # Examples
/// ```
/// use wayfarer_core::parse_coordinate_literal;
///
/// let coord = parse_coordinate_literal("48.8583701, 2.2944813").expect("literal");
/// assert_eq!(coord.y, 48.8583701);
/// assert_eq!(coord.x, 2.2944813);
/// assert!(parse_coordinate_literal("Notre Dame de Paris").is_none());
/// ```
#[must_use]
pub fn parse_coordinate_literal(descriptor: &str) -> Option<Coord<f64>> {
    let (lat_text, long_text) = descriptor.split_once(',')?;
    let lat: f64 = lat_text.trim().parse().ok()?;
    let long: f64 = long_text.trim().parse().ok()?;
    let in_range = lat.is_finite()
        && long.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&long);
    in_range.then_some(Coord { x: long, y: lat })
}
