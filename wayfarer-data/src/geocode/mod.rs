//! HTTP geocoding for free-form location descriptors.
//!
//! [`HttpGeocoder`] implements [`wayfarer_core::Geocoder`] against a
//! Nominatim search endpoint. Descriptors that are already `lat, long`
//! literals are parsed locally without a request.

mod nominatim;
mod provider;

pub use provider::{DEFAULT_NOMINATIM_URL, HttpGeocoder, HttpGeocoderConfig};
