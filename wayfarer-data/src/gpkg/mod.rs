//! GeoPackage export of point features.
//!
//! [`GeoPackageExporter`] implements [`wayfarer_core::Exporter`] by writing
//! a GeoPackage 1.3 file with one point layer in EPSG:4326.

mod exporter;
mod geometry;
mod schema;

pub use exporter::{DEFAULT_LAYER, GeoPackageError, GeoPackageExporter};
