//! External-service adapters for the Wayfarer tour planner.
//!
//! - [`routing`]: road distances from an OSRM server.
//! - [`geocode`]: descriptor lookup through Nominatim.
//! - [`gpkg`]: GeoPackage export of route stops.
//!
//! The HTTP adapters share a blocking client so the synchronous core traits
//! can drive async `reqwest` requests.

#![forbid(unsafe_code)]

pub mod geocode;
pub mod gpkg;
mod http;
pub mod routing;

pub use http::ClientBuildError;
