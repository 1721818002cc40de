//! External collaborators: distance providers and geocoders.
//!
//! Both traits are synchronous so the core stays embeddable in synchronous
//! contexts. Implementations report failures through [`ProviderError`]; the
//! core surfaces these unchanged and never retries.

mod distance;
mod error;
mod geocode;

pub use distance::{DistanceProvider, MatrixBuildError, pairwise_matrix};
pub use error::ProviderError;
pub use geocode::{Geocoder, parse_coordinate_literal};
