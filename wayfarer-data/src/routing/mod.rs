//! HTTP-based distance providers for routing services.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of
//! [`wayfarer_core::DistanceProvider`] that fetches road distances from an
//! OSRM routing service.
//!
//! # Architecture
//!
//! Pairwise distances come from the OSRM Route API; the Table API can be
//! selected to fetch the whole matrix in one request. The synchronous
//! [`DistanceProvider`](wayfarer_core::DistanceProvider) trait is implemented
//! by blocking on async HTTP calls internally.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use wayfarer_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig, MatrixStrategy};
//!
//! let config = HttpDistanceProviderConfig::new("http://localhost:5000")
//!     .with_profile("walking")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_strategy(MatrixStrategy::Table);
//! let provider = HttpDistanceProvider::with_config(config)?;
//! # Ok::<(), wayfarer_data::ClientBuildError>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpDistanceProvider, HttpDistanceProviderConfig,
    MatrixStrategy,
};
