//! Test utilities for routing providers.
//!
//! This module provides [`StubDistanceProvider`], a deterministic test double
//! for [`DistanceProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use wayfarer_core::{DistanceProvider, Node, ProviderError};

/// Stub `DistanceProvider` for testing.
///
/// # Example
///
/// ```
/// use wayfarer_core::{DistanceProvider, LocationRegistry};
/// use wayfarer_data::routing::test_support::StubDistanceProvider;
///
/// let provider = StubDistanceProvider::with_rows(vec![
///     vec![0.0, 1.5],
///     vec![2.5, 0.0],
/// ]);
/// let registry = LocationRegistry::register("a", &["b"]).expect("valid");
///
/// let matrix = provider.distance_matrix(registry.nodes()).expect("known pairs");
/// assert_eq!(matrix.get(1, 0), Some(2.5));
/// ```
#[derive(Debug, Clone)]
pub struct StubDistanceProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Rows(Vec<Vec<f64>>),
    Error(ProviderError),
}

impl StubDistanceProvider {
    /// Create a provider answering from the given rows, indexed by node
    /// index.
    ///
    /// Pairs outside the rows yield [`ProviderError::NoRoute`].
    #[must_use]
    pub const fn with_rows(rows: Vec<Vec<f64>>) -> Self {
        Self {
            response: StubResponse::Rows(rows),
        }
    }

    /// Create a provider that returns the given error for every query.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Create a provider where every distinct pair is one kilometre apart.
    #[must_use]
    pub fn with_unit_rows(size: usize) -> Self {
        Self::with_rows(
            (0..size)
                .map(|from| {
                    (0..size)
                        .map(|to| if from == to { 0.0 } else { 1.0 })
                        .collect()
                })
                .collect(),
        )
    }
}

impl DistanceProvider for StubDistanceProvider {
    fn distance(&self, from: &Node, to: &Node) -> Result<f64, ProviderError> {
        match &self.response {
            StubResponse::Rows(rows) => rows
                .get(from.index)
                .and_then(|row| row.get(to.index))
                .copied()
                .ok_or_else(|| ProviderError::NoRoute {
                    from: from.descriptor.clone(),
                    to: to.descriptor.clone(),
                }),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
