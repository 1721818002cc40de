//! Distance-provider trait and pairwise matrix construction.

use thiserror::Error;

use crate::{DistanceMatrix, MatrixError, Node};

use super::error::ProviderError;

/// Errors from [`DistanceProvider::distance_matrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixBuildError {
    /// The provider failed to answer a query.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The provider answered with weights that violate the matrix invariants.
    #[error("provider returned an invalid matrix: {0}")]
    Matrix(#[from] MatrixError),
}

/// Fetch the travel distance between two locations.
///
/// Distances are directional: `distance(a, b)` may differ from
/// `distance(b, a)`.
///
/// # Examples
///
/// ```rust
/// use wayfarer_core::{DistanceProvider, LocationRegistry, Node, ProviderError};
///
/// struct Unit;
///
/// impl DistanceProvider for Unit {
///     fn distance(&self, _from: &Node, _to: &Node) -> Result<f64, ProviderError> {
///         Ok(1.0)
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = LocationRegistry::register("a", &["b", "c"])?;
/// let matrix = Unit.distance_matrix(registry.nodes())?;
/// assert_eq!(matrix.get(0, 0), Some(0.0));
/// assert_eq!(matrix.get(2, 1), Some(1.0));
/// # Ok(())
/// # }
/// ```
pub trait DistanceProvider {
    /// Distance from `from` to `to` in kilometres.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the service cannot answer.
    fn distance(&self, from: &Node, to: &Node) -> Result<f64, ProviderError>;

    /// Query every ordered pair of distinct nodes and build the matrix.
    ///
    /// The diagonal is zero without a query. Pairs are requested row by row
    /// in index order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::EmptyInput`] for an empty slice, the first
    /// provider failure, or a [`MatrixError`] if a returned distance is
    /// negative or not finite.
    fn distance_matrix(&self, nodes: &[Node]) -> Result<DistanceMatrix, MatrixBuildError> {
        pairwise_matrix(self, nodes)
    }
}

/// Build a matrix by querying `provider` once per ordered pair.
///
/// This is the default [`DistanceProvider::distance_matrix`]; providers with
/// a batch endpoint can fall back to it when batching is disabled.
///
/// # Errors
///
/// As for [`DistanceProvider::distance_matrix`].
pub fn pairwise_matrix<P>(provider: &P, nodes: &[Node]) -> Result<DistanceMatrix, MatrixBuildError>
where
    P: DistanceProvider + ?Sized,
{
    if nodes.is_empty() {
        return Err(ProviderError::EmptyInput.into());
    }
    let mut rows = Vec::with_capacity(nodes.len());
    for (i, from) in nodes.iter().enumerate() {
        let mut row = Vec::with_capacity(nodes.len());
        for (j, to) in nodes.iter().enumerate() {
            row.push(if i == j { 0.0 } else { provider.distance(from, to)? });
        }
        rows.push(row);
    }
    log::debug!(
        "fetched {} pairwise distance(s)",
        nodes.len() * nodes.len().saturating_sub(1)
    );
    Ok(DistanceMatrix::new(rows)?)
}

impl<T> DistanceProvider for &T
where
    T: DistanceProvider + ?Sized,
{
    fn distance(&self, from: &Node, to: &Node) -> Result<f64, ProviderError> {
        (**self).distance(from, to)
    }

    fn distance_matrix(&self, nodes: &[Node]) -> Result<DistanceMatrix, MatrixBuildError> {
        (**self).distance_matrix(nodes)
    }
}
