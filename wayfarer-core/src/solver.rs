//! The solver boundary: distance matrix in, optimal tour out.

use thiserror::Error;

use crate::{DistanceMatrix, MatrixError, Tour, TourKind};

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The matrix violated its invariants.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] MatrixError),
    /// The matrix does not cover the registered nodes.
    #[error("distance matrix covers {matrix} node(s) but {nodes} are registered")]
    DimensionMismatch {
        /// Number of registered nodes.
        nodes: usize,
        /// Matrix dimension.
        matrix: usize,
    },
    /// A time limit expired before any complete path was scored.
    #[error("time limit of {limit_ms} ms expired before a complete tour was found")]
    TimedOut {
        /// The configured limit in milliseconds.
        limit_ms: u128,
    },
    /// Every complete path overflowed to an infinite length.
    #[error("no tour has a finite length; edge weights are too large to sum")]
    NoFiniteTour,
}

impl SolveError {
    /// Whether the error stems from malformed input rather than the search.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::DimensionMismatch { .. })
    }
}

/// Find the cheapest visiting order over a distance matrix.
///
/// The origin is index 0. Implementations must return a path satisfying
/// [`Tour::is_valid_for`] and must not panic on any validated matrix.
/// Solvers must be `Send + Sync` to operate safely across threads.
pub trait Solver: Send + Sync {
    /// Solve `matrix` for the given tour kind.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the search cannot produce a tour.
    fn solve(&self, matrix: &DistanceMatrix, kind: TourKind) -> Result<Tour, SolveError>;

    /// Solve after checking that `matrix` covers exactly `nodes` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::DimensionMismatch`] before searching when the
    /// sizes differ, otherwise whatever [`Solver::solve`] returns.
    fn solve_for(
        &self,
        nodes: usize,
        matrix: &DistanceMatrix,
        kind: TourKind,
    ) -> Result<Tour, SolveError> {
        if matrix.size() != nodes {
            return Err(SolveError::DimensionMismatch {
                nodes,
                matrix: matrix.size(),
            });
        }
        self.solve(matrix, kind)
    }
}

impl<T> Solver for &T
where
    T: Solver + ?Sized,
{
    fn solve(&self, matrix: &DistanceMatrix, kind: TourKind) -> Result<Tour, SolveError> {
        (**self).solve(matrix, kind)
    }

    fn solve_for(
        &self,
        nodes: usize,
        matrix: &DistanceMatrix,
        kind: TourKind,
    ) -> Result<Tour, SolveError> {
        (**self).solve_for(nodes, matrix, kind)
    }
}
