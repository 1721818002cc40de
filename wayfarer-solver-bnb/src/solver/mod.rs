//! Sequential branch-and-bound solver.

use std::time::{Duration, Instant};

use wayfarer_core::{DistanceMatrix, SolveError, Solver, Tour, TourKind};

use crate::search::SearchState;

/// Whether partial paths are cut against the incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pruning {
    /// Discard partial paths whose length already reaches the incumbent.
    #[default]
    Enabled,
    /// Score every permutation.
    Disabled,
}

/// Configuration for [`BranchAndBoundSolver`] and
/// [`ParallelBranchAndBoundSolver`](crate::ParallelBranchAndBoundSolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BranchAndBoundConfig {
    /// Incumbent pruning mode.
    pub pruning: Pruning,
    /// Stop searching after this long and return the best tour found.
    pub time_limit: Option<Duration>,
}

impl BranchAndBoundConfig {
    /// Set the pruning mode.
    #[must_use]
    pub const fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Bound the search time.
    #[must_use]
    pub const fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Exact solver exploring visiting orders depth first.
///
/// Destinations are branched on in ascending index order and a complete path
/// replaces the incumbent only when strictly shorter, so among equally short
/// tours the lexicographically smallest path is returned.
///
/// # Examples
/// ```
/// use wayfarer_core::{DistanceMatrix, Solver, TourKind};
/// use wayfarer_solver_bnb::BranchAndBoundSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = DistanceMatrix::new(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])?;
/// let tour = BranchAndBoundSolver::new().solve(&matrix, TourKind::Closed)?;
/// assert_eq!(tour.path, vec![0, 1, 3, 2, 0]);
/// assert_eq!(tour.distance, 80.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver {
    config: BranchAndBoundConfig,
}

impl BranchAndBoundSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(BranchAndBoundConfig {
            pruning: Pruning::Enabled,
            time_limit: None,
        })
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: BranchAndBoundConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }
}

impl Solver for BranchAndBoundSolver {
    fn solve(&self, matrix: &DistanceMatrix, kind: TourKind) -> Result<Tour, SolveError> {
        let started_at = Instant::now();
        if matrix.size() == 1 {
            return Ok(Tour::origin_only(kind));
        }
        let outcome = SearchState::new(matrix, kind, &self.config, started_at).run(&[0]);
        log::debug!(
            "branch and bound over {} node(s): {} expanded, {} pruned",
            matrix.size(),
            outcome.stats.nodes_expanded,
            outcome.stats.branches_pruned
        );
        outcome.into_tour(kind, self.config.time_limit, started_at)
    }
}

/// Validate raw rows and solve them with the default sequential solver.
///
/// # Errors
///
/// Returns [`SolveError::InvalidInput`] when `rows` do not form a valid
/// distance matrix.
///
/// # Examples
/// ```
/// use wayfarer_core::{MatrixError, SolveError, TourKind};
///
/// let err = wayfarer_solver_bnb::solve(vec![vec![0.0, 1.0]], TourKind::Open)
///     .expect_err("not square");
/// assert!(matches!(err, SolveError::InvalidInput(MatrixError::NotSquare { .. })));
/// ```
pub fn solve(rows: Vec<Vec<f64>>, kind: TourKind) -> Result<Tour, SolveError> {
    let matrix = DistanceMatrix::new(rows)?;
    BranchAndBoundSolver::new().solve(&matrix, kind)
}
