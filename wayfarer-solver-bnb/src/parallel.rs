//! Branch-and-bound with first-level branches spread over a rayon pool.

use std::time::Instant;

use rayon::prelude::*;
use wayfarer_core::{DistanceMatrix, SolveError, Solver, Tour, TourKind};

use crate::BranchAndBoundConfig;
use crate::search::{SearchOutcome, SearchState, SearchStats, SharedBound};

/// Exact solver exploring the children of the origin concurrently.
///
/// Each first-level branch `[0, k]` is searched by its own depth-first
/// state. Improvements are published to a shared incumbent so that all
/// workers prune against the best tour seen anywhere. Branch results are
/// merged by distance and then by branch index, which returns the same path
/// as [`BranchAndBoundSolver`](crate::BranchAndBoundSolver).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBranchAndBoundSolver {
    config: BranchAndBoundConfig,
}

impl ParallelBranchAndBoundSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

impl Solver for ParallelBranchAndBoundSolver {
    fn solve(&self, matrix: &DistanceMatrix, kind: TourKind) -> Result<Tour, SolveError> {
        let started_at = Instant::now();
        if matrix.size() == 1 {
            return Ok(Tour::origin_only(kind));
        }
        let shared = SharedBound::new();
        let branches: Vec<SearchOutcome> = (1..matrix.size())
            .into_par_iter()
            .map(|first| {
                SearchState::new(matrix, kind, &self.config, started_at)
                    .with_shared(&shared)
                    .run(&[0, first])
            })
            .collect();
        log::debug!(
            "searched {} branch(es) on {} thread(s), incumbent {}",
            branches.len(),
            rayon::current_num_threads(),
            shared.load()
        );
        merge(branches).into_tour(kind, self.config.time_limit, started_at)
    }
}

/// Keep the shortest branch result; the earliest branch wins ties.
fn merge(branches: Vec<SearchOutcome>) -> SearchOutcome {
    let mut stats = SearchStats::default();
    let mut timed_out = false;
    let mut best: Option<(Vec<usize>, f64)> = None;
    for branch in branches {
        stats = stats.merge(branch.stats);
        timed_out |= branch.timed_out;
        if branch.found()
            && best
                .as_ref()
                .is_none_or(|(_, distance)| branch.distance < *distance)
        {
            best = Some((branch.path, branch.distance));
        }
    }
    let (path, distance) = best.unwrap_or((Vec::new(), f64::INFINITY));
    SearchOutcome {
        path,
        distance,
        stats,
        timed_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use wayfarer_core::test_support::scenario_matrix;
    use wayfarer_core::{MatrixError, Optimality};

    use crate::BranchAndBoundSolver;

    fn outcome(path: Vec<usize>, distance: f64) -> SearchOutcome {
        SearchOutcome {
            path,
            distance,
            stats: SearchStats {
                nodes_expanded: 1,
                branches_pruned: 0,
                complete_paths: 1,
            },
            timed_out: false,
        }
    }

    #[rstest]
    fn merge_prefers_earlier_branch_on_ties() {
        let merged = merge(vec![
            outcome(vec![0, 1, 2], 5.0),
            outcome(vec![0, 2, 1], 5.0),
            outcome(Vec::new(), f64::INFINITY),
        ]);
        assert_eq!(merged.path, vec![0, 1, 2]);
        assert_eq!(merged.stats.nodes_expanded, 3);
    }

    #[rstest]
    fn merge_takes_strictly_shorter_branch() {
        let merged = merge(vec![outcome(vec![0, 1, 2], 7.0), outcome(vec![0, 2, 1], 5.0)]);
        assert_eq!(merged.path, vec![0, 2, 1]);
        assert_eq!(merged.distance, 5.0);
    }

    #[rstest]
    #[case(TourKind::Closed)]
    #[case(TourKind::Open)]
    fn agrees_with_sequential_solver(#[case] kind: TourKind) {
        let matrix = scenario_matrix();
        let parallel = ParallelBranchAndBoundSolver::new()
            .solve(&matrix, kind)
            .expect("solvable");
        let sequential = BranchAndBoundSolver::new()
            .solve(&matrix, kind)
            .expect("solvable");
        assert_eq!(parallel.path, sequential.path);
        assert_eq!(parallel.distance, sequential.distance);
        assert_eq!(parallel.optimality, Optimality::Proven);
    }

    #[rstest]
    fn equal_weights_return_identity_order() -> Result<(), MatrixError> {
        let matrix = DistanceMatrix::from_fn(6, |from, to| if from == to { 0.0 } else { 1.0 })?;
        let tour = ParallelBranchAndBoundSolver::new()
            .solve(&matrix, TourKind::Closed)
            .expect("solvable");
        assert_eq!(tour.path, vec![0, 1, 2, 3, 4, 5, 0]);
        assert_eq!(tour.distance, 6.0);
        Ok(())
    }

    #[rstest]
    fn expired_time_limit_returns_best_found_tour() -> Result<(), MatrixError> {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let matrix = DistanceMatrix::from_fn(14, |from, to| {
            if from == to {
                0.0
            } else {
                rng.gen_range(1.0..10.0)
            }
        })?;
        let solver = ParallelBranchAndBoundSolver::with_config(
            BranchAndBoundConfig::default().with_time_limit(Duration::from_millis(50)),
        );
        let tour = solver
            .solve(&matrix, TourKind::Closed)
            .expect("every branch finds an incumbent before the limit");
        assert_eq!(tour.optimality, Optimality::BestFound);
        assert!(tour.is_valid_for(14));
        assert_eq!(tour.path.len(), 15);
        Ok(())
    }
}
