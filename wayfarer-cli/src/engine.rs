//! Solver selection shared by the `plan` and `solve` commands.

use std::time::Duration;

use wayfarer_core::Solver;
use wayfarer_solver_bnb::{
    BranchAndBoundConfig, BranchAndBoundSolver, ParallelBranchAndBoundSolver,
};

/// Which branch-and-bound variant to run, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SolverSettings {
    /// Spread first-level branches over the rayon pool.
    pub(crate) parallel: bool,
    /// Stop searching after this long and return the best tour so far.
    pub(crate) time_limit: Option<Duration>,
}

impl SolverSettings {
    pub(crate) fn new(parallel: bool, time_limit_ms: Option<u64>) -> Self {
        Self {
            parallel,
            time_limit: time_limit_ms.map(Duration::from_millis),
        }
    }

    pub(crate) fn build(self) -> Box<dyn Solver> {
        let config = self
            .time_limit
            .map_or_else(BranchAndBoundConfig::default, |limit| {
                BranchAndBoundConfig::default().with_time_limit(limit)
            });
        if self.parallel {
            log::debug!("using the parallel solver");
            Box::new(ParallelBranchAndBoundSolver::with_config(config))
        } else {
            Box::new(BranchAndBoundSolver::with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfarer_core::test_support::scenario_matrix;
    use wayfarer_core::{Optimality, TourKind};

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn both_variants_solve_exactly(#[case] parallel: bool) {
        let solver = SolverSettings::new(parallel, None).build();
        let tour = solver
            .solve(&scenario_matrix(), TourKind::Closed)
            .expect("solvable");
        assert_eq!(tour.path, vec![0, 1, 3, 2, 0]);
        assert_eq!(tour.optimality, Optimality::Proven);
    }

    #[rstest]
    fn time_limit_is_converted_from_millis() {
        let settings = SolverSettings::new(false, Some(1_500));
        assert_eq!(settings.time_limit, Some(Duration::from_millis(1_500)));
    }
}
