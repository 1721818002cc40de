//! Behavioural tests for the branch-and-bound solvers using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfarer_core::{DistanceMatrix, Optimality, SolveError, Solver, Tour, TourKind};
use wayfarer_solver_bnb::{BranchAndBoundSolver, ParallelBranchAndBoundSolver};

#[derive(Debug, Clone, Copy, Default)]
enum SolverChoice {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Default)]
struct SolverWorld {
    rows: RefCell<Vec<Vec<f64>>>,
    solver: RefCell<SolverChoice>,
    outcome: RefCell<Option<Result<Tour, SolveError>>>,
}

impl SolverWorld {
    fn solve(&self, kind: TourKind) {
        let rows = self.rows.borrow().clone();
        let result = DistanceMatrix::new(rows)
            .map_err(SolveError::from)
            .and_then(|matrix| match *self.solver.borrow() {
                SolverChoice::Sequential => BranchAndBoundSolver::new().solve(&matrix, kind),
                SolverChoice::Parallel => ParallelBranchAndBoundSolver::new().solve(&matrix, kind),
            });
        *self.outcome.borrow_mut() = Some(result);
    }

    fn tour(&self) -> Tour {
        self.outcome
            .borrow()
            .as_ref()
            .and_then(|result| result.as_ref().ok())
            .cloned()
            .expect("expected a solved tour")
    }
}

#[fixture]
fn world() -> SolverWorld {
    SolverWorld::default()
}

// --- Given steps ---

#[given("the four-location sample matrix")]
fn sample_matrix(world: &SolverWorld) {
    *world.rows.borrow_mut() = vec![
        vec![0.0, 10.0, 15.0, 20.0],
        vec![10.0, 0.0, 35.0, 25.0],
        vec![15.0, 35.0, 0.0, 30.0],
        vec![20.0, 25.0, 30.0, 0.0],
    ];
}

#[given("a matrix containing only the origin")]
fn origin_only(world: &SolverWorld) {
    *world.rows.borrow_mut() = vec![vec![0.0]];
}

#[given("rows with a negative weight")]
fn negative_weight(world: &SolverWorld) {
    *world.rows.borrow_mut() = vec![vec![0.0, -1.0], vec![1.0, 0.0]];
}

#[given("rows that do not form a square")]
fn ragged_rows(world: &SolverWorld) {
    *world.rows.borrow_mut() = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0]];
}

#[given("the parallel solver")]
fn parallel_solver(world: &SolverWorld) {
    *world.solver.borrow_mut() = SolverChoice::Parallel;
}

// --- When steps ---

#[when("I solve a closed tour")]
fn solve_closed(world: &SolverWorld) {
    world.solve(TourKind::Closed);
}

#[when("I solve an open tour")]
fn solve_open(world: &SolverWorld) {
    world.solve(TourKind::Open);
}

// --- Then steps ---

#[then("the path is 0, 1, 3, 2, 0")]
fn closed_path(world: &SolverWorld) {
    assert_eq!(world.tour().path, vec![0, 1, 3, 2, 0]);
}

#[then("the path is 0, 1, 3, 2")]
fn open_path(world: &SolverWorld) {
    assert_eq!(world.tour().path, vec![0, 1, 3, 2]);
}

#[then("the path is 0")]
fn origin_path(world: &SolverWorld) {
    assert_eq!(world.tour().path, vec![0]);
}

#[then("the distance is 80 km")]
fn distance_eighty(world: &SolverWorld) {
    assert_eq!(world.tour().distance, 80.0);
}

#[then("the distance is 65 km")]
fn distance_sixty_five(world: &SolverWorld) {
    assert_eq!(world.tour().distance, 65.0);
}

#[then("the distance is 0 km")]
fn distance_zero(world: &SolverWorld) {
    assert_eq!(world.tour().distance, 0.0);
}

#[then("optimality is proven")]
fn proven(world: &SolverWorld) {
    assert_eq!(world.tour().optimality, Optimality::Proven);
}

#[then("an invalid input error is returned")]
fn invalid_input(world: &SolverWorld) {
    let outcome = world.outcome.borrow();
    assert!(
        matches!(outcome.as_ref(), Some(Err(SolveError::InvalidInput(_)))),
        "expected InvalidInput, got {outcome:?}"
    );
}

// --- Scenario registrations ---

#[scenario(path = "tests/features/scenarios.feature", index = 0)]
fn closed_tour(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 1)]
fn open_tour(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 2)]
fn single_location(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 3)]
fn negative_weight_rejected(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 4)]
fn ragged_rows_rejected(world: SolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 5)]
fn parallel_agreement(world: SolverWorld) {
    let _ = world;
}
