//! Behavioural tests for [`TourPlanner`] using in-memory collaborators.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use wayfarer_core::test_support::{
    BruteForceSolver, FixedGeocoder, MatrixDistanceProvider, scenario_matrix,
};
use wayfarer_core::{
    PlanError, ProviderError, RegistryError, TourKind, TourPlan, TourPlanner,
};

const PLACES: [&str; 4] = ["Origin", "Bakery", "Library", "Station"];

type Planner = TourPlanner<MatrixDistanceProvider, FixedGeocoder, BruteForceSolver>;
type OutcomeCell = RefCell<Option<Result<TourPlan, PlanError>>>;

#[fixture]
fn planner() -> RefCell<Option<Planner>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn known_places() -> FixedGeocoder {
    PLACES
        .iter()
        .zip([9.19, 9.21, 9.23, 9.25])
        .fold(FixedGeocoder::new(), |geocoder, (place, long)| {
            geocoder.with_location(place, Coord { x: long, y: 45.46 })
        })
}

fn plan(planner: &RefCell<Option<Planner>>, destinations: &[&str], kind: TourKind) -> Result<TourPlan, PlanError> {
    let guard = planner.borrow();
    let planner = guard.as_ref().expect("planner must be initialised");
    planner.plan(PLACES[0], destinations, kind)
}

#[given("four known places with pairwise distances")]
fn four_known_places(#[from(planner)] planner: &RefCell<Option<Planner>>) {
    *planner.borrow_mut() = Some(TourPlanner::new(
        MatrixDistanceProvider::new(scenario_matrix()),
        known_places(),
        BruteForceSolver,
    ));
}

#[given("a geocoder that knows no places")]
fn unknown_places(#[from(planner)] planner: &RefCell<Option<Planner>>) {
    *planner.borrow_mut() = Some(TourPlanner::new(
        MatrixDistanceProvider::new(scenario_matrix()),
        FixedGeocoder::new(),
        BruteForceSolver,
    ));
}

#[when("I plan a closed tour from the origin")]
fn plan_closed(
    #[from(planner)] planner: &RefCell<Option<Planner>>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    *outcome.borrow_mut() = Some(plan(planner, &PLACES[1..], TourKind::Closed));
}

#[when("I plan an open tour from the origin")]
fn plan_open(
    #[from(planner)] planner: &RefCell<Option<Planner>>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    *outcome.borrow_mut() = Some(plan(planner, &PLACES[1..], TourKind::Open));
}

#[when("I plan a tour that repeats the origin")]
fn plan_with_repeated_origin(
    #[from(planner)] planner: &RefCell<Option<Planner>>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    *outcome.borrow_mut() = Some(plan(planner, &["Bakery", " origin"], TourKind::Open));
}

#[then("the route visits 0, 1, 3, 2, 0")]
fn visits_closed_order(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let plan = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected a plan");
    assert_eq!(plan.route.indices(), vec![0, 1, 3, 2, 0]);
    assert_eq!(
        plan.route.stops().last().map(|stop| stop.descriptor.as_str()),
        Some("Origin")
    );
}

#[then("the route visits 0, 1, 3, 2")]
fn visits_open_order(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let plan = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected a plan");
    assert_eq!(plan.route.indices(), vec![0, 1, 3, 2]);
}

#[then("the total distance is 80 km")]
fn total_is_eighty(#[from(outcome)] outcome: &OutcomeCell) {
    assert_total(outcome, 80.0);
}

#[then("the total distance is 65 km")]
fn total_is_sixty_five(#[from(outcome)] outcome: &OutcomeCell) {
    assert_total(outcome, 65.0);
}

fn assert_total(outcome: &OutcomeCell, expected: f64) {
    let borrowed = outcome.borrow();
    let plan = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("expected a plan");
    assert_eq!(plan.tour.distance, expected);
    assert_eq!(plan.route.total_distance(), expected);
}

#[then("a geocoding error is returned")]
fn geocoding_error(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    assert!(
        matches!(
            borrowed.as_ref(),
            Some(Err(PlanError::Geocode(ProviderError::NotFound { .. })))
        ),
        "expected NotFound, got {borrowed:?}"
    );
}

#[then("a duplicate origin error is returned")]
fn duplicate_origin_error(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    assert!(
        matches!(
            borrowed.as_ref(),
            Some(Err(PlanError::Registry(RegistryError::DuplicateOrigin { position: 2, .. })))
        ),
        "expected DuplicateOrigin, got {borrowed:?}"
    );
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/planner.feature", name = $title)]
        fn $fn_name(planner: RefCell<Option<Planner>>, outcome: OutcomeCell) {
            let _ = (planner, outcome);
        }
    };
}

register_scenario!(closed_tour, "planning a closed tour over the sample places");
register_scenario!(open_tour, "planning an open tour over the sample places");
register_scenario!(unknown_place, "planning with an unknown place");
register_scenario!(repeated_origin, "planning with the origin listed as a destination");
