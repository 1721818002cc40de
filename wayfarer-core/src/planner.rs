//! End-to-end planning: descriptors in, assembled route out.
//!
//! [`TourPlanner`] wires the registry, a geocoder, a distance provider and a
//! solver together for one invocation. Each stage runs to completion before
//! the next starts; failures are reported through [`PlanError`] and no
//! partial route is ever returned.

use std::time::Instant;

use thiserror::Error;

use crate::{
    DistanceProvider, Geocoder, LocationRegistry, MatrixBuildError, ProviderError, RegistryError,
    RouteError, RouteResult, SolveError, Solver, Tour, TourKind,
};

/// Errors returned by [`TourPlanner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The descriptors could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A descriptor could not be resolved to coordinates.
    #[error("failed to resolve locations: {0}")]
    Geocode(#[source] ProviderError),
    /// The distance matrix could not be built.
    #[error("failed to build distance matrix: {0}")]
    Distances(#[from] MatrixBuildError),
    /// The solver rejected the matrix.
    #[error("solver failed: {0}")]
    Solve(#[from] SolveError),
    /// The solved path did not map back onto the registry.
    #[error("failed to assemble route: {0}")]
    Route(#[from] RouteError),
}

/// Result of a successful plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TourPlan {
    /// Raw solver output.
    pub tour: Tour,
    /// The assembled route with descriptors and coordinates.
    pub route: RouteResult,
}

/// Plan an optimal tour from free-form descriptors.
///
/// The planner is generic over the engine boundaries: a distance provider,
/// a geocoder and a solver.
#[derive(Debug, Clone)]
pub struct TourPlanner<D, G, S>
where
    D: DistanceProvider,
    G: Geocoder,
    S: Solver,
{
    distances: D,
    geocoder: G,
    solver: S,
}

impl<D, G, S> TourPlanner<D, G, S>
where
    D: DistanceProvider,
    G: Geocoder,
    S: Solver,
{
    /// Construct a planner from its collaborators.
    pub const fn new(distances: D, geocoder: G, solver: S) -> Self {
        Self {
            distances,
            geocoder,
            solver,
        }
    }

    /// Plan a tour from `origin` through every destination.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] from the first failing stage.
    pub fn plan<T>(
        &self,
        origin: &str,
        destinations: &[T],
        kind: TourKind,
    ) -> Result<TourPlan, PlanError>
    where
        T: AsRef<str>,
    {
        let started_at = Instant::now();
        let registry = LocationRegistry::register(origin, destinations)?
            .resolve_with(&self.geocoder)
            .map_err(PlanError::Geocode)?;
        log::info!("resolved {} location(s)", registry.len());

        let matrix = self.distances.distance_matrix(registry.nodes())?;
        let tour = self.solver.solve_for(registry.len(), &matrix, kind)?;
        log::info!(
            "solved {kind:?} tour over {} node(s): {} km",
            registry.len(),
            tour.distance
        );

        let route = RouteResult::assemble(&tour.path, &matrix, registry.nodes(), kind)?;
        log::debug!(
            "planning finished in {:?} ({} search node(s) expanded)",
            started_at.elapsed(),
            tour.diagnostics.nodes_expanded
        );
        Ok(TourPlan { tour, route })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    use crate::test_support::{
        BruteForceSolver, FailingDistanceProvider, FixedGeocoder, MatrixDistanceProvider,
        scenario_matrix,
    };

    const DESTINATIONS: [&str; 3] = ["one", "two", "three"];

    #[fixture]
    fn geocoder() -> FixedGeocoder {
        ["origin", "one", "two", "three"]
            .into_iter()
            .zip(0_u32..)
            .fold(FixedGeocoder::new(), |geocoder, (name, offset)| {
                geocoder.with_location(name, Coord {
                    x: f64::from(offset),
                    y: 45.0,
                })
            })
    }

    #[rstest]
    #[case(TourKind::Closed, vec![0, 1, 3, 2, 0], 80.0)]
    #[case(TourKind::Open, vec![0, 1, 3, 2], 65.0)]
    fn plans_scenario_routes(
        geocoder: FixedGeocoder,
        #[case] kind: TourKind,
        #[case] expected_path: Vec<usize>,
        #[case] expected_distance: f64,
    ) {
        let planner = TourPlanner::new(
            MatrixDistanceProvider::new(scenario_matrix()),
            geocoder,
            BruteForceSolver,
        );
        let plan = planner
            .plan("origin", &DESTINATIONS, kind)
            .expect("plan succeeds");

        assert_eq!(plan.tour.path, expected_path);
        assert_eq!(plan.tour.distance, expected_distance);
        assert_eq!(plan.route.indices(), expected_path);
        assert_eq!(plan.route.total_distance(), expected_distance);
        assert!(plan.route.stops().iter().all(|stop| stop.location.is_some()));
    }

    #[rstest]
    fn provider_errors_abort_planning(geocoder: FixedGeocoder) {
        let planner = TourPlanner::new(
            FailingDistanceProvider::new(ProviderError::NetworkError {
                url: "http://localhost:5000".to_owned(),
                message: "connection refused".to_owned(),
            }),
            geocoder,
            BruteForceSolver,
        );
        let err = planner
            .plan("origin", &DESTINATIONS, TourKind::Open)
            .expect_err("provider down");
        assert!(matches!(
            err,
            PlanError::Distances(MatrixBuildError::Provider(
                ProviderError::NetworkError { .. }
            ))
        ));
    }

    #[rstest]
    fn unknown_places_fail_geocoding() {
        let planner = TourPlanner::new(
            MatrixDistanceProvider::new(scenario_matrix()),
            FixedGeocoder::new(),
            BruteForceSolver,
        );
        let err = planner
            .plan("origin", &DESTINATIONS, TourKind::Open)
            .expect_err("nothing resolvable");
        assert!(matches!(err, PlanError::Geocode(ProviderError::NotFound { .. })));
    }

    #[rstest]
    fn duplicate_origin_is_reported(geocoder: FixedGeocoder) {
        let planner = TourPlanner::new(
            MatrixDistanceProvider::new(scenario_matrix()),
            geocoder,
            BruteForceSolver,
        );
        let err = planner
            .plan("origin", &["one", "ORIGIN"], TourKind::Open)
            .expect_err("duplicate origin");
        assert!(matches!(
            err,
            PlanError::Registry(RegistryError::DuplicateOrigin { position: 2, .. })
        ));
    }
}
