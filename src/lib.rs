//! Facade crate for the Wayfarer tour planner.
//!
//! This crate re-exports the core domain types and exposes the exact solver
//! and the HTTP/GeoPackage adapters behind feature flags.

#![forbid(unsafe_code)]

pub use wayfarer_core::{
    Diagnostics, DistanceMatrix, DistanceProvider, ExportError, Exporter, FeatureTable,
    FieldValue, Geocoder, GeometryColumns, LocationRegistry, MatrixBuildError, MatrixError, Node,
    Optimality, PlanError, ProviderError, RegistryError, RouteError, RouteResult, RouteStop,
    SolveError, Solver, Tour, TourKind, TourPlan, TourPlanner, WGS84,
};

#[cfg(feature = "solver-bnb")]
pub use wayfarer_solver_bnb::{
    BranchAndBoundConfig, BranchAndBoundSolver, ParallelBranchAndBoundSolver, Pruning,
};

#[cfg(feature = "data")]
pub use wayfarer_data::{
    ClientBuildError,
    geocode::{HttpGeocoder, HttpGeocoderConfig},
    gpkg::{GeoPackageError, GeoPackageExporter},
    routing::{HttpDistanceProvider, HttpDistanceProviderConfig, MatrixStrategy},
};
