//! Core domain types for the Wayfarer tour planner.
//!
//! The crate models the pieces of an exact fixed-origin travelling-salesman
//! run: a [`LocationRegistry`] of descriptors, a validated
//! [`DistanceMatrix`], the [`Solver`] boundary producing a [`Tour`], and the
//! [`RouteResult`] assembled from it. External services plug in through the
//! [`DistanceProvider`], [`Geocoder`] and [`Exporter`] traits.
//!
//! Constructors return `Result` so invalid input is rejected before any
//! search starts.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod export;
mod matrix;
mod node;
mod planner;
mod provider;
mod registry;
mod route;
mod solver;
mod tour;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use export::{ExportError, Exporter, FeatureTable, FieldValue, GeometryColumns};
pub use matrix::{DistanceMatrix, MatrixError};
pub use node::{Node, WGS84};
pub use planner::{PlanError, TourPlan, TourPlanner};
pub use provider::{
    DistanceProvider, Geocoder, MatrixBuildError, ProviderError, pairwise_matrix,
    parse_coordinate_literal,
};
pub use registry::{LocationRegistry, RegistryError};
pub use route::{RouteError, RouteResult, RouteStop};
pub use solver::{SolveError, Solver};
pub use tour::{Diagnostics, Optimality, Tour, TourKind};
