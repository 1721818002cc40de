//! Route assembly: map a solved index path back onto registered nodes.

use std::fmt;

use geo::Coord;
use thiserror::Error;

use crate::{DistanceMatrix, Node, TourKind};

/// Errors returned by [`RouteResult::assemble`].
///
/// These indicate an internal inconsistency between the solver output and
/// the registry; they never occur for a path produced from the same matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The path was empty.
    #[error("route path must contain at least the origin")]
    Empty,
    /// A path index has no registered node.
    #[error("path refers to node {index}, which is not registered")]
    MissingNode {
        /// The unknown index.
        index: usize,
    },
    /// A path edge is outside the matrix.
    #[error("edge {from} -> {to} is not covered by the distance matrix")]
    MissingEdge {
        /// Source node index.
        from: usize,
        /// Target node index.
        to: usize,
    },
}

/// One stop of an assembled route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStop {
    /// Registry index of the node.
    pub index: usize,
    /// Descriptor as registered.
    pub descriptor: String,
    /// Edge weight from the previous stop; `0.0` for the first stop.
    pub distance_from_previous: f64,
    /// Resolved position (`x = longitude`, `y = latitude`), if known.
    pub location: Option<Coord<f64>>,
    /// Coordinate reference system of `location`.
    pub crs_label: String,
}

impl RouteStop {
    /// Latitude of the stop, if resolved.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        self.location.map(|coord| coord.y)
    }

    /// Longitude of the stop, if resolved.
    #[must_use]
    pub fn long(&self) -> Option<f64> {
        self.location.map(|coord| coord.x)
    }

    fn from_node(node: &Node, distance_from_previous: f64) -> Self {
        Self {
            index: node.index,
            descriptor: node.descriptor.clone(),
            distance_from_previous,
            location: node.location,
            crs_label: node.crs_label.clone(),
        }
    }
}

/// The final ordered route with per-edge distances.
///
/// # Examples
/// ```
/// use wayfarer_core::{DistanceMatrix, LocationRegistry, RouteResult, TourKind};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = LocationRegistry::register("home", &["shop"])?;
/// let matrix = DistanceMatrix::new(vec![vec![0.0, 2.5], vec![3.0, 0.0]])?;
/// let route = RouteResult::assemble(&[0, 1, 0], &matrix, registry.nodes(), TourKind::Closed)?;
///
/// assert_eq!(route.stops().len(), 3);
/// assert_eq!(route.total_distance(), 5.5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    stops: Vec<RouteStop>,
    kind: TourKind,
}

impl RouteResult {
    /// Assemble the route for `path` from the matrix and registered nodes.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when `path` is empty or refers to an index
    /// missing from `nodes` or `matrix`.
    pub fn assemble(
        path: &[usize],
        matrix: &DistanceMatrix,
        nodes: &[Node],
        kind: TourKind,
    ) -> Result<Self, RouteError> {
        let Some(&first) = path.first() else {
            return Err(RouteError::Empty);
        };
        let mut stops = Vec::with_capacity(path.len());
        stops.push(RouteStop::from_node(lookup(nodes, first)?, 0.0));
        for (&from, &to) in path.iter().zip(path.iter().skip(1)) {
            let distance = matrix
                .get(from, to)
                .ok_or(RouteError::MissingEdge { from, to })?;
            stops.push(RouteStop::from_node(lookup(nodes, to)?, distance));
        }
        Ok(Self { stops, kind })
    }

    /// Stops in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Whether the route returns to the origin.
    #[must_use]
    pub const fn kind(&self) -> TourKind {
        self.kind
    }

    /// Sum of the per-stop distances, accumulated from first to last.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "route totals are sums of floating-point edge weights"
    )]
    pub fn total_distance(&self) -> f64 {
        self.stops
            .iter()
            .fold(0.0, |total, stop| total + stop.distance_from_previous)
    }

    /// Registry indices in visiting order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.stops.iter().map(|stop| stop.index).collect()
    }
}

fn lookup(nodes: &[Node], index: usize) -> Result<&Node, RouteError> {
    nodes.get(index).ok_or(RouteError::MissingNode { index })
}

impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimal path:")?;
        writeln!(f)?;
        for (position, stop) in self.stops.iter().enumerate() {
            writeln!(
                f,
                "- {position} - {} ({} km)",
                stop.descriptor, stop.distance_from_previous
            )?;
        }
        writeln!(f)?;
        write!(f, "Optimal distance: {} km", self.total_distance())
    }
}
