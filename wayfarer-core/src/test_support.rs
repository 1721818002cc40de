//! Deterministic in-memory collaborators for unit and behaviour tests.
//!
//! Everything here is available to other crates through the
//! `test-support` feature.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{
    DistanceMatrix, DistanceProvider, ExportError, Exporter, FeatureTable, Geocoder, Node,
    ProviderError, SolveError, Solver, Tour, TourKind,
};

/// The four-node symmetric matrix used throughout the scenario tests.
///
/// The optimal closed tour is `0 → 1 → 3 → 2 → 0` at 80 km and the optimal
/// open tour is `0 → 1 → 3 → 2` at 65 km.
#[must_use]
#[expect(
    clippy::expect_used,
    clippy::missing_panics_doc,
    reason = "the literal matrix is valid"
)]
pub fn scenario_matrix() -> DistanceMatrix {
    DistanceMatrix::new(vec![
        vec![0.0, 10.0, 15.0, 20.0],
        vec![10.0, 0.0, 35.0, 25.0],
        vec![15.0, 35.0, 0.0, 30.0],
        vec![20.0, 25.0, 30.0, 0.0],
    ])
    .expect("scenario matrix is valid")
}

/// Exhaustive solver enumerating every permutation in lexicographic order.
///
/// It never prunes, so it serves as the reference the branch-and-bound
/// solvers are checked against. Ties keep the first permutation seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForceSolver;

impl Solver for BruteForceSolver {
    fn solve(&self, matrix: &DistanceMatrix, kind: TourKind) -> Result<Tour, SolveError> {
        let size = matrix.size();
        if size <= 1 {
            return Ok(Tour::origin_only(kind));
        }
        let mut order: Vec<usize> = (1..size).collect();
        let mut best: Option<(Vec<usize>, f64)> = None;
        loop {
            let mut path = Vec::with_capacity(size + 1);
            path.push(0);
            path.extend_from_slice(&order);
            if kind.is_closed() {
                path.push(0);
            }
            if let Some(distance) = matrix.path_length(&path)
                && best.as_ref().is_none_or(|(_, current)| distance < *current)
            {
                best = Some((path, distance));
            }
            if !next_permutation(&mut order) {
                break;
            }
        }
        best.map(|(path, distance)| Tour::new(path, distance, kind))
            .ok_or(SolveError::DimensionMismatch {
                nodes: size,
                matrix: size,
            })
    }
}

/// Advance `items` to the next lexicographic permutation.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items
        .windows(2)
        .rposition(|pair| pair.first() < pair.get(1))
    else {
        return false;
    };
    let Some(&pivot_value) = items.get(pivot) else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&item| item > pivot_value) else {
        return false;
    };
    items.swap(pivot, successor);
    if let Some(tail) = items.get_mut(pivot + 1..) {
        tail.reverse();
    }
    true
}

/// Provider answering pairwise queries from a fixed matrix.
///
/// Nodes are looked up by their registry index. Every call is counted.
#[derive(Debug)]
pub struct MatrixDistanceProvider {
    matrix: DistanceMatrix,
    queries: AtomicUsize,
}

impl MatrixDistanceProvider {
    /// Answer queries from `matrix`.
    #[must_use]
    pub const fn new(matrix: DistanceMatrix) -> Self {
        Self {
            matrix,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of pairwise queries answered so far.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl DistanceProvider for MatrixDistanceProvider {
    fn distance(&self, from: &Node, to: &Node) -> Result<f64, ProviderError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.matrix
            .get(from.index, to.index)
            .ok_or_else(|| ProviderError::NoRoute {
                from: from.descriptor.clone(),
                to: to.descriptor.clone(),
            })
    }
}

/// Provider that fails every query with the same error.
#[derive(Debug, Clone)]
pub struct FailingDistanceProvider {
    error: ProviderError,
}

impl FailingDistanceProvider {
    /// Fail every query with `error`.
    #[must_use]
    pub const fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

impl DistanceProvider for FailingDistanceProvider {
    fn distance(&self, _from: &Node, _to: &Node) -> Result<f64, ProviderError> {
        Err(self.error.clone())
    }
}

/// Geocoder backed by a lookup table.
///
/// Descriptors are matched after trimming and ASCII lowercasing; unknown
/// descriptors yield [`ProviderError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    locations: HashMap<String, Coord<f64>>,
}

impl FixedGeocoder {
    /// An empty geocoder that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known location.
    #[must_use]
    pub fn with_location(mut self, descriptor: &str, location: Coord<f64>) -> Self {
        self.locations.insert(key(descriptor), location);
        self
    }
}

impl Geocoder for FixedGeocoder {
    fn resolve(&self, descriptor: &str) -> Result<Coord<f64>, ProviderError> {
        self.locations
            .get(&key(descriptor))
            .copied()
            .ok_or_else(|| ProviderError::NotFound {
                descriptor: descriptor.to_owned(),
            })
    }
}

fn key(descriptor: &str) -> String {
    descriptor.trim().to_ascii_lowercase()
}

/// Exporter that keeps every table it receives.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    tables: Mutex<Vec<FeatureTable>>,
}

impl RecordingExporter {
    /// Tables exported so far.
    #[must_use]
    pub fn tables(&self) -> Vec<FeatureTable> {
        self.tables
            .lock()
            .map(|tables| tables.clone())
            .unwrap_or_default()
    }
}

impl Exporter for RecordingExporter {
    fn export(&self, table: &FeatureTable) -> Result<usize, ExportError> {
        let points = table.points()?;
        self.tables
            .lock()
            .map_err(|err| ExportError::Storage {
                message: err.to_string(),
            })?
            .push(table.clone());
        Ok(points.len())
    }
}
