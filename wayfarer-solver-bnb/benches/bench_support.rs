//! Benchmark support utilities for the branch-and-bound solvers.
//!
//! Generates deterministic point sets and Euclidean distance matrices so
//! benchmark runs are comparable across machines and commits.

use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wayfarer_core::{DistanceMatrix, MatrixError};

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Side length of the square the points are scattered over, in kilometres.
const AREA_SIZE_KM: f64 = 20.0;

/// Scatter `count` points uniformly over the benchmark area.
#[must_use]
pub fn generate_points(count: usize, seed: u64) -> Vec<Coord<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Coord {
            x: rng.gen_range(0.0..AREA_SIZE_KM),
            y: rng.gen_range(0.0..AREA_SIZE_KM),
        })
        .collect()
}

/// Build a symmetric matrix of straight-line distances between `points`.
///
/// # Errors
///
/// Returns a [`MatrixError`] when `points` is empty.
#[expect(clippy::float_arithmetic, reason = "Euclidean distance")]
pub fn euclidean_matrix(points: &[Coord<f64>]) -> Result<DistanceMatrix, MatrixError> {
    DistanceMatrix::from_fn(points.len(), |from, to| {
        match (points.get(from), points.get(to)) {
            (Some(a), Some(b)) if from != to => (a.x - b.x).hypot(a.y - b.y),
            _ => 0.0,
        }
    })
}
