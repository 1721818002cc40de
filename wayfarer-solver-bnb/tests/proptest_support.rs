//! Proptest strategies for branch-and-bound property tests.
//!
//! Matrices are generated from integer weights so that path sums are exact
//! and distance comparisons between solvers never depend on rounding.

use proptest::prelude::*;
use wayfarer_core::{DistanceMatrix, TourKind};

/// Strategy for a valid, possibly asymmetric matrix of `min..=max` nodes.
pub fn matrix_strategy(min_size: usize, max_size: usize) -> impl Strategy<Value = DistanceMatrix> {
    (min_size..=max_size).prop_flat_map(|size| {
        proptest::collection::vec(0_u16..=500, size * size).prop_map(move |cells| {
            DistanceMatrix::from_fn(size, |from, to| {
                if from == to {
                    0.0
                } else {
                    cells
                        .get(from * size + to)
                        .copied()
                        .map_or(0.0, f64::from)
                }
            })
            .expect("generated weights are finite and non-negative")
        })
    })
}

/// Strategy for a symmetric matrix of `min..=max` nodes.
pub fn symmetric_matrix_strategy(
    min_size: usize,
    max_size: usize,
) -> impl Strategy<Value = DistanceMatrix> {
    matrix_strategy(min_size, max_size).prop_map(|matrix| {
        DistanceMatrix::from_fn(matrix.size(), |from, to| {
            matrix.weight(from.min(to), from.max(to))
        })
        .expect("mirrored weights stay valid")
    })
}

/// Strategy for either tour kind.
pub fn kind_strategy() -> impl Strategy<Value = TourKind> {
    prop_oneof![Just(TourKind::Open), Just(TourKind::Closed)]
}
