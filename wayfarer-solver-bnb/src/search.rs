//! Depth-first branch-and-bound over visiting orders.
//!
//! A [`SearchState`] owns the partial path and incumbent for one subtree.
//! The sequential solver runs a single state from the origin; the parallel
//! solver runs one per first-level branch and lets them share a
//! [`SharedBound`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use wayfarer_core::{Diagnostics, DistanceMatrix, Optimality, SolveError, Tour, TourKind};

use crate::{BranchAndBoundConfig, Pruning};

/// Expansions between two deadline checks; a power of two for masking.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Incumbent distance shared between concurrent searches.
///
/// Stores the `f64` bit pattern. For non-negative floats the bit order
/// matches the numeric order, so `fetch_min` keeps the smallest distance.
#[derive(Debug)]
pub(crate) struct SharedBound(AtomicU64);

impl SharedBound {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(f64::INFINITY.to_bits()))
    }

    pub(crate) fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "adding +0.0 folds -0.0 into +0.0 before comparing bit patterns"
    )]
    fn offer(&self, distance: f64) {
        self.0.fetch_min((distance + 0.0).to_bits(), Ordering::AcqRel);
    }
}

/// Counters accumulated while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub(crate) nodes_expanded: u64,
    pub(crate) branches_pruned: u64,
    pub(crate) complete_paths: u64,
}

impl SearchStats {
    pub(crate) const fn merge(self, other: Self) -> Self {
        Self {
            nodes_expanded: self.nodes_expanded.saturating_add(other.nodes_expanded),
            branches_pruned: self.branches_pruned.saturating_add(other.branches_pruned),
            complete_paths: self.complete_paths.saturating_add(other.complete_paths),
        }
    }
}

/// Best complete path found by one search, before the closing origin is
/// appended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchOutcome {
    pub(crate) path: Vec<usize>,
    pub(crate) distance: f64,
    pub(crate) stats: SearchStats,
    pub(crate) timed_out: bool,
}

impl SearchOutcome {
    pub(crate) const fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Turn the incumbent into a [`Tour`].
    ///
    /// # Errors
    ///
    /// [`SolveError::TimedOut`] when the deadline passed before any complete
    /// path, [`SolveError::NoFiniteTour`] when every path overflowed.
    pub(crate) fn into_tour(
        self,
        kind: TourKind,
        time_limit: Option<Duration>,
        started_at: Instant,
    ) -> Result<Tour, SolveError> {
        let Self {
            mut path,
            distance,
            stats,
            timed_out,
        } = self;
        if path.is_empty() {
            return Err(match time_limit {
                Some(limit) if timed_out => SolveError::TimedOut {
                    limit_ms: limit.as_millis(),
                },
                _ => SolveError::NoFiniteTour,
            });
        }
        if kind.is_closed() {
            path.push(0);
        }
        let mut tour = Tour::new(path, distance, kind);
        tour.optimality = if timed_out {
            Optimality::BestFound
        } else {
            Optimality::Proven
        };
        tour.diagnostics = Diagnostics {
            solve_time: started_at.elapsed(),
            nodes_expanded: stats.nodes_expanded,
            branches_pruned: stats.branches_pruned,
            complete_paths: stats.complete_paths,
        };
        Ok(tour)
    }
}

/// Mutable state of one depth-first search.
#[derive(Debug)]
pub(crate) struct SearchState<'a> {
    matrix: &'a DistanceMatrix,
    kind: TourKind,
    pruning: Pruning,
    deadline: Option<Instant>,
    shared: Option<&'a SharedBound>,
    path: Vec<usize>,
    visited: Vec<bool>,
    best_path: Vec<usize>,
    best_distance: f64,
    stats: SearchStats,
    timed_out: bool,
}

impl<'a> SearchState<'a> {
    pub(crate) fn new(
        matrix: &'a DistanceMatrix,
        kind: TourKind,
        config: &BranchAndBoundConfig,
        started_at: Instant,
    ) -> Self {
        let size = matrix.size();
        Self {
            matrix,
            kind,
            pruning: config.pruning,
            deadline: config
                .time_limit
                .and_then(|limit| started_at.checked_add(limit)),
            shared: None,
            path: Vec::with_capacity(size.saturating_add(1)),
            visited: vec![false; size],
            best_path: Vec::new(),
            best_distance: f64::INFINITY,
            stats: SearchStats::default(),
            timed_out: false,
        }
    }

    /// Prune against, and publish improvements to, `shared`.
    pub(crate) const fn with_shared(mut self, shared: &'a SharedBound) -> Self {
        self.shared = Some(shared);
        self
    }

    /// Search every completion of `prefix`, which must start at the origin.
    pub(crate) fn run(mut self, prefix: &[usize]) -> SearchOutcome {
        let mut distance = 0.0;
        let mut previous = None;
        for &index in prefix {
            if let Some(slot) = self.visited.get_mut(index) {
                *slot = true;
            }
            if let Some(from) = previous {
                distance = accumulate(distance, self.matrix.weight(from, index));
            }
            self.path.push(index);
            previous = Some(index);
        }
        self.explore(distance);
        SearchOutcome {
            path: self.best_path,
            distance: self.best_distance,
            stats: self.stats,
            timed_out: self.timed_out,
        }
    }

    fn explore(&mut self, distance: f64) {
        if self.out_of_time() {
            return;
        }
        self.stats.nodes_expanded = self.stats.nodes_expanded.saturating_add(1);
        let size = self.matrix.size();
        let Some(&last) = self.path.last() else {
            return;
        };

        if self.path.len() == size {
            self.record_complete(last, distance);
            return;
        }

        if self.should_prune(distance) {
            self.stats.branches_pruned = self.stats.branches_pruned.saturating_add(1);
            return;
        }

        for next in 1..size {
            let Some(slot) = self.visited.get_mut(next) else {
                continue;
            };
            if *slot {
                continue;
            }
            *slot = true;
            self.path.push(next);
            self.explore(accumulate(distance, self.matrix.weight(last, next)));
            self.path.pop();
            if let Some(slot) = self.visited.get_mut(next) {
                *slot = false;
            }
        }
    }

    fn record_complete(&mut self, last: usize, distance: f64) {
        self.stats.complete_paths = self.stats.complete_paths.saturating_add(1);
        let total = if self.kind.is_closed() {
            accumulate(distance, self.matrix.weight(last, 0))
        } else {
            distance
        };
        if total < self.best_distance {
            log::trace!("new incumbent {total} for {:?}", self.path);
            self.best_distance = total;
            self.best_path.clone_from(&self.path);
            if let Some(shared) = self.shared {
                shared.offer(total);
            }
        }
    }

    fn should_prune(&self, distance: f64) -> bool {
        match self.pruning {
            Pruning::Disabled => false,
            // The shared bound uses `>` so an equal-cost path in an earlier
            // branch never cuts a later one that the merge would rank first.
            Pruning::Enabled => {
                distance >= self.best_distance
                    || self.shared.is_some_and(|shared| distance > shared.load())
            }
        }
    }

    fn out_of_time(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        let Some(deadline) = self.deadline else {
            return false;
        };
        if self.stats.nodes_expanded & (DEADLINE_CHECK_INTERVAL - 1) == 0
            && Instant::now() >= deadline
        {
            log::debug!(
                "time limit reached after {} expansion(s)",
                self.stats.nodes_expanded
            );
            self.timed_out = true;
        }
        self.timed_out
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "path lengths are sums of floating-point edge weights"
)]
fn accumulate(distance: f64, weight: f64) -> f64 {
    distance + weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfarer_core::test_support::scenario_matrix;

    #[rstest]
    fn shared_bound_keeps_minimum() {
        let bound = SharedBound::new();
        assert_eq!(bound.load(), f64::INFINITY);
        bound.offer(80.0);
        bound.offer(95.0);
        bound.offer(-0.0);
        assert_eq!(bound.load(), 0.0);
        assert!(bound.load().is_sign_positive());
    }

    #[rstest]
    fn prefix_restricts_search_to_subtree() {
        let matrix = scenario_matrix();
        let config = BranchAndBoundConfig::default();
        let outcome = SearchState::new(&matrix, TourKind::Open, &config, Instant::now())
            .run(&[0, 2]);
        assert_eq!(outcome.path, vec![0, 2, 3, 1]);
        assert_eq!(outcome.distance, 70.0);
        assert!(!outcome.timed_out);
    }

    #[rstest]
    fn disabled_pruning_scores_every_permutation() {
        let matrix = scenario_matrix();
        let config = BranchAndBoundConfig::default().with_pruning(Pruning::Disabled);
        let outcome =
            SearchState::new(&matrix, TourKind::Closed, &config, Instant::now()).run(&[0]);
        assert_eq!(outcome.stats.complete_paths, 6);
        assert_eq!(outcome.stats.branches_pruned, 0);
        assert_eq!(outcome.distance, 80.0);
    }

    #[rstest]
    fn expired_deadline_stops_before_any_path() {
        let matrix = scenario_matrix();
        let config = BranchAndBoundConfig::default().with_time_limit(Duration::ZERO);
        let started_at = Instant::now();
        let outcome = SearchState::new(&matrix, TourKind::Open, &config, started_at).run(&[0]);
        assert!(outcome.timed_out);
        assert!(!outcome.found());
        let err = outcome
            .into_tour(TourKind::Open, Some(Duration::ZERO), started_at)
            .expect_err("nothing found");
        assert_eq!(err, SolveError::TimedOut { limit_ms: 0 });
    }
}
