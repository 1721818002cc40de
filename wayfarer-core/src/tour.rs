//! Solver output: an ordered visiting sequence and its cost.

use std::time::Duration;

/// Whether a tour returns to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TourKind {
    /// Stop after the last destination.
    #[default]
    Open,
    /// Travel back to the origin after the last destination.
    Closed,
}

impl TourKind {
    /// Map a "loop back to the origin" flag onto a tour kind.
    #[must_use]
    pub const fn from_loop(loop_back: bool) -> Self {
        if loop_back { Self::Closed } else { Self::Open }
    }

    /// Whether the tour ends at the origin.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// How much confidence the solver places in a returned tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Optimality {
    /// The search ran to exhaustion; the tour is a true optimum.
    #[default]
    Proven,
    /// A time limit stopped the search; the tour is the best found so far.
    BestFound,
}

/// Counters describing one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time spent searching.
    pub solve_time: Duration,
    /// Search-tree nodes visited, complete paths included.
    pub nodes_expanded: u64,
    /// Partial paths discarded by the bound.
    pub branches_pruned: u64,
    /// Complete paths scored against the incumbent.
    pub complete_paths: u64,
}

/// Best visiting order found for a distance matrix.
///
/// `path` starts at the origin (index 0). Closed tours end with the origin
/// again, except for the single-node case where the path is just `[0]`.
///
/// # Examples
/// ```
/// use wayfarer_core::{Tour, TourKind};
///
/// let tour = Tour::new(vec![0, 2, 1, 0], 42.0, TourKind::Closed);
/// assert!(tour.is_valid_for(3));
/// assert_eq!(tour.stops().collect::<Vec<_>>(), vec![2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    /// Node indices in visiting order.
    pub path: Vec<usize>,
    /// Total cost of the path, return edge included for closed tours.
    pub distance: f64,
    /// Open or closed.
    pub kind: TourKind,
    /// Whether the search was exhaustive.
    pub optimality: Optimality,
    /// Search statistics.
    pub diagnostics: Diagnostics,
}

impl Tour {
    /// Construct a proven tour with empty diagnostics.
    #[must_use]
    pub fn new(path: Vec<usize>, distance: f64, kind: TourKind) -> Self {
        Self {
            path,
            distance,
            kind,
            optimality: Optimality::Proven,
            diagnostics: Diagnostics::default(),
        }
    }

    /// The single-node tour: the origin alone, for either kind.
    #[must_use]
    pub fn origin_only(kind: TourKind) -> Self {
        Self::new(vec![0], 0.0, kind)
    }

    /// Destinations in visiting order, excluding the origin at either end.
    pub fn stops(&self) -> impl Iterator<Item = usize> + '_ {
        self.path.iter().copied().filter(|&index| index != 0)
    }

    /// Check the path invariants against a matrix of `size` nodes.
    ///
    /// The path must start at 0 and visit every index in `1..size` exactly
    /// once; a closed tour additionally ends at 0.
    #[must_use]
    pub fn is_valid_for(&self, size: usize) -> bool {
        if size == 1 {
            return self.path == [0];
        }
        let (expected_len, body) = match self.kind {
            TourKind::Open => (size, self.path.get(1..)),
            TourKind::Closed => (size + 1, self.path.get(1..size)),
        };
        if self.path.len() != expected_len || self.path.first() != Some(&0) {
            return false;
        }
        if self.kind.is_closed() && self.path.last() != Some(&0) {
            return false;
        }
        let Some(body) = body else {
            return false;
        };
        let mut seen = vec![false; size];
        body.iter().all(|&index| {
            if index == 0 {
                return false;
            }
            match seen.get_mut(index) {
                Some(slot) if !*slot => {
                    *slot = true;
                    true
                }
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, TourKind::Open)]
    #[case(true, TourKind::Closed)]
    fn loop_flag_selects_kind(#[case] loop_back: bool, #[case] expected: TourKind) {
        assert_eq!(TourKind::from_loop(loop_back), expected);
    }

    #[rstest]
    #[case(vec![0, 1, 3, 2], TourKind::Open, true)]
    #[case(vec![0, 1, 3, 2, 0], TourKind::Closed, true)]
    #[case(vec![0, 1, 3, 2], TourKind::Closed, false)]
    #[case(vec![0, 1, 1, 2], TourKind::Open, false)]
    #[case(vec![1, 0, 3, 2], TourKind::Open, false)]
    #[case(vec![0, 1, 3, 4], TourKind::Open, false)]
    #[case(vec![0, 1, 0, 2, 3], TourKind::Closed, false)]
    fn validates_path_invariants(
        #[case] path: Vec<usize>,
        #[case] kind: TourKind,
        #[case] valid: bool,
    ) {
        assert_eq!(Tour::new(path, 0.0, kind).is_valid_for(4), valid);
    }

    #[rstest]
    #[case(TourKind::Open)]
    #[case(TourKind::Closed)]
    fn origin_only_tour_is_valid_for_single_node(#[case] kind: TourKind) {
        let tour = Tour::origin_only(kind);
        assert!(tour.is_valid_for(1));
        assert_eq!(tour.stops().count(), 0);
    }
}
