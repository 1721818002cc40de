//! Exact branch-and-bound solver for fixed-origin tours.
//!
//! This crate provides [`BranchAndBoundSolver`] and
//! [`ParallelBranchAndBoundSolver`], implementations of the
//! [`Solver`](wayfarer_core::Solver) trait that return a provably shortest
//! visiting order starting at node 0. The bound is the accumulated length of
//! the partial path, which keeps the search exact but limits it to small
//! instances (a dozen or so locations).
//!
//! An optional time limit turns either solver into an anytime search that
//! returns the best tour found so far, flagged as
//! [`Optimality::BestFound`](wayfarer_core::Optimality::BestFound).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod parallel;
mod search;
mod solver;

pub use parallel::ParallelBranchAndBoundSolver;
pub use solver::{BranchAndBoundConfig, BranchAndBoundSolver, Pruning, solve};
