//! Function matching and test point assignment.
//!
//! The two phases run in strict order:
//!
//! 1. [`matcher::select_best`] picks, for every training series, the candidate
//!    with the smallest total squared deviation on the shared grid.
//! 2. [`classifier::assign`] maps each test point to at most one of the
//!    selected candidates, accepting it only within a multiple of that
//!    candidate's largest training residual.
//!
//! Both phases are pure functions of their inputs. Progress is reported
//! through an [`Observer`](curvepick_core::Observer) rather than logged.

pub mod classifier;
pub mod matcher;

pub use classifier::{Assignment, Classification, Outcome, assign, assign_unobserved};
pub use matcher::{Matches, Selection, select_best, select_best_unobserved};
