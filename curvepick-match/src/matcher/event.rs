use curvepick_core::{Fit, Series};

use super::Selection;

/// Event emitted by the matcher.
#[derive(Debug)]
pub enum Event<'a> {
    /// A training/candidate pair was scored.
    Scored {
        /// Position of the training series in its input slice.
        training_index: usize,
        training: &'a Series,
        /// Position of the candidate in its input slice.
        candidate_index: usize,
        candidate: &'a Series,
        fit: Fit,
    },
    /// All candidates were scored for a training series and one was chosen.
    Selected { selection: &'a Selection },
}
