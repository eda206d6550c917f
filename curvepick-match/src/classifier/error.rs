use thiserror::Error;

use curvepick_core::{InterpError, SeriesRef};

/// Errors that abort a classification run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("selection for {training} refers to unknown candidate {candidate}")]
    UnknownCandidate {
        training: SeriesRef,
        candidate: SeriesRef,
    },

    #[error("cannot interpolate candidate {candidate}")]
    Interpolator {
        candidate: SeriesRef,
        #[source]
        source: InterpError,
    },
}

/// Reasons a single test point could not be classified.
///
/// These never abort a run. The point is reported as rejected and the
/// remaining points are still classified.
#[derive(Debug, Error, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub enum PointError {
    #[error("test point {index} has x = {x} outside the grid range [{min}, {max}]")]
    OutOfRange {
        index: usize,
        x: f64,
        min: f64,
        max: f64,
    },

    #[error("test point {index} is not finite: ({x}, {y})")]
    NonFinite { index: usize, x: f64, y: f64 },
}
