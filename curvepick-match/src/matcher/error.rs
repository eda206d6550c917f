use std::fmt;

use thiserror::Error;

use curvepick_core::SeriesRef;

/// The part a series plays in a matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub enum Role {
    Training,
    Candidate,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Training => f.write_str("training"),
            Role::Candidate => f.write_str("candidate"),
        }
    }
}

/// Errors that abort a matching run.
///
/// Each of these describes a problem with the supplied data, so rerunning
/// with the same input fails the same way.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no {role} series were supplied")]
    EmptyInput { role: Role },

    #[error("{role} series {series} is not sampled on the shared grid")]
    GridMismatch { role: Role, series: SeriesRef },

    #[error("{role} series {series} has non-finite value {value} at index {index}")]
    InvalidSeriesData {
        role: Role,
        series: SeriesRef,
        index: usize,
        value: f64,
    },

    #[error("total deviation between {training} and {candidate} overflows f64")]
    DeviationOverflow {
        training: SeriesRef,
        candidate: SeriesRef,
    },
}
