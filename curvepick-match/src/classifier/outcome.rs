use curvepick_core::{SeriesRef, TestPoint};

use super::PointError;

/// A test point accepted by one of the selected candidates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Assignment {
    /// The training series whose selection accepted the point.
    pub training: SeriesRef,

    /// The accepting candidate.
    pub candidate: SeriesRef,

    /// Absolute deviation between the point and the candidate at its x.
    pub deviation: f64,
}

/// How a test point was classified.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub enum Outcome {
    Assigned(Assignment),

    /// No selected candidate accepted the point.
    Unassigned,

    /// The point could not be evaluated.
    Rejected(PointError),
}

/// The classification of one test point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Classification {
    pub point: TestPoint,
    pub outcome: Outcome,
}

impl Classification {
    /// Returns the assignment, if the point was assigned.
    #[must_use]
    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.outcome {
            Outcome::Assigned(assignment) => Some(assignment),
            Outcome::Unassigned | Outcome::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.assignment().is_some()
    }
}
