use std::collections::BTreeMap;

use super::{Classification, Outcome};

/// Counts of classification outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Summary {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub rejected: usize,
    /// Assigned points per candidate name.
    pub per_candidate: BTreeMap<String, usize>,
}

impl Summary {
    #[must_use]
    pub fn of(classifications: &[Classification]) -> Self {
        let mut summary = Self {
            total: classifications.len(),
            ..Self::default()
        };

        for classification in classifications {
            match &classification.outcome {
                Outcome::Assigned(assignment) => {
                    summary.assigned += 1;
                    *summary
                        .per_candidate
                        .entry(assignment.candidate.name.clone())
                        .or_default() += 1;
                }
                Outcome::Unassigned => summary.unassigned += 1,
                Outcome::Rejected(_) => summary.rejected += 1,
            }
        }

        summary
    }
}
