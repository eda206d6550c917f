use curvepick_core::SeriesRef;

/// The candidate chosen for one training series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Selection {
    /// The training series this selection belongs to.
    pub training: SeriesRef,

    /// The candidate with the smallest total deviation.
    pub candidate: SeriesRef,

    /// Sum of squared differences between training and candidate values.
    pub total_deviation: f64,

    /// Largest absolute difference at any grid location.
    pub max_deviation: f64,
}

/// Selections for every training series, in training order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-derive", serde(transparent))]
pub struct Matches(Vec<Selection>);

impl Matches {
    /// Returns the selection for the training series named `training`.
    #[must_use]
    pub fn get(&self, training: &str) -> Option<&Selection> {
        self.0.iter().find(|s| s.training.name == training)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Selection] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Selection>> for Matches {
    fn from(selections: Vec<Selection>) -> Self {
        Self(selections)
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
