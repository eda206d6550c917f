use std::cmp::Ordering;

use thiserror::Error;

/// Errors that can occur when constructing a [`Grid`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("grid has no points")]
    Empty,

    #[error("grid value at index {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },

    #[error("grid is not strictly increasing at index {index}")]
    NotIncreasing { index: usize },
}

/// An ordered set of sample locations shared by a family of series.
///
/// A `Grid` is non-empty, finite, and strictly increasing. These invariants
/// are verified at construction time and preserved because the values are
/// never exposed mutably.
///
/// Two grids are equal only if they have the same length and the exact same
/// values in the same order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Grid(Vec<f64>);

impl Grid {
    /// Creates a grid from sample locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty, contains a non-finite value,
    /// or is not strictly increasing.
    pub fn new(values: Vec<f64>) -> Result<Self, GridError> {
        if values.is_empty() {
            return Err(GridError::Empty);
        }

        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(GridError::NonFinite { index, value });
            }
            if index > 0 && value <= values[index - 1] {
                return Err(GridError::NotIncreasing { index });
            }
        }

        Ok(Self(values))
    }

    /// Returns the sample locations.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of sample locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, since a grid holds at least one location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the smallest and largest sample locations.
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        // Non-empty by construction.
        [self.0[0], self.0[self.0.len() - 1]]
    }

    /// Returns true if `x` lies within the closed range of the grid.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        let [min, max] = self.bounds();
        min <= x && x <= max
    }

    /// Returns the index of `x` if it is exactly one of the sample locations.
    #[must_use]
    pub fn position(&self, x: f64) -> Option<usize> {
        self.0
            .binary_search_by(|value| value.partial_cmp(&x).unwrap_or(Ordering::Less))
            .ok()
    }
}
