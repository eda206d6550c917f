use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::Grid;

/// Errors that can occur when constructing a [`Series`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series `{name}` has {values} values but its grid has {grid} points")]
    LengthMismatch {
        name: String,
        values: usize,
        grid: usize,
    },
}

/// A named curve sampled on a [`Grid`].
///
/// Training series and candidate series share the same representation; the
/// role a series plays is decided by which slice it is passed in.
///
/// Values are not required to be finite here. The matcher validates them so
/// that a bad value can be reported together with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    grid: Arc<Grid>,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series with one value per grid location.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of values differs from the grid length.
    pub fn new(
        name: impl Into<String>,
        grid: Arc<Grid>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();

        if values.len() != grid.len() {
            return Err(SeriesError::LengthMismatch {
                name,
                values: values.len(),
                grid: grid.len(),
            });
        }

        Ok(Self { name, grid, values })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns `(x, y)` pairs in grid order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.grid
            .as_slice()
            .iter()
            .zip(&self.values)
            .map(|(&x, &y)| [x, y])
    }

    /// Returns true if this series is sampled on exactly `grid`.
    #[must_use]
    pub fn is_on(&self, grid: &Grid) -> bool {
        std::ptr::eq(self.grid.as_ref(), grid) || *self.grid == *grid
    }

    /// Returns the first non-finite value and its index, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !value.is_finite())
    }

    /// Identifies this series by its position in an input slice.
    #[must_use]
    pub fn reference(&self, index: usize) -> SeriesRef {
        SeriesRef {
            index,
            name: self.name.clone(),
        }
    }
}

/// Identifies a series by its position in an input slice and its name.
///
/// Positions are what tie-breaking rules compare, so the lowest index wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct SeriesRef {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for SeriesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.index)
    }
}

/// An observation to classify, not necessarily on a grid location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct TestPoint {
    pub x: f64,
    pub y: f64,
}

impl TestPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
