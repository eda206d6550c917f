use std::sync::Arc;

use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use thiserror::Error;

use crate::{Grid, Series};

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("x = {x} is outside the grid range [{min}, {max}]")]
    OutOfRange { x: f64, min: f64, max: f64 },
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// Piecewise-linear evaluation of a [`Series`] between its grid locations.
///
/// Locations that fall exactly on the grid return the stored value without
/// any arithmetic. Anything else is interpolated from the two bracketing grid
/// locations. Extrapolation is never performed.
pub struct LinearInterp {
    grid: Arc<Grid>,
    values: Vec<f64>,
    // A single-location grid can only be hit exactly, so it has no interpolator.
    inner: Option<Interp1DOwned<f64, Linear>>,
}

impl LinearInterp {
    /// Builds an interpolator over a series.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying interpolator rejects the grid or
    /// the series values.
    pub fn new(series: &Series) -> Result<Self, InterpError> {
        let grid = Arc::clone(series.grid());
        let values = series.values().to_vec();

        let inner = if grid.len() > 1 {
            Some(Interp1DOwned::new(
                Array1::from(grid.as_slice().to_vec()),
                Array1::from(values.clone()),
                Linear,
                Extrapolate::Error,
            )?)
        } else {
            None
        };

        Ok(Self {
            grid,
            values,
            inner,
        })
    }

    /// Returns the closed range of x values this interpolator accepts.
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        self.grid.bounds()
    }

    /// Evaluates the series at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::OutOfRange`] if `x` lies outside the grid,
    /// including when `x` is not finite.
    pub fn at(&self, x: f64) -> Result<f64, InterpError> {
        if !self.grid.contains(x) {
            let [min, max] = self.bounds();
            return Err(InterpError::OutOfRange { x, min, max });
        }

        if let Some(index) = self.grid.position(x) {
            return Ok(self.values[index]);
        }

        match &self.inner {
            Some(interp) => interp.interpolate(&[x]).map_err(Into::into),
            // In range on a single-location grid means on the grid.
            None => Ok(self.values[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn series(x: Vec<f64>, y: Vec<f64>) -> Series {
        let grid = Arc::new(Grid::new(x).expect("valid grid"));
        Series::new("f", grid, y).expect("valid series")
    }

    #[test]
    fn interpolates_between_grid_points() {
        let interp = LinearInterp::new(&series(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]))
            .expect("valid interpolator");

        assert_relative_eq!(interp.at(0.5).unwrap(), 0.5);
        assert_relative_eq!(interp.at(1.25).unwrap(), 0.75);
    }

    #[test]
    fn grid_points_return_stored_values_exactly() {
        let x = vec![0.0, 0.1, 0.2, 0.3];
        let y = vec![1.0 / 3.0, 2.0 / 7.0, 0.1 + 0.2, -5.5e-3];
        let interp = LinearInterp::new(&series(x.clone(), y.clone())).expect("valid interpolator");

        for (xi, yi) in x.into_iter().zip(y) {
            assert_eq!(interp.at(xi).unwrap().to_bits(), yi.to_bits());
        }
    }

    #[test]
    fn rejects_points_outside_the_grid() {
        let interp = LinearInterp::new(&series(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]))
            .expect("valid interpolator");

        for x in [10.0, -0.001, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(interp.at(x), Err(InterpError::OutOfRange { .. })),
                "x = {x} should be out of range"
            );
        }
    }

    #[test]
    fn single_point_grid_only_matches_exactly() {
        let interp =
            LinearInterp::new(&series(vec![4.0], vec![9.0])).expect("valid interpolator");

        assert_relative_eq!(interp.at(4.0).unwrap(), 9.0);
        assert!(matches!(interp.at(4.5), Err(InterpError::OutOfRange { .. })));
    }

    #[test]
    fn negative_zero_hits_the_grid_point_at_zero() {
        let interp = LinearInterp::new(&series(vec![0.0, 1.0], vec![0.3, 0.7]))
            .expect("valid interpolator");
        assert_eq!(interp.at(-0.0).unwrap().to_bits(), 0.3_f64.to_bits());

        let single =
            LinearInterp::new(&series(vec![0.0], vec![2.0])).expect("valid interpolator");
        assert_relative_eq!(single.at(-0.0).unwrap(), 2.0);
    }

    #[test]
    fn shares_the_series_grid() {
        let s = series(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]);
        let interp = LinearInterp::new(&s).expect("valid interpolator");
        assert!(Arc::ptr_eq(&interp.grid, s.grid()));
    }
}
