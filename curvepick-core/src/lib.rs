//! Core types for curvepick.
//!
//! This crate defines the numeric building blocks that the matcher and
//! classifier work with:
//!
//! - [`Grid`]: a strictly increasing, finite sequence of sample locations
//! - [`Series`]: a named curve sampled on a shared [`Grid`]
//! - [`TestPoint`]: an observation that may fall between grid locations
//! - [`Fit`]: total squared and maximum absolute deviation between two series
//! - [`LinearInterp`]: evaluates a series between its grid locations
//! - [`Observer`]: receives events from a pipeline phase

mod deviation;
mod grid;
mod interpolation;
mod observer;
mod series;

pub use deviation::{Fit, point_deviation};
pub use grid::{Grid, GridError};
pub use interpolation::{InterpError, LinearInterp};
pub use observer::Observer;
pub use series::{Series, SeriesError, SeriesRef, TestPoint};
