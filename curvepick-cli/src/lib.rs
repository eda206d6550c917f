//! The `curvepick` pipeline.
//!
//! Loads training data, ideal functions, and test data from CSV, selects the
//! best ideal function for every training series, maps the test data onto the
//! selected functions, and stores inputs and results in SQLite.
//!
//! The binary is a thin wrapper around [`run`] that sets up logging and
//! prints the [`report::render`] summary.

pub mod config;
pub mod pipeline;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;

pub use config::{Args, FileConfig, Settings};
pub use pipeline::{Outcome, run};
