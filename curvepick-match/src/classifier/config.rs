use std::f64::consts::SQRT_2;

use thiserror::Error;

/// Configuration for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    threshold_factor: f64,
}

/// Errors that can occur when validating a classifier config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("threshold_factor must be finite and non-negative")]
    ThresholdFactor,
}

impl Default for Config {
    /// Accepts points within √2 times the largest training residual.
    fn default() -> Self {
        Self {
            threshold_factor: SQRT_2,
        }
    }
}

impl Config {
    /// Creates a new config with a validated threshold factor.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold_factor` is negative or non-finite.
    pub fn new(threshold_factor: f64) -> Result<Self, ConfigError> {
        if !threshold_factor.is_finite() || threshold_factor < 0.0 {
            return Err(ConfigError::ThresholdFactor);
        }

        Ok(Self { threshold_factor })
    }

    /// Returns the multiplier applied to the largest training residual.
    #[must_use]
    pub fn threshold_factor(&self) -> f64 {
        self.threshold_factor
    }

    /// Returns the acceptance threshold for a candidate.
    #[must_use]
    pub fn threshold(&self, max_deviation: f64) -> f64 {
        self.threshold_factor * max_deviation
    }
}
