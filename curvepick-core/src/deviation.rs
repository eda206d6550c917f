/// Deviation between two series sampled on the same grid.
///
/// `total` is the least-squares measure used to rank candidates, and `max` is
/// the largest single-point residual, which later bounds the classifier's
/// acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
pub struct Fit {
    /// Sum of squared differences over the grid.
    pub total: f64,
    /// Largest absolute difference at any grid location.
    pub max: f64,
}

impl Fit {
    /// Computes the fit between two equally long value slices.
    ///
    /// Both measures are accumulated in a single pass. Callers are expected to
    /// have checked that the slices come from the same grid.
    #[must_use]
    pub fn between(reference: &[f64], candidate: &[f64]) -> Self {
        debug_assert_eq!(reference.len(), candidate.len());

        reference.iter().zip(candidate).fold(
            Self {
                total: 0.0,
                max: 0.0,
            },
            |fit, (a, b)| {
                let diff = (a - b).abs();
                Self {
                    total: fit.total + diff * diff,
                    max: fit.max.max(diff),
                }
            },
        )
    }
}

/// Absolute deviation of an observed value from an expected one.
#[must_use]
pub fn point_deviation(observed: f64, expected: f64) -> f64 {
    (observed - expected).abs()
}
