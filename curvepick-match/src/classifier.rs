//! Threshold-based assignment of test points to selected candidates.
//!
//! # Algorithm
//!
//! Each test point `(x, y)` is compared against the candidate chosen for
//! every training series. The candidate is evaluated at `x` by linear
//! interpolation on its grid, and the point's deviation is `|y - f(x)|`.
//!
//! A candidate accepts the point when
//!
//! ```text
//! deviation <= threshold_factor * max_deviation
//! ```
//!
//! where `max_deviation` is the largest training residual recorded by the
//! matcher and `threshold_factor` defaults to √2. If several candidates accept
//! the point, the one with the smallest deviation wins, and exact ties go to
//! the lowest training index. A point no candidate accepts is
//! [`Outcome::Unassigned`].
//!
//! A point whose `x` lies outside a candidate's grid cannot be evaluated. It
//! is reported as [`Outcome::Rejected`] and the remaining points are still
//! classified.
//!
//! # Observer Events
//!
//! - [`Event::Classified`] — once per test point, in input order

mod config;
mod error;
mod event;
mod outcome;
mod summary;


pub use config::{Config, ConfigError};
pub use error::{Error, PointError};
pub use event::Event;
pub use outcome::{Assignment, Classification, Outcome};
pub use summary::Summary;

use curvepick_core::{LinearInterp, Observer, Series, TestPoint, point_deviation};

use crate::matcher::{Matches, Selection};

/// Classifies test points against the selected candidates.
///
/// The returned classifications are in the same order as `points`.
///
/// # Errors
///
/// Returns an error if a selection refers to a candidate that is not present
/// in `candidates` at the recorded index and name, or if a candidate cannot be
/// prepared for interpolation. Problems with individual points never fail the
/// call; they are reported per point as [`Outcome::Rejected`].
pub fn assign<Obs>(
    points: &[TestPoint],
    matches: &Matches,
    candidates: &[Series],
    config: &Config,
    mut observer: Obs,
) -> Result<Vec<Classification>, Error>
where
    Obs: for<'a> Observer<Event<'a>>,
{
    let targets = matches
        .iter()
        .map(|selection| Target::new(selection, candidates, config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut classifications = Vec::with_capacity(points.len());

    for (index, &point) in points.iter().enumerate() {
        let classification = Classification {
            point,
            outcome: classify(index, point, &targets),
        };

        observer.observe(&Event::Classified {
            index,
            classification: &classification,
        });

        classifications.push(classification);
    }

    Ok(classifications)
}

/// Classifies test points without observation.
///
/// # Errors
///
/// See [`assign`].
pub fn assign_unobserved(
    points: &[TestPoint],
    matches: &Matches,
    candidates: &[Series],
    config: &Config,
) -> Result<Vec<Classification>, Error> {
    assign(points, matches, candidates, config, ())
}

/// A selected candidate prepared for evaluation.
struct Target<'a> {
    selection: &'a Selection,
    interp: LinearInterp,
    threshold: f64,
}

impl<'a> Target<'a> {
    fn new(
        selection: &'a Selection,
        candidates: &[Series],
        config: &Config,
    ) -> Result<Self, Error> {
        let candidate = candidates
            .get(selection.candidate.index)
            .filter(|series| series.name() == selection.candidate.name)
            .ok_or_else(|| Error::UnknownCandidate {
                training: selection.training.clone(),
                candidate: selection.candidate.clone(),
            })?;

        let interp = LinearInterp::new(candidate).map_err(|source| Error::Interpolator {
            candidate: selection.candidate.clone(),
            source,
        })?;

        Ok(Self {
            selection,
            interp,
            threshold: config.threshold(selection.max_deviation),
        })
    }
}

/// Applies the acceptance rule to one point.
fn classify(index: usize, point: TestPoint, targets: &[Target<'_>]) -> Outcome {
    let TestPoint { x, y } = point;

    if !point.is_finite() {
        return Outcome::Rejected(PointError::NonFinite { index, x, y });
    }

    let mut best: Option<(&Target<'_>, f64)> = None;

    for target in targets {
        // Inside the grid range evaluation cannot fail, so any error means
        // the point lies outside it.
        let Ok(expected) = target.interp.at(x) else {
            let [min, max] = target.interp.bounds();
            return Outcome::Rejected(PointError::OutOfRange { index, x, min, max });
        };

        let deviation = point_deviation(y, expected);
        let accepted = deviation <= target.threshold;
        let is_better = best.is_none_or(|(_, best_deviation)| deviation < best_deviation);

        if accepted && is_better {
            best = Some((target, deviation));
        }
    }

    match best {
        Some((target, deviation)) => Outcome::Assigned(Assignment {
            training: target.selection.training.clone(),
            candidate: target.selection.candidate.clone(),
            deviation,
        }),
        None => Outcome::Unassigned,
    }
}
