//! Least-squares selection of candidate curves.
//!
//! # Algorithm
//!
//! For each training series `t` and every candidate `c` the matcher computes
//! the total deviation `Σ (t[i] - c[i])²` over the shared grid and keeps the
//! candidate with the strictly smallest total. Candidates are scanned in index
//! order, so an exact tie keeps the lower-indexed candidate. The largest
//! absolute residual of the winning pair is recorded alongside it and later
//! bounds the classifier's acceptance threshold.
//!
//! Every candidate is scored for every training series, giving
//! `O(training × candidates × grid)` work.
//!
//! # Observer Events
//!
//! - [`Event::Scored`] — once per training/candidate pair
//! - [`Event::Selected`] — once per training series, after all candidates

mod error;
mod event;
mod selection;


pub use error::{Error, Role};
pub use event::Event;
pub use selection::{Matches, Selection};

use curvepick_core::{Fit, Grid, Observer, Series};

/// Selects the best candidate for each training series.
///
/// # Errors
///
/// Returns an error if either slice is empty, if any series is sampled on a
/// grid other than the first training series' grid, if any series holds a
/// non-finite value, or if the squared deviations of a pair are too large to
/// sum in `f64`.
pub fn select_best<Obs>(
    training: &[Series],
    candidates: &[Series],
    mut observer: Obs,
) -> Result<Matches, Error>
where
    Obs: for<'a> Observer<Event<'a>>,
{
    validate(training, candidates)?;

    let mut selections = Vec::with_capacity(training.len());

    for (training_index, series) in training.iter().enumerate() {
        let mut best: Option<(usize, Fit)> = None;

        for (candidate_index, candidate) in candidates.iter().enumerate() {
            let fit = Fit::between(series.values(), candidate.values());

            observer.observe(&Event::Scored {
                training_index,
                training: series,
                candidate_index,
                candidate,
                fit,
            });

            if !fit.total.is_finite() {
                return Err(Error::DeviationOverflow {
                    training: series.reference(training_index),
                    candidate: candidate.reference(candidate_index),
                });
            }

            if best.is_none_or(|(_, best_fit)| fit.total < best_fit.total) {
                best = Some((candidate_index, fit));
            }
        }

        let (candidate_index, fit) = best.ok_or(Error::EmptyInput {
            role: Role::Candidate,
        })?;

        let selection = Selection {
            training: series.reference(training_index),
            candidate: candidates[candidate_index].reference(candidate_index),
            total_deviation: fit.total,
            max_deviation: fit.max,
        };

        observer.observe(&Event::Selected {
            selection: &selection,
        });

        selections.push(selection);
    }

    Ok(Matches::from(selections))
}

/// Selects the best candidate for each training series without observation.
///
/// # Errors
///
/// See [`select_best`].
pub fn select_best_unobserved(
    training: &[Series],
    candidates: &[Series],
) -> Result<Matches, Error> {
    select_best(training, candidates, ())
}

/// Checks that both inputs are non-empty, share one grid, and are finite.
fn validate(training: &[Series], candidates: &[Series]) -> Result<(), Error> {
    let Some(first) = training.first() else {
        return Err(Error::EmptyInput {
            role: Role::Training,
        });
    };
    if candidates.is_empty() {
        return Err(Error::EmptyInput {
            role: Role::Candidate,
        });
    }

    let grid: &Grid = first.grid();

    for (role, group) in [(Role::Training, training), (Role::Candidate, candidates)] {
        for (index, series) in group.iter().enumerate() {
            if !series.is_on(grid) {
                return Err(Error::GridMismatch {
                    role,
                    series: series.reference(index),
                });
            }

            if let Some((position, value)) = series.first_non_finite() {
                return Err(Error::InvalidSeriesData {
                    role,
                    series: series.reference(index),
                    index: position,
                    value,
                });
            }
        }
    }

    Ok(())
}
