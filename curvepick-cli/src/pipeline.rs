use std::{fs, path::Path};

use anyhow::Context;
use tracing::{debug, info, trace, warn};

use curvepick_core::{Series, TestPoint};
use curvepick_data::{
    load::{self, SeriesTable},
    store::Store,
};
use curvepick_match::{
    Classification, Matches,
    classifier::{self, Summary},
    matcher,
};

use crate::{config::Settings, report::Report};

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub training: SeriesTable,
    pub ideal: SeriesTable,
    pub points: Vec<TestPoint>,
    pub matches: Matches,
    pub classifications: Vec<Classification>,
    pub summary: Summary,
}

impl Outcome {
    /// Returns the ideal functions that were selected, in training order.
    pub fn selected(&self) -> impl Iterator<Item = &Series> {
        self.matches
            .iter()
            .filter_map(|selection| self.ideal.series().get(selection.candidate.index))
    }
}

/// Runs the full pipeline: load, store inputs, match, classify, store
/// results, and write the optional report.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded, the database cannot be
/// written, matching or classification fails, or the report cannot be
/// written.
pub fn run(settings: &Settings) -> anyhow::Result<Outcome> {
    let training = read_table(&settings.train, "training data")?;
    let ideal = read_table(&settings.ideal, "ideal functions")?;
    let points = load::read_test_points(&settings.test)
        .with_context(|| format!("failed to load test data from {}", settings.test.display()))?;

    info!(
        training = training.series().len(),
        ideal = ideal.series().len(),
        grid = training.grid().len(),
        points = points.len(),
        "loaded inputs"
    );

    let mut store = open_store(&settings.database)?;
    store
        .write_training(training.series())
        .context("failed to store training data")?;
    store
        .write_candidates(ideal.series())
        .context("failed to store ideal functions")?;

    let matches = matcher::select_best(training.series(), ideal.series(), log_match)
        .context("failed to match training data to ideal functions")?;

    for selection in &matches {
        info!(
            training = %selection.training.name,
            ideal = %selection.candidate.name,
            total_deviation = selection.total_deviation,
            max_deviation = selection.max_deviation,
            "selected ideal function"
        );
    }

    let classifications = classifier::assign(
        &points,
        &matches,
        ideal.series(),
        &settings.classify,
        log_classification,
    )
    .context("failed to classify test data")?;

    let summary = Summary::of(&classifications);
    info!(
        assigned = summary.assigned,
        unassigned = summary.unassigned,
        rejected = summary.rejected,
        "classified test data"
    );

    store
        .write_matches(&matches)
        .context("failed to store selected functions")?;
    store
        .write_classifications(&classifications)
        .context("failed to store test data mappings")?;
    info!(path = %settings.database.display(), "stored results");

    if let Some(path) = &settings.report {
        Report {
            selections: &matches,
            classifications: &classifications,
            summary: &summary,
        }
        .write(path)?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(Outcome {
        training,
        ideal,
        points,
        matches,
        classifications,
        summary,
    })
}

fn read_table(path: &Path, what: &str) -> anyhow::Result<SeriesTable> {
    debug!(path = %path.display(), "reading {what}");
    load::read_series_table(path)
        .with_context(|| format!("failed to load {what} from {}", path.display()))
}

fn open_store(path: &Path) -> anyhow::Result<Store> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Store::open(path).with_context(|| format!("failed to open database {}", path.display()))
}

fn log_match(event: &matcher::Event<'_>) {
    match event {
        matcher::Event::Scored {
            training,
            candidate,
            fit,
            ..
        } => trace!(
            training = training.name(),
            ideal = candidate.name(),
            total = fit.total,
            max = fit.max,
            "scored"
        ),
        matcher::Event::Selected { selection } => debug!(
            training = %selection.training,
            ideal = %selection.candidate,
            "best candidate"
        ),
    }
}

fn log_classification(event: &classifier::Event<'_>) {
    let classifier::Event::Classified {
        index,
        classification,
    } = event;

    match &classification.outcome {
        classifier::Outcome::Assigned(assignment) => trace!(
            point = index,
            ideal = %assignment.candidate.name,
            deviation = assignment.deviation,
            "assigned"
        ),
        classifier::Outcome::Unassigned => trace!(point = index, "unassigned"),
        classifier::Outcome::Rejected(err) => warn!(point = index, "{err}"),
    }
}
