use std::{fs, path::Path};

use anyhow::Context;
use curvepick_match::Outcome as PointOutcome;
use curvepick_plot::{Marker, PlotApp};

use crate::pipeline::Outcome;

/// Width and height of saved images, in pixels.
const IMAGE_SIZE: (u32, u32) = (1280, 960);

/// Test points split by how they were classified.
#[derive(Debug, Default)]
struct PointLayers {
    assigned: Vec<[f64; 2]>,
    unassigned: Vec<[f64; 2]>,
    rejected: Vec<[f64; 2]>,
}

impl PointLayers {
    fn of(outcome: &Outcome) -> Self {
        let mut layers = Self::default();
        for classification in &outcome.classifications {
            let point = [classification.point.x, classification.point.y];
            match classification.outcome {
                PointOutcome::Assigned(_) => layers.assigned.push(point),
                PointOutcome::Unassigned => layers.unassigned.push(point),
                PointOutcome::Rejected(_) => layers.rejected.push(point),
            }
        }
        layers
    }
}

/// Builds the results plot: training data as points, selected ideal
/// functions as lines, and test points by outcome.
#[must_use]
pub fn build(outcome: &Outcome) -> PlotApp {
    let mut app = PlotApp::new();

    for series in outcome.training.series() {
        let points: Vec<_> = series.points().collect();
        app = app.add_points(&format!("training {}", series.name()), &points, Marker::Circle);
    }

    for series in outcome.selected() {
        let points: Vec<_> = series.points().collect();
        app = app.add_line(&format!("ideal {}", series.name()), &points);
    }

    let layers = PointLayers::of(outcome);
    app.add_points("test assigned", &layers.assigned, Marker::Diamond)
        .add_points("test unassigned", &layers.unassigned, Marker::Cross)
        .add_points("test rejected", &layers.rejected, Marker::Square)
}

/// Opens the results plot and blocks until the window is closed.
///
/// # Errors
///
/// Returns an error if the plot window cannot be created.
pub fn show(outcome: &Outcome) -> anyhow::Result<()> {
    build(outcome)
        .run("curvepick results")
        .map_err(|err| anyhow::anyhow!("failed to open plot window: {err}"))
}

/// Writes the results plot to a PNG image, creating its directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the image cannot
/// be rendered.
pub fn save(outcome: &Outcome, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    build(outcome)
        .save_png(path, "curvepick results", IMAGE_SIZE)
        .context("failed to save results plot")
}
