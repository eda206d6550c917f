//! Static PNG rendering of a [`PlotApp`].

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::prelude::*;
use thiserror::Error;

use crate::{Marker, PlotApp, Style};

/// Error type for image rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("plot has no finite points to draw")]
    NoData,

    #[error("failed to draw {}: {reason}", path.display())]
    Draw { path: PathBuf, reason: String },
}

impl PlotApp {
    /// Renders every layer into a PNG image of `size` pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if no layer holds a finite point, or if the image
    /// cannot be drawn or written.
    pub fn save_png(
        &self,
        path: impl AsRef<Path>,
        title: &str,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let path = path.as_ref();
        let [x, y] = self.ranges().ok_or(RenderError::NoData)?;

        draw(self, path, title, size, x, y).map_err(|err| RenderError::Draw {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Returns padded x and y ranges covering every finite point.
    fn ranges(&self) -> Option<[Range<f64>; 2]> {
        let mut points = self.finite_points();
        let first = points.next()?;

        let [x0, x1, y0, y1] = points.fold(
            [first.0, first.0, first.1, first.1],
            |[x0, x1, y0, y1], (x, y)| [x0.min(x), x1.max(x), y0.min(y), y1.max(y)],
        );

        Some([padded(x0, x1), padded(y0, y1)])
    }

    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.layers.iter().flat_map(|layer| finite(&layer.points))
    }
}

fn finite(points: &[egui_plot::PlotPoint]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points
        .iter()
        .map(|p| (p.x, p.y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
}

fn padded(min: f64, max: f64) -> Range<f64> {
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

fn draw(
    app: &PlotApp,
    path: &Path,
    title: &str,
    size: (u32, u32),
    x: Range<f64>,
    y: Range<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(32)
        .y_label_area_size(48)
        .build_cartesian_2d(x, y)?;
    chart.configure_mesh().draw()?;

    for (index, layer) in app.layers.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        let points = finite(&layer.points);

        let series = match layer.style {
            Style::Line => chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?,
            Style::Points(Marker::Circle) => {
                chart.draw_series(points.map(|c| Circle::new(c, 3, color.filled())))?
            }
            Style::Points(Marker::Cross) => {
                chart.draw_series(points.map(|c| Cross::new(c, 4, color.stroke_width(1))))?
            }
            Style::Points(Marker::Diamond) => {
                chart.draw_series(points.map(|c| TriangleMarker::new(c, 4, color.filled())))?
            }
            Style::Points(Marker::Square) => chart.draw_series(points.map(|c| {
                EmptyElement::at(c) + Rectangle::new([(-3, -3), (3, 3)], color.filled())
            }))?,
        };

        series
            .label(layer.name.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;

    Ok(())
}
