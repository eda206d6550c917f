mod image;

use eframe::egui;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, Points};

pub use image::RenderError;

/// Marker used to draw a scatter layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Circle,
    Cross,
    Diamond,
    Square,
}

impl From<Marker> for MarkerShape {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Circle => MarkerShape::Circle,
            Marker::Cross => MarkerShape::Cross,
            Marker::Diamond => MarkerShape::Diamond,
            Marker::Square => MarkerShape::Square,
        }
    }
}

/// A runnable egui application for plotting curves and observations.
#[derive(Default)]
pub struct PlotApp {
    layers: Vec<Layer>,
}

struct Layer {
    name: String,
    points: Vec<PlotPoint>,
    style: Style,
}

enum Style {
    Line,
    Points(Marker),
}

impl PlotApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connected line through `points`.
    #[must_use]
    pub fn add_line(self, name: &str, points: &[[f64; 2]]) -> Self {
        self.push(name, points, Style::Line)
    }

    /// Adds unconnected markers at `points`.
    #[must_use]
    pub fn add_points(self, name: &str, points: &[[f64; 2]], marker: Marker) -> Self {
        self.push(name, points, Style::Points(marker))
    }

    fn push(mut self, name: &str, points: &[[f64; 2]], style: Style) -> Self {
        self.layers.push(Layer {
            name: name.to_string(),
            points: points.iter().copied().map(Into::into).collect(),
            style,
        });

        self
    }

    /// Returns the number of layers added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn run(self, title: &str) -> Result<(), eframe::Error> {
        eframe::run_native(
            title,
            eframe::NativeOptions::default(),
            Box::new(|_cc| Ok(Box::new(self))),
        )
    }
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("curvepick-plot")
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    for layer in &self.layers {
                        let points = layer.points.as_slice();
                        let name = &layer.name;

                        match layer.style {
                            Style::Line => plot_ui.line(Line::new(points).name(name)),
                            Style::Points(marker) => plot_ui.points(
                                Points::new(points)
                                    .name(name)
                                    .shape(marker.into())
                                    .radius(3.0),
                            ),
                        }
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_keep_insertion_order() {
        let app = PlotApp::new()
            .add_points("training", &[[0.0, 1.0], [1.0, 2.0]], Marker::Circle)
            .add_line("ideal", &[[0.0, 1.0], [1.0, 2.0]])
            .add_points("unassigned", &[[0.5, 9.0]], Marker::Cross);

        assert_eq!(app.len(), 3);
        let names: Vec<_> = app.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["training", "ideal", "unassigned"]);
        assert!(matches!(app.layers[2].style, Style::Points(Marker::Cross)));
        assert_eq!(app.layers[1].points.len(), 2);
    }
}
