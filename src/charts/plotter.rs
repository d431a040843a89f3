//! Chart Plotter Module
//! Draws the dashboard charts with egui_plot and the egui painter.

use crate::report::BarSeries;
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

/// Color palette for categories
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(102, 194, 165), // Teal
    Color32::from_rgb(252, 141, 98),  // Orange
    Color32::from_rgb(141, 160, 203), // Lavender
    Color32::from_rgb(231, 138, 195), // Pink
    Color32::from_rgb(166, 216, 84),  // Lime
    Color32::from_rgb(255, 217, 47),  // Yellow
    Color32::from_rgb(229, 196, 148), // Sand
    Color32::from_rgb(179, 179, 179), // Grey
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
];

/// Ends of the continuous value scale used to color bars and points.
const LOW_COLOR: Color32 = Color32::from_rgb(13, 8, 135);
const HIGH_COLOR: Color32 = Color32::from_rgb(240, 249, 33);

pub struct ChartPlotter;

impl ChartPlotter {
    /// Interpolate between the low and high colors by the value's position in `[min, max]`.
    pub fn value_color(value: f64, min: f64, max: f64) -> Color32 {
        let t = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            lerp(LOW_COLOR.r(), HIGH_COLOR.r()),
            lerp(LOW_COLOR.g(), HIGH_COLOR.g()),
            lerp(LOW_COLOR.b(), HIGH_COLOR.b()),
        )
    }

    fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
        values
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Share of the positive total held by each value.
    pub fn pie_fractions(values: &[(String, f64)]) -> Vec<f64> {
        let total: f64 = values.iter().map(|(_, v)| v.max(0.0)).sum();
        values
            .iter()
            .map(|(_, v)| if total > 0.0 { v.max(0.0) / total } else { 0.0 })
            .collect()
    }

    fn no_data(ui: &mut egui::Ui, height: f32) {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            });
        });
    }

    /// Bar chart with category labels on the x-axis and value-scaled colors.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, series: &BarSeries, height: f32) {
        if series.bars.is_empty() {
            Self::no_data(ui, height);
            return;
        }

        let (min, max) = Self::value_bounds(series.bars.iter().map(|(_, v)| *v));
        let labels: Vec<String> = series.bars.iter().map(|(l, _)| l.clone()).collect();

        let bars: Vec<Bar> = series
            .bars
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .name(label)
                    .width(0.7)
                    .fill(Self::value_color(*value, min, max))
            })
            .collect();

        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(series.x_label.clone())
            .y_axis_label(series.y_label.clone())
            .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&series.y_label));
            });
    }

    /// Two side-by-side bars per category.
    pub fn draw_grouped_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        rows: &[(String, f64, f64)],
        names: (&str, &str),
        height: f32,
    ) {
        if rows.is_empty() {
            Self::no_data(ui, height);
            return;
        }

        let labels: Vec<String> = rows.iter().map(|(l, _, _)| l.clone()).collect();
        let side = |offset: f64, pick: fn(&(String, f64, f64)) -> f64| -> Vec<Bar> {
            rows.iter()
                .enumerate()
                .map(|(i, row)| Bar::new(i as f64 + offset, pick(row)).name(&row.0).width(0.38))
                .collect()
        };

        let first = BarChart::new(side(-0.2, |r| r.1)).name(names.0).color(PALETTE[8]);
        let second = BarChart::new(side(0.2, |r| r.2)).name(names.1).color(PALETTE[1]);

        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("Country/Region")
            .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(first);
                plot_ui.bar_chart(second);
            });
    }

    /// Scatter plot whose point size and color follow `sizes`.
    /// With `x_labels`, x positions are category indices.
    pub fn draw_scatter_chart(
        ui: &mut egui::Ui,
        id: &str,
        points: &[[f64; 2]],
        sizes: &[f64],
        axis_labels: (&str, &str),
        x_labels: Option<Vec<String>>,
        height: f32,
    ) {
        if points.is_empty() {
            Self::no_data(ui, height);
            return;
        }

        let (min, max) = Self::value_bounds(sizes.iter().copied());
        let mut plot = Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(axis_labels.0)
            .y_axis_label(axis_labels.1);

        if let Some(labels) = x_labels {
            plot = plot.x_axis_formatter(move |mark, _range| label_at(&labels, mark.value));
        }

        plot.show(ui, |plot_ui| {
            for (point, size) in points.iter().zip(sizes.iter()) {
                let scale = if max > min { (size - min) / (max - min) } else { 0.5 };
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![*point]))
                        .radius(3.0 + 9.0 * scale as f32)
                        .color(Self::value_color(*size, min, max)),
                );
            }
        });
    }

    /// Pie chart with a legend of shares.
    pub fn draw_pie_chart(ui: &mut egui::Ui, series: &BarSeries, diameter: f32) {
        let fractions = Self::pie_fractions(&series.bars);
        if fractions.iter().all(|f| *f == 0.0) {
            Self::no_data(ui, diameter);
            return;
        }

        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(egui::vec2(diameter, diameter), egui::Sense::hover());
            let center = response.rect.center();
            let radius = diameter / 2.0 - 4.0;

            let mut start = -std::f32::consts::FRAC_PI_2;
            for (i, fraction) in fractions.iter().enumerate() {
                let sweep = *fraction as f32 * std::f32::consts::TAU;
                let color = PALETTE[i % PALETTE.len()];
                let steps = ((sweep / 0.05).ceil() as usize).max(1);

                for step in 0..steps {
                    let a0 = start + sweep * step as f32 / steps as f32;
                    let a1 = start + sweep * (step + 1) as f32 / steps as f32;
                    painter.add(egui::Shape::convex_polygon(
                        vec![
                            center,
                            center + radius * egui::vec2(a0.cos(), a0.sin()),
                            center + radius * egui::vec2(a1.cos(), a1.sin()),
                        ],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, ((name, _), fraction)) in series.bars.iter().zip(&fractions).enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, PALETTE[i % PALETTE.len()]);
                        ui.label(format!("{} ({:.1}%)", name, fraction * 100.0));
                    });
                }
            });
        });
    }
}

/// Category label for an axis mark that falls on an integer position.
fn label_at(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
