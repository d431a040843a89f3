//! Chart Viewer Widget
//! Dashboard page: raw dataset, the ten charts and the conclusion call-outs.

use crate::charts::ChartPlotter;
use crate::data::{CaseRecord, Metric};
use crate::report::DashboardReport;
use crate::stats::format_count;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 300.0;
const PIE_DIAMETER: f32 = 260.0;

/// Scrollable dashboard page.
#[derive(Default)]
pub struct ChartViewer {
    show_raw_data: bool,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, report: &DashboardReport, dataset: &[CaseRecord]) {
        let region = &report.selection.region;
        let country = &report.selection.country;
        let series = report.bar_series();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("COVID-19 Analytics Dashboard")
                            .size(28.0)
                            .strong()
                            .color(Color32::from_rgb(76, 175, 80)),
                    );
                });
                ui.add_space(10.0);

                ui.checkbox(&mut self.show_raw_data, "Raw Dataset Overview");
                if self.show_raw_data {
                    Self::draw_records_table(ui, dataset);
                }

                ui.add_space(10.0);
                ui.heading("Visualizations");
                if report.is_empty() {
                    ui.label(
                        RichText::new("No rows match the current selection.")
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }

                chart_card(ui, &format!("1. Confirmed Cases by Country - {country}"), |ui| {
                    ChartPlotter::draw_bar_chart(ui, "confirmed_by_country", &series[0], CHART_HEIGHT);
                });

                chart_card(ui, &format!("2. Total Deaths by Country - {country}"), |ui| {
                    ChartPlotter::draw_bar_chart(ui, "deaths_by_country", &series[1], CHART_HEIGHT);
                });

                chart_card(ui, "3. Active Cases by WHO Region", |ui| {
                    ChartPlotter::draw_pie_chart(ui, &series[2], PIE_DIAMETER);
                });

                chart_card(
                    ui,
                    &format!("4. Death Rate per 100 Cases by Country - {country}"),
                    |ui| {
                        let rates = report.country_values(Metric::DeathsPer100Cases);
                        let points: Vec<[f64; 2]> = rates
                            .iter()
                            .enumerate()
                            .map(|(i, (_, rate))| [i as f64, *rate])
                            .collect();
                        let sizes: Vec<f64> = rates.iter().map(|(_, rate)| *rate).collect();
                        let labels = rates.into_iter().map(|(name, _)| name).collect();
                        ChartPlotter::draw_scatter_chart(
                            ui,
                            "death_rate_by_country",
                            &points,
                            &sizes,
                            ("Country/Region", "Deaths / 100 Cases"),
                            Some(labels),
                            CHART_HEIGHT,
                        );
                    },
                );

                chart_card(
                    ui,
                    &format!("5. 1 Week Change in Cases by Country - {country}"),
                    |ui| {
                        ChartPlotter::draw_bar_chart(ui, "week_change_by_country", &series[3], CHART_HEIGHT);
                    },
                );

                chart_card(ui, &format!("6. Deaths by WHO Region - {region}"), |ui| {
                    ChartPlotter::draw_bar_chart(ui, "deaths_by_region", &series[4], CHART_HEIGHT);
                    if !report.deaths_by_region.is_empty() {
                        ui.label(format!(
                            "Total deaths: {}",
                            format_count(report.deaths_by_region.total())
                        ));
                    }
                });

                chart_card(
                    ui,
                    &format!("7. Confirmed vs Active Cases by Country - {country}"),
                    |ui| {
                        let rows: Vec<(String, f64, f64)> = report
                            .rows
                            .iter()
                            .map(|r| (r.country.clone(), r.confirmed as f64, r.active as f64))
                            .collect();
                        ChartPlotter::draw_grouped_bar_chart(
                            ui,
                            "confirmed_vs_active",
                            &rows,
                            ("Confirmed", "Active"),
                            CHART_HEIGHT,
                        );
                    },
                );

                chart_card(
                    ui,
                    &format!("8. New Deaths vs New Recovered - {country} Country and {region} WHO Region"),
                    |ui| {
                        let points: Vec<[f64; 2]> = report
                            .rows
                            .iter()
                            .map(|r| [r.new_deaths as f64, r.new_recovered as f64])
                            .collect();
                        let sizes: Vec<f64> =
                            report.rows.iter().map(|r| r.new_recovered as f64).collect();
                        ChartPlotter::draw_scatter_chart(
                            ui,
                            "new_deaths_vs_new_recovered",
                            &points,
                            &sizes,
                            ("New deaths", "New recovered"),
                            None,
                            CHART_HEIGHT,
                        );
                    },
                );

                chart_card(ui, &format!("9. Recovery Rate by Country - {country}"), |ui| {
                    ChartPlotter::draw_bar_chart(ui, "recovery_rate", &series[5], CHART_HEIGHT);
                });

                chart_card(
                    ui,
                    &format!("10. Active Cases by Top {} Countries", report.top_active.len()),
                    |ui| {
                        ChartPlotter::draw_bar_chart(ui, "top_active", &series[6], CHART_HEIGHT);
                    },
                );

                ui.add_space(10.0);
                Self::draw_conclusion(ui, report);
            });
    }

    fn draw_records_table(ui: &mut egui::Ui, records: &[CaseRecord]) {
        ScrollArea::both()
            .id_salt("raw_dataset")
            .max_height(260.0)
            .show(ui, |ui| {
                egui::Grid::new("raw_dataset_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new("Country/Region").strong());
                        ui.label(RichText::new("WHO Region").strong());
                        for metric in Metric::ALL {
                            ui.label(RichText::new(metric.column()).strong());
                        }
                        ui.end_row();

                        for record in records {
                            ui.label(&record.country);
                            ui.label(&record.who_region);
                            for metric in Metric::ALL {
                                if metric.is_count() {
                                    ui.label(format_count(record.value(metric) as i64));
                                } else {
                                    ui.label(format!("{:.2}", record.value(metric)));
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_conclusion(ui: &mut egui::Ui, report: &DashboardReport) {
        ui.heading("Conclusion");
        ui.add_space(5.0);

        callout(
            ui,
            Color32::from_rgb(212, 237, 218),
            Color32::from_rgb(21, 87, 36),
            "Summary of COVID-19 Cases",
            &[
                format!("Total Confirmed Cases: {}", format_count(report.summary.confirmed)),
                format!("Total Deaths: {}", format_count(report.summary.deaths)),
                format!("Total Active Cases: {}", format_count(report.summary.active)),
                format!("Total Recovered Cases: {}", format_count(report.summary.recovered)),
            ],
        );

        ui.add_space(8.0);

        let lines: Vec<String> = report
            .takeaways
            .entries
            .iter()
            .map(|t| format!("{}: {}", t.label, t.country.as_deref().unwrap_or("No data")))
            .collect();
        callout(
            ui,
            Color32::from_rgb(255, 243, 205),
            Color32::from_rgb(133, 100, 4),
            "Key Takeaways Across World",
            &lines,
        );
    }
}

fn chart_card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .rounding(8.0)
        .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.label(RichText::new(title).size(16.0).strong());
            ui.add_space(6.0);
            add_contents(ui);
        });
    ui.add_space(12.0);
}

fn callout(ui: &mut egui::Ui, fill: Color32, text: Color32, title: &str, lines: &[String]) {
    egui::Frame::none()
        .fill(fill)
        .rounding(5.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong().color(text));
            ui.add_space(4.0);
            for line in lines {
                ui.label(RichText::new(format!("• {line}")).color(text));
            }
        });
}
