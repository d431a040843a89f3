//! Control Panel Widget
//! Left side panel with page navigation, selection filters and export controls.

use crate::data::Selection;
use crate::stats::{format_count, SummaryStats};
use egui::{Color32, ComboBox, RichText};

/// Dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Dashboard,
}

/// Left side control panel.
pub struct ControlPanel {
    pub page: Page,
    pub region_options: Vec<String>,
    pub country_options: Vec<String>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(region_options: Vec<String>, country_options: Vec<String>) -> Self {
        Self {
            page: Page::default(),
            region_options,
            country_options,
            status: "Ready".to_string(),
        }
    }

    /// Replace the country choices after a region change
    pub fn update_countries(&mut self, countries: Vec<String>) {
        self.country_options = countries;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        selection: &Selection,
        global_summary: &SummaryStats,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦠 COVID-19 Analytics")
                    .size(20.0)
                    .color(Color32::from_rgb(76, 175, 80)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("📄 Pages").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.page, Page::Home, "Home");
            ui.selectable_value(&mut self.page, Page::Dashboard, "Dashboard");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        match self.page {
            Page::Home => Self::show_summary(ui, global_summary),
            Page::Dashboard => {
                action = self.show_filters(ui, selection);

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.vertical_centered(|ui| {
                    let json_button = egui::Button::new(RichText::new("💾 Export Report").size(14.0))
                        .min_size(egui::vec2(180.0, 30.0));
                    if ui.add(json_button).clicked() {
                        action = ControlPanelAction::ExportJson;
                    }

                    ui.add_space(8.0);

                    let png_button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                        .min_size(egui::vec2(180.0, 30.0));
                    if ui.add(png_button).clicked() {
                        action = ControlPanelAction::ExportCharts;
                    }
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn show_filters(&self, ui: &mut egui::Ui, selection: &Selection) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.label(
            RichText::new("Filters")
                .size(16.0)
                .strong()
                .color(Color32::from_rgb(43, 84, 126)),
        );
        ui.add_space(8.0);

        let combo_width = 200.0;

        ui.label("Select WHO Region");
        ComboBox::from_id_salt("who_region")
            .width(combo_width)
            .selected_text(&selection.region)
            .show_ui(ui, |ui| {
                for region in &self.region_options {
                    if ui
                        .selectable_label(selection.region == *region, region)
                        .clicked()
                        && selection.region != *region
                    {
                        action = ControlPanelAction::RegionChanged(region.clone());
                    }
                }
            });

        ui.add_space(8.0);

        ui.label("Select a Country");
        ComboBox::from_id_salt("country")
            .width(combo_width)
            .selected_text(&selection.country)
            .show_ui(ui, |ui| {
                for country in &self.country_options {
                    if ui
                        .selectable_label(selection.country == *country, country)
                        .clicked()
                        && selection.country != *country
                    {
                        action = ControlPanelAction::CountryChanged(country.clone());
                    }
                }
            });

        action
    }

    fn show_summary(ui: &mut egui::Ui, summary: &SummaryStats) {
        egui::Frame::none()
            .fill(Color32::from_rgb(212, 237, 218))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let text = Color32::from_rgb(21, 87, 36);
                ui.label(
                    RichText::new("Summary of COVID-19 Cases")
                        .strong()
                        .color(text),
                );
                ui.add_space(4.0);
                for (label, value) in [
                    ("Total Confirmed Cases", summary.confirmed),
                    ("Total Deaths", summary.deaths),
                    ("Total Active Cases", summary.active),
                    ("Total Recovered Cases", summary.recovered),
                ] {
                    ui.label(RichText::new(format!("• {}: {}", label, format_count(value))).color(text));
                }
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RegionChanged(String),
    CountryChanged(String),
    ExportJson,
    ExportCharts,
}
