//! COVID-19 Dashboard Main Application
//! Main window with control panel and the Home / Dashboard pages.

use crate::charts::StaticChartRenderer;
use crate::data::{CaseRecord, DataProcessor, Dataset, Selection};
use crate::gui::control_panel::Page;
use crate::gui::{home, ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::DashboardReport;
use egui::SidePanel;

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 900;

/// Main application window.
pub struct DashboardApp {
    dataset: Dataset,
    records: Vec<CaseRecord>,
    selection: Selection,
    top_n: usize,
    report: DashboardReport,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    /// Build the app around a loaded dataset and compute the unfiltered report.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Dataset,
        top_n: usize,
    ) -> anyhow::Result<Self> {
        let selection = Selection::all();
        let records = dataset.records()?;
        let report = DashboardReport::build(&dataset, &selection, top_n)?;
        let control_panel = ControlPanel::new(
            DataProcessor::region_options(&dataset),
            DataProcessor::country_options(&dataset, &selection.region)?,
        );

        Ok(Self {
            dataset,
            records,
            selection,
            top_n,
            report,
            control_panel,
            chart_viewer: ChartViewer::new(),
        })
    }

    /// Apply a selection change and recompute everything derived from it.
    fn handle_selection_changed(&mut self, action: &ControlPanelAction) {
        let result = match action {
            ControlPanelAction::RegionChanged(region) => {
                self.selection.set_region(&self.dataset, region)
            }
            ControlPanelAction::CountryChanged(country) => {
                self.selection.set_country(&self.dataset, country)
            }
            _ => return,
        };

        let refreshed = result
            .and_then(|_| DataProcessor::country_options(&self.dataset, &self.selection.region))
            .and_then(|countries| {
                self.control_panel.update_countries(countries);
                DashboardReport::build(&self.dataset, &self.selection, self.top_n)
            });

        match refreshed {
            Ok(report) => {
                let status = if self.selection.is_unfiltered() {
                    format!("All {} countries", self.dataset.row_count())
                } else {
                    format!(
                        "{} of {} countries selected",
                        report.rows.len(),
                        self.dataset.row_count()
                    )
                };
                self.control_panel.set_status(&status);
                self.report = report;
            }
            Err(e) => {
                tracing::error!("Failed to rebuild dashboard: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Save the current report as JSON
    fn handle_export_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("covid_report.json")
            .save_file()
        else {
            return;
        };

        let result = self
            .report
            .to_json()
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));

        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Exported report");
                self.control_panel
                    .set_status(&format!("Report saved to {}", path.display()));
            }
            Err(e) => {
                tracing::error!("Report export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Render the bar charts to PNG files in a chosen folder
    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match StaticChartRenderer::export_report(&self.report, &dir, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(paths) => {
                self.control_panel
                    .set_status(&format!("Exported {} charts", paths.len()));
                if let Err(e) = open::that(&dir) {
                    tracing::warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => {
                tracing::error!("Chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action =
                        self.control_panel
                            .show(ui, &self.selection, &self.report.global_summary);

                    match action {
                        ControlPanelAction::RegionChanged(_) | ControlPanelAction::CountryChanged(_) => {
                            self.handle_selection_changed(&action)
                        }
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - current page
        egui::CentralPanel::default().show(ctx, |ui| match self.control_panel.page {
            Page::Home => home::show(ui),
            Page::Dashboard => self.chart_viewer.show(ui, &self.report, &self.records),
        });
    }
}
