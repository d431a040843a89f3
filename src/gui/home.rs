//! Home page

use egui::{Color32, RichText};

const FEATURES: [&str; 5] = [
    "Interactive visualizations of COVID-19 data.",
    "Filter data by region and country.",
    "Gain insights into recovery rates, death rates, and active cases by country.",
    "Visualize the pandemic's impact globally.",
    "The data is from 2019-2020.",
];

pub fn show(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(20.0);
        ui.label(
            RichText::new("COVID-19 Analytics")
                .size(32.0)
                .strong()
                .color(Color32::from_rgb(255, 87, 51)),
        );
        ui.add_space(12.0);
        ui.label(
            RichText::new(
                "Welcome to the COVID-19 Analytics Dashboard. Analyze the pandemic's global \
                 impact through interactive data visualizations and filters.",
            )
            .size(18.0),
        );
        ui.add_space(12.0);
        ui.label(
            RichText::new("To get started, select the 'Dashboard' page from the sidebar.")
                .size(16.0),
        );
    });

    ui.add_space(24.0);
    ui.heading("Features:");
    for feature in FEATURES {
        ui.label(format!("• {feature}"));
    }
}
