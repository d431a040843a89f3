//! COVID-19 Dashboard - per-country case statistics with filterable charts
//!
//! Loads a CSV snapshot of COVID-19 statistics once and renders a Home page and
//! a Dashboard page with region/country filters, charts and summary call-outs.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::Context;
use clap::Parser;
use config::Config;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "covid-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "COVID-19 analytics dashboard")]
struct Cli {
    /// CSV file with per-country case statistics
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of countries in the top active cases chart
    #[arg(long)]
    top_n: Option<usize>,
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("covid_dashboard={level}"))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_path) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone())),
        None => Config::load_default()?,
    };
    if let Some(data) = cli.data {
        config.data.csv_path = data;
    }
    if let Some(top_n) = cli.top_n {
        config.dashboard.top_n = top_n;
    }

    init_logging(&config.logging.level);
    tracing::info!("COVID-19 Dashboard v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    // The dataset is loaded once; nothing is rendered if that fails.
    let dataset = DataLoader::new()
        .with_infer_schema_length(config.data.infer_schema_length)
        .load_csv(&config.data.csv_path)
        .inspect_err(|e| tracing::error!("Failed to load dataset: {}", e))
        .with_context(|| format!("loading {}", config.data.csv_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.dashboard.window_width, config.dashboard.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("COVID-19 Analytics Dashboard"),
        ..Default::default()
    };

    let top_n = config.dashboard.top_n;
    eframe::run_native(
        "COVID-19 Analytics Dashboard",
        options,
        Box::new(move |cc| {
            let app = DashboardApp::new(cc, dataset, top_n)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
