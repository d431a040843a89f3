//! Dashboard Report
//! Everything the dashboard page shows for one selection, computed in a single pass.

use crate::data::schema::WHO_REGION;
use crate::data::{CaseRecord, DataProcessor, Dataset, Metric, ProcessorError, RegionAggregate, Selection};
use crate::stats::{KeyTakeaways, StatsCalculator, SummaryStats};
use serde::Serialize;

/// Labelled values for a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub selection: Selection,
    /// Rows matching the selection.
    pub rows: Vec<CaseRecord>,
    /// Active cases per region over the whole dataset.
    pub active_by_region: RegionAggregate,
    /// Deaths per region over the selection.
    pub deaths_by_region: RegionAggregate,
    /// Countries with the most active cases over the whole dataset.
    pub top_active: Vec<CaseRecord>,
    pub summary: SummaryStats,
    pub global_summary: SummaryStats,
    pub takeaways: KeyTakeaways,
}

impl DashboardReport {
    pub fn build(dataset: &Dataset, selection: &Selection, top_n: usize) -> Result<Self, ProcessorError> {
        let view = DataProcessor::filter_selection(dataset, selection)?;

        let report = Self {
            selection: selection.clone(),
            rows: view.records()?,
            active_by_region: DataProcessor::aggregate_sum(dataset, WHO_REGION, Metric::Active)?,
            deaths_by_region: DataProcessor::aggregate_sum(&view, WHO_REGION, Metric::Deaths)?,
            top_active: DataProcessor::top_n(dataset, top_n, Metric::Active)?.records()?,
            summary: StatsCalculator::summary_stats(&view)?,
            global_summary: StatsCalculator::summary_stats(dataset)?,
            takeaways: StatsCalculator::key_takeaways(dataset)?,
        };

        tracing::debug!(
            region = %selection.region,
            country = %selection.country,
            rows = report.rows.len(),
            "Rebuilt dashboard report"
        );
        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-country values of a metric over the selected rows.
    pub fn country_values(&self, metric: Metric) -> Vec<(String, f64)> {
        Self::values_of(&self.rows, metric)
    }

    fn values_of(rows: &[CaseRecord], metric: Metric) -> Vec<(String, f64)> {
        rows.iter()
            .map(|r| (r.country.clone(), r.value(metric)))
            .collect()
    }

    fn aggregate_values(aggregate: &RegionAggregate) -> Vec<(String, f64)> {
        aggregate
            .groups
            .iter()
            .map(|g| (g.group.clone(), g.total as f64))
            .collect()
    }

    /// Recovery rate per country, highest first.
    pub fn recovery_ranking(&self) -> Vec<(String, f64)> {
        let rank = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
        let mut values = self.country_values(Metric::RecoveredPer100Cases);
        values.sort_by(|a, b| rank(b.1).total_cmp(&rank(a.1)));
        values
    }

    /// Every single-metric bar chart of the dashboard, in page order.
    pub fn bar_series(&self) -> Vec<BarSeries> {
        let series = |title: &str, x: &str, y: &str, bars: Vec<(String, f64)>| BarSeries {
            title: title.to_string(),
            x_label: x.to_string(),
            y_label: y.to_string(),
            bars,
        };

        vec![
            series(
                "Confirmed Cases by Country/Region",
                "Country/Region",
                "Confirmed",
                self.country_values(Metric::Confirmed),
            ),
            series(
                "Total Deaths by Country/Region",
                "Country/Region",
                "Deaths",
                self.country_values(Metric::Deaths),
            ),
            series(
                "Active Cases by WHO Region",
                "WHO Region",
                "Active",
                Self::aggregate_values(&self.active_by_region),
            ),
            series(
                "1 Week Change in Cases by Country",
                "Country/Region",
                "1 week change",
                self.country_values(Metric::OneWeekChange),
            ),
            series(
                "Total Deaths by WHO Region",
                "WHO Region",
                "Deaths",
                Self::aggregate_values(&self.deaths_by_region),
            ),
            series(
                "Recovery Rate by Country",
                "Country/Region",
                "Recovered / 100 Cases",
                self.recovery_ranking(),
            ),
            series(
                &format!("Active Cases by Top {} Countries", self.top_active.len()),
                "Country/Region",
                "Active",
                Self::values_of(&self.top_active, Metric::Active),
            ),
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
