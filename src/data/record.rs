//! Case Record
//! One materialised row of the dataset.

use crate::data::schema::Metric;
use serde::{Deserialize, Serialize};

/// Per-country snapshot of case counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub country: String,
    pub who_region: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub active: i64,
    pub recovered: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
    pub one_week_change: i64,
    pub deaths_per_100_cases: f64,
    pub recovered_per_100_cases: f64,
}

impl CaseRecord {
    /// Record with every number zeroed, handy as a starting point.
    #[cfg(test)]
    pub fn new(country: impl Into<String>, who_region: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            who_region: who_region.into(),
            confirmed: 0,
            deaths: 0,
            active: 0,
            recovered: 0,
            new_deaths: 0,
            new_recovered: 0,
            one_week_change: 0,
            deaths_per_100_cases: 0.0,
            recovered_per_100_cases: 0.0,
        }
    }

    /// Value of a metric as `f64`, for charting.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Confirmed => self.confirmed as f64,
            Metric::Deaths => self.deaths as f64,
            Metric::Active => self.active as f64,
            Metric::Recovered => self.recovered as f64,
            Metric::NewDeaths => self.new_deaths as f64,
            Metric::NewRecovered => self.new_recovered as f64,
            Metric::OneWeekChange => self.one_week_change as f64,
            Metric::DeathsPer100Cases => self.deaths_per_100_cases,
            Metric::RecoveredPer100Cases => self.recovered_per_100_cases,
        }
    }
}
