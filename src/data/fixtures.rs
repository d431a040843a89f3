//! Shared test datasets.

use crate::data::{CaseRecord, Dataset};

#[allow(clippy::too_many_arguments)]
fn record(
    country: &str,
    region: &str,
    confirmed: i64,
    deaths: i64,
    recovered: i64,
    new_deaths: i64,
    new_recovered: i64,
    one_week_change: i64,
    deaths_per_100: f64,
    recovered_per_100: f64,
) -> CaseRecord {
    CaseRecord {
        country: country.to_string(),
        who_region: region.to_string(),
        confirmed,
        deaths,
        active: confirmed - deaths - recovered,
        recovered,
        new_deaths,
        new_recovered,
        one_week_change,
        deaths_per_100_cases: deaths_per_100,
        recovered_per_100_cases: recovered_per_100,
    }
}

/// Six countries over three regions.
///
/// Totals: confirmed 2950, deaths 196, recovered 1264, active 1490.
/// Active by region: Americas 800, Europe 590, Africa 100.
pub fn sample_records() -> Vec<CaseRecord> {
    vec![
        record("US", "Americas", 1000, 50, 350, 5, 20, 120, 5.0, 35.0),
        record("Brazil", "Americas", 800, 40, 560, 8, 30, 90, 5.0, 70.0),
        record("United Kingdom", "Europe", 500, 70, 30, 1, 0, 10, 14.0, 6.0),
        record("France", "Europe", 300, 30, 80, 2, 3, -5, 10.0, 26.67),
        record("Nigeria", "Africa", 200, 5, 95, 0, 4, 15, 2.5, 47.5),
        record("Ghana", "Africa", 150, 1, 149, 0, 2, 3, 0.67, 99.33),
    ]
}

pub fn sample_dataset() -> Dataset {
    Dataset::from_records(&sample_records()).unwrap()
}

/// US 100, UK 50, France 30 confirmed cases; everything else zero.
pub fn three_country_dataset() -> Dataset {
    let rows = [("US", "Americas", 100), ("UK", "Europe", 50), ("France", "Europe", 30)];
    let records: Vec<CaseRecord> = rows
        .iter()
        .map(|(country, region, confirmed)| CaseRecord {
            confirmed: *confirmed,
            ..CaseRecord::new(*country, *region)
        })
        .collect();
    Dataset::from_records(&records).unwrap()
}
