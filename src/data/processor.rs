//! Data Processor Module
//! Filter and aggregation pipeline: cascading selection, filtering, grouped sums and top-N.

use crate::data::loader::Dataset;
use crate::data::schema::{Metric, ALL, COUNTRY, WHO_REGION};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown text column: {0}")]
    UnknownColumn(String),
    #[error("'{0}' is a ratio and cannot be summed")]
    NonAdditiveMetric(Metric),
    #[error("Dataset has no rows")]
    EmptyDataset,
}

/// Current region/country choice. `"All"` disables a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub region: String,
    pub country: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    pub fn all() -> Self {
        Self::new(ALL, ALL)
    }

    pub fn new(region: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            country: country.into(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.region == ALL && self.country == ALL
    }

    /// Switch region, resetting the country if it no longer belongs to it.
    pub fn set_region(&mut self, dataset: &Dataset, region: &str) -> Result<(), ProcessorError> {
        self.region = region.to_string();
        self.reconcile(dataset)?;
        Ok(())
    }

    pub fn set_country(&mut self, dataset: &Dataset, country: &str) -> Result<(), ProcessorError> {
        self.country = country.to_string();
        self.reconcile(dataset)?;
        Ok(())
    }

    /// Reset any dimension that references a value the dataset cannot offer
    /// for the current region. Returns whether anything was reset.
    pub fn reconcile(&mut self, dataset: &Dataset) -> Result<bool, ProcessorError> {
        let mut changed = false;

        if self.region != ALL && !dataset.distinct_values(WHO_REGION).contains(&self.region) {
            tracing::debug!(region = %self.region, "Unknown region, resetting to All");
            self.region = ALL.to_string();
            changed = true;
        }

        if self.country != ALL {
            let countries = DataProcessor::countries_for_region(dataset, &self.region)?;
            if !countries.contains(&self.country) {
                tracing::debug!(
                    region = %self.region,
                    country = %self.country,
                    "Country not in selected region, resetting to All"
                );
                self.country = ALL.to_string();
                changed = true;
            }
        }

        Ok(changed)
    }
}

/// Summed metric for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub total: i64,
}

/// Metric summed per value of a grouping column, groups in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAggregate {
    pub group_column: String,
    pub metric: Metric,
    pub groups: Vec<GroupTotal>,
}

impl RegionAggregate {
    pub fn total(&self) -> i64 {
        self.groups.iter().map(|g| g.total).sum()
    }

    #[cfg(test)]
    pub fn get(&self, group: &str) -> Option<i64> {
        self.groups.iter().find(|g| g.group == group).map(|g| g.total)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Pure pipeline operations over an immutable dataset.
pub struct DataProcessor;

impl DataProcessor {
    /// Region choices for the selector, `"All"` first.
    pub fn region_options(dataset: &Dataset) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(dataset.distinct_values(WHO_REGION))
            .collect()
    }

    /// Country choices for the selector given a region, `"All"` first.
    pub fn country_options(dataset: &Dataset, region: &str) -> Result<Vec<String>, ProcessorError> {
        Ok(std::iter::once(ALL.to_string())
            .chain(Self::countries_for_region(dataset, region)?)
            .collect())
    }

    /// Distinct countries within a region, or every country for `"All"`.
    pub fn countries_for_region(dataset: &Dataset, region: &str) -> Result<Vec<String>, ProcessorError> {
        if region == ALL {
            return Ok(dataset.distinct_values(COUNTRY));
        }

        let in_region = Self::filter(dataset, region, ALL)?;
        Ok(in_region.distinct_values(COUNTRY))
    }

    /// Rows matching both the region and the country predicate.
    pub fn filter(dataset: &Dataset, region: &str, country: &str) -> Result<Dataset, ProcessorError> {
        let predicate = [(WHO_REGION, region), (COUNTRY, country)]
            .into_iter()
            .filter(|(_, value)| *value != ALL)
            .map(|(column, value)| col(column).eq(lit(value)))
            .reduce(|acc, expr| acc.and(expr));

        let Some(predicate) = predicate else {
            return Ok(dataset.clone());
        };

        let filtered = dataset
            .frame()
            .clone()
            .lazy()
            .filter(predicate)
            .collect()?;

        Ok(Dataset::derived(filtered))
    }

    pub fn filter_selection(dataset: &Dataset, selection: &Selection) -> Result<Dataset, ProcessorError> {
        Self::filter(dataset, &selection.region, &selection.country)
    }

    /// Sum a count metric per value of a text column.
    pub fn aggregate_sum(
        view: &Dataset,
        group_by: &str,
        metric: Metric,
    ) -> Result<RegionAggregate, ProcessorError> {
        if !metric.is_count() {
            return Err(ProcessorError::NonAdditiveMetric(metric));
        }

        match view.frame().column(group_by) {
            Ok(column) if column.dtype() == &DataType::String => {}
            _ => return Err(ProcessorError::UnknownColumn(group_by.to_string())),
        }

        let grouped = view
            .frame()
            .clone()
            .lazy()
            .group_by_stable([col(group_by)])
            .agg([col(metric.column()).sum()])
            .collect()?;

        let names = grouped.column(group_by)?.str()?;
        let totals = grouped.column(metric.column())?.i64()?;

        let groups = names
            .into_iter()
            .zip(totals.into_iter())
            .filter_map(|(name, total)| {
                Some(GroupTotal {
                    group: name?.to_string(),
                    total: total.unwrap_or(0),
                })
            })
            .collect();

        Ok(RegionAggregate {
            group_column: group_by.to_string(),
            metric,
            groups,
        })
    }

    /// The `n` rows with the largest metric value; ties keep row order.
    /// NaN ranks below every number.
    pub fn top_n(dataset: &Dataset, n: usize, metric: Metric) -> Result<Dataset, ProcessorError> {
        let key = if metric.is_count() {
            col(metric.column())
        } else {
            when(col(metric.column()).is_nan())
                .then(lit(f64::NEG_INFINITY))
                .otherwise(col(metric.column()))
        };

        let sorted = dataset
            .frame()
            .clone()
            .lazy()
            .sort_by_exprs(
                vec![key],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        Ok(Dataset::derived(sorted.head(Some(n))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, CaseRecord};
    use crate::stats::StatsCalculator;

    fn countries(view: &Dataset) -> Vec<String> {
        view.records()
            .unwrap()
            .into_iter()
            .map(|r| r.country)
            .collect()
    }

    #[test]
    fn test_countries_for_region() {
        let dataset = fixtures::three_country_dataset();

        let europe = DataProcessor::countries_for_region(&dataset, "Europe").unwrap();
        assert_eq!(europe, vec!["UK", "France"]);

        let all = DataProcessor::countries_for_region(&dataset, ALL).unwrap();
        assert_eq!(all, vec!["US", "UK", "France"]);
    }

    #[test]
    fn test_countries_only_come_from_their_region() {
        let dataset = fixtures::sample_dataset();
        let records = dataset.records().unwrap();

        for region in dataset.distinct_values(WHO_REGION) {
            let listed = DataProcessor::countries_for_region(&dataset, &region).unwrap();
            assert!(!listed.is_empty());

            let mut deduped = listed.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), listed.len());

            for country in &listed {
                let record = records.iter().find(|r| &r.country == country).unwrap();
                assert_eq!(record.who_region, region);
            }
        }
    }

    #[test]
    fn test_options_start_with_all() {
        let dataset = fixtures::sample_dataset();

        let regions = DataProcessor::region_options(&dataset);
        assert_eq!(regions, vec!["All", "Americas", "Europe", "Africa"]);

        let countries = DataProcessor::country_options(&dataset, "Africa").unwrap();
        assert_eq!(countries, vec!["All", "Nigeria", "Ghana"]);
    }

    #[test]
    fn test_filter_by_region() {
        let dataset = fixtures::three_country_dataset();

        let europe = DataProcessor::filter(&dataset, "Europe", ALL).unwrap();
        assert_eq!(europe.row_count(), 2);
        assert_eq!(europe.count_sum(Metric::Confirmed).unwrap(), 80);
        // Base snapshot is untouched.
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let dataset = fixtures::sample_dataset();

        let france = DataProcessor::filter(&dataset, "Europe", "France").unwrap();
        assert_eq!(countries(&france), vec!["France"]);

        let mismatched = DataProcessor::filter(&dataset, "Europe", "US").unwrap();
        assert!(mismatched.is_empty());

        let country_only = DataProcessor::filter(&dataset, ALL, "Ghana").unwrap();
        assert_eq!(countries(&country_only), vec!["Ghana"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = fixtures::sample_dataset();

        for (region, country) in [(ALL, ALL), ("Americas", ALL), ("Europe", "France"), ("Mars", ALL)] {
            let once = DataProcessor::filter(&dataset, region, country).unwrap();
            let twice = DataProcessor::filter(&once, region, country).unwrap();
            assert_eq!(once.records().unwrap(), twice.records().unwrap());
        }
    }

    #[test]
    fn test_filter_unknown_region_is_empty() {
        let dataset = fixtures::three_country_dataset();

        let view = DataProcessor::filter(&dataset, "Antarctica", ALL).unwrap();
        assert!(view.is_empty());
        assert!(DataProcessor::countries_for_region(&dataset, "Antarctica")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_aggregate_active_by_region() {
        let dataset = fixtures::sample_dataset();

        let active = DataProcessor::aggregate_sum(&dataset, WHO_REGION, Metric::Active).unwrap();
        assert_eq!(active.groups.len(), 3);
        assert_eq!(active.get("Americas"), Some(800));
        assert_eq!(active.get("Europe"), Some(590));
        assert_eq!(active.get("Africa"), Some(100));
        assert_eq!(active.total(), dataset.count_sum(Metric::Active).unwrap());
    }

    #[test]
    fn test_aggregate_deaths_of_filtered_view() {
        let dataset = fixtures::sample_dataset();
        let europe = DataProcessor::filter(&dataset, "Europe", ALL).unwrap();

        let deaths = DataProcessor::aggregate_sum(&europe, WHO_REGION, Metric::Deaths).unwrap();
        assert_eq!(
            deaths.groups,
            vec![GroupTotal {
                group: "Europe".to_string(),
                total: 100
            }]
        );
    }

    #[test]
    fn test_aggregate_of_empty_view() {
        let dataset = fixtures::sample_dataset();
        let empty = DataProcessor::filter(&dataset, "Antarctica", ALL).unwrap();

        let active = DataProcessor::aggregate_sum(&empty, WHO_REGION, Metric::Active).unwrap();
        assert!(active.is_empty());
        assert_eq!(active.total(), 0);
    }

    #[test]
    fn test_aggregate_rejects_ratios_and_bad_columns() {
        let dataset = fixtures::sample_dataset();

        let err = DataProcessor::aggregate_sum(&dataset, WHO_REGION, Metric::DeathsPer100Cases)
            .unwrap_err();
        assert!(matches!(err, ProcessorError::NonAdditiveMetric(_)));

        let err = DataProcessor::aggregate_sum(&dataset, "Continent", Metric::Active).unwrap_err();
        assert!(matches!(err, ProcessorError::UnknownColumn(_)));

        let err = DataProcessor::aggregate_sum(&dataset, "Confirmed", Metric::Active).unwrap_err();
        assert!(matches!(err, ProcessorError::UnknownColumn(_)));
    }

    #[test]
    fn test_top_n_dominates_the_rest() {
        let dataset = fixtures::sample_dataset();

        let top = DataProcessor::top_n(&dataset, 3, Metric::Active).unwrap();
        assert_eq!(countries(&top), vec!["US", "United Kingdom", "Brazil"]);

        let top_records = top.records().unwrap();
        let floor = top_records.iter().map(|r| r.active).min().unwrap();
        for rest in dataset.records().unwrap() {
            if !top_records.contains(&rest) {
                assert!(rest.active <= floor);
            }
        }
    }

    #[test]
    fn test_top_n_larger_than_dataset() {
        let dataset = fixtures::sample_dataset();

        let top = DataProcessor::top_n(&dataset, 10, Metric::Active).unwrap();
        assert_eq!(top.row_count(), dataset.row_count());
        assert_eq!(countries(&top).last().map(String::as_str), Some("Ghana"));
    }

    #[test]
    fn test_top_n_ties_keep_row_order() {
        let dataset = fixtures::sample_dataset();

        // US and Brazil share 5.0 deaths per 100 cases.
        let top = DataProcessor::top_n(&dataset, 3, Metric::DeathsPer100Cases).unwrap();
        assert_eq!(countries(&top), vec!["United Kingdom", "France", "US"]);
    }

    #[test]
    fn test_top_n_ranks_nan_last() {
        let records = vec![
            CaseRecord {
                deaths_per_100_cases: f64::NAN,
                ..CaseRecord::new("A", "Europe")
            },
            CaseRecord {
                deaths_per_100_cases: 20.0,
                ..CaseRecord::new("B", "Europe")
            },
        ];
        let dataset = Dataset::from_records(&records).unwrap();

        let top = DataProcessor::top_n(&dataset, 1, Metric::DeathsPer100Cases).unwrap();
        assert_eq!(countries(&top), vec!["B"]);

        let extreme = StatsCalculator::extreme_record(&dataset, Metric::DeathsPer100Cases).unwrap();
        assert_eq!(extreme.country, "B");

        let both = DataProcessor::top_n(&dataset, 2, Metric::DeathsPer100Cases).unwrap();
        assert_eq!(countries(&both), vec!["B", "A"]);
    }

    #[test]
    fn test_selection_resets_stale_country() {
        let dataset = fixtures::sample_dataset();
        let mut selection = Selection::new("Europe", "France");

        selection.set_region(&dataset, "Africa").unwrap();
        assert_eq!(selection, Selection::new("Africa", ALL));

        selection.set_country(&dataset, "Ghana").unwrap();
        assert_eq!(selection, Selection::new("Africa", "Ghana"));

        selection.set_region(&dataset, ALL).unwrap();
        assert_eq!(selection, Selection::new(ALL, "Ghana"));
    }

    #[test]
    fn test_selection_reconcile_unknown_values() {
        let dataset = fixtures::sample_dataset();
        let mut selection = Selection::new("Atlantis", "Narnia");

        assert!(selection.reconcile(&dataset).unwrap());
        assert!(selection.is_unfiltered());
        assert!(!selection.reconcile(&dataset).unwrap());
    }
}
