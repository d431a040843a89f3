//! Statistics Calculator Module
//! Summary sums, extreme-record lookups and the key takeaways call-out.

use crate::data::{CaseRecord, Dataset, Metric, ProcessorError};
use serde::Serialize;

/// Metrics reported in the key takeaways, with their call-out labels.
pub const TAKEAWAY_METRICS: [(Metric, &str); 5] = [
    (Metric::Active, "Most Active Cases"),
    (Metric::Deaths, "Most Deaths"),
    (Metric::Recovered, "Most Recovered"),
    (Metric::Confirmed, "Most Confirmed Cases"),
    (Metric::DeathsPer100Cases, "Most Deaths per 100 Cases"),
];

/// Case totals over a set of records. All zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub rows: usize,
    pub confirmed: i64,
    pub deaths: i64,
    pub active: i64,
    pub recovered: i64,
}

/// Country holding the maximum of one metric. `None` means no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Takeaway {
    pub label: &'static str,
    pub metric: Metric,
    pub country: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyTakeaways {
    pub entries: Vec<Takeaway>,
}

impl KeyTakeaways {
    #[cfg(test)]
    pub fn get(&self, metric: Metric) -> Option<&Takeaway> {
        self.entries.iter().find(|t| t.metric == metric)
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Sum confirmed, deaths, active and recovered over a view.
    pub fn summary_stats(view: &Dataset) -> Result<SummaryStats, ProcessorError> {
        Ok(SummaryStats {
            rows: view.row_count(),
            confirmed: view.count_sum(Metric::Confirmed)?,
            deaths: view.count_sum(Metric::Deaths)?,
            active: view.count_sum(Metric::Active)?,
            recovered: view.count_sum(Metric::Recovered)?,
        })
    }

    /// Record with the largest metric value. The first row wins ties and
    /// NaN never wins.
    pub fn extreme_record(dataset: &Dataset, metric: Metric) -> Result<CaseRecord, ProcessorError> {
        if dataset.is_empty() {
            return Err(ProcessorError::EmptyDataset);
        }

        let values = dataset.metric_values(metric)?;
        let idx = Self::max_index(&values).ok_or(ProcessorError::EmptyDataset)?;
        Ok(dataset.record(idx)?)
    }

    /// Index of the first maximum, skipping NaN.
    fn max_index(values: &[f64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, top)) if v <= top => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    /// Extreme records for the takeaway metrics; entries are empty when the
    /// dataset has no rows.
    pub fn key_takeaways(dataset: &Dataset) -> Result<KeyTakeaways, ProcessorError> {
        let mut entries = Vec::with_capacity(TAKEAWAY_METRICS.len());

        for (metric, label) in TAKEAWAY_METRICS {
            let (country, value) = match Self::extreme_record(dataset, metric) {
                Ok(record) => {
                    let value = record.value(metric);
                    (Some(record.country), Some(value))
                }
                Err(ProcessorError::EmptyDataset) => (None, None),
                Err(e) => return Err(e),
            };

            entries.push(Takeaway {
                label,
                metric,
                country,
                value,
            });
        }

        Ok(KeyTakeaways { entries })
    }
}

/// Format a count with thousands separators, e.g. `1,234,567`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ALL;
    use crate::data::{fixtures, DataProcessor};

    #[test]
    fn test_summary_of_full_dataset() {
        let dataset = fixtures::sample_dataset();

        let stats = StatsCalculator::summary_stats(&dataset).unwrap();
        assert_eq!(
            stats,
            SummaryStats {
                rows: 6,
                confirmed: 2950,
                deaths: 196,
                active: 1490,
                recovered: 1264,
            }
        );
    }

    #[test]
    fn test_unfiltered_view_matches_dataset() {
        let dataset = fixtures::sample_dataset();
        let view = DataProcessor::filter(&dataset, ALL, ALL).unwrap();

        assert_eq!(
            StatsCalculator::summary_stats(&view).unwrap(),
            StatsCalculator::summary_stats(&dataset).unwrap()
        );
    }

    #[test]
    fn test_empty_view_sums_to_zero() {
        let dataset = fixtures::three_country_dataset();
        let view = DataProcessor::filter(&dataset, "Antarctica", ALL).unwrap();

        let stats = StatsCalculator::summary_stats(&view).unwrap();
        assert_eq!(stats, SummaryStats::default());
    }

    #[test]
    fn test_extreme_record() {
        let dataset = fixtures::three_country_dataset();

        let most = StatsCalculator::extreme_record(&dataset, Metric::Confirmed).unwrap();
        assert_eq!(most.country, "US");
    }

    #[test]
    fn test_extreme_record_first_occurrence_wins() {
        let dataset = fixtures::three_country_dataset();

        // Every record has zero deaths.
        let most = StatsCalculator::extreme_record(&dataset, Metric::Deaths).unwrap();
        assert_eq!(most.country, "US");
    }

    #[test]
    fn test_extreme_record_of_empty_dataset() {
        let dataset = fixtures::three_country_dataset();
        let empty = DataProcessor::filter(&dataset, "Antarctica", ALL).unwrap();

        let err = StatsCalculator::extreme_record(&empty, Metric::Active).unwrap_err();
        assert!(matches!(err, ProcessorError::EmptyDataset));
    }

    #[test]
    fn test_max_index_skips_nan() {
        assert_eq!(StatsCalculator::max_index(&[f64::NAN, 1.0, 3.0, 3.0]), Some(2));
        assert_eq!(StatsCalculator::max_index(&[f64::NAN]), None);
        assert_eq!(StatsCalculator::max_index(&[-4.0, -2.0]), Some(1));
    }

    #[test]
    fn test_key_takeaways() {
        let dataset = fixtures::sample_dataset();

        let takeaways = StatsCalculator::key_takeaways(&dataset).unwrap();
        let country = |m: Metric| takeaways.get(m).and_then(|t| t.country.clone());

        assert_eq!(country(Metric::Active).as_deref(), Some("US"));
        assert_eq!(country(Metric::Deaths).as_deref(), Some("United Kingdom"));
        assert_eq!(country(Metric::Recovered).as_deref(), Some("Brazil"));
        assert_eq!(country(Metric::Confirmed).as_deref(), Some("US"));
        assert_eq!(
            country(Metric::DeathsPer100Cases).as_deref(),
            Some("United Kingdom")
        );
    }

    #[test]
    fn test_key_takeaways_without_data() {
        let empty = Dataset::from_records(&[]).unwrap();

        let takeaways = StatsCalculator::key_takeaways(&empty).unwrap();
        assert_eq!(takeaways.entries.len(), TAKEAWAY_METRICS.len());
        assert!(takeaways.entries.iter().all(|t| t.country.is_none()));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(16_480_485), "16,480,485");
        assert_eq!(format_count(-12_345), "-12,345");
    }
}
