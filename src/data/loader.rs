//! CSV Data Loader Module
//! Loads the case dataset once with Polars and exposes read-only column access.

use crate::data::record::CaseRecord;
use crate::data::schema::{self, Metric};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Column '{column}' has the wrong type: {reason}")]
    InvalidColumn { column: String, reason: String },
    #[error("Column '{column}' has {count} empty cells")]
    MissingValues { column: String, count: usize },
}

/// Immutable snapshot of case records.
///
/// Filtered and ranked views are `Dataset`s too; they share the column
/// buffers of the snapshot they came from and never modify it.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Validate an in-memory frame and normalise its column types.
    pub fn from_frame(mut df: DataFrame) -> Result<Self, DataLoadError> {
        for (name, dtype) in required_columns() {
            let column = df
                .column(name)
                .map_err(|_| DataLoadError::MissingColumn(name.to_string()))?;

            let source = column.as_materialized_series();
            if dtype.is_integer() && source.dtype().is_float() && has_fraction(source)? {
                return Err(DataLoadError::InvalidColumn {
                    column: name.to_string(),
                    reason: "expected whole numbers, found fractional values".to_string(),
                });
            }

            let normalised = source
                .strict_cast(&dtype)
                .map_err(|e| DataLoadError::InvalidColumn {
                    column: name.to_string(),
                    reason: e.to_string(),
                })?;

            let nulls = normalised.null_count();
            if nulls > 0 {
                return Err(DataLoadError::MissingValues {
                    column: name.to_string(),
                    count: nulls,
                });
            }

            df.with_column(normalised)?;
        }

        Ok(Self { df })
    }

    /// Build a dataset from already materialised records.
    #[cfg(test)]
    pub fn from_records(records: &[CaseRecord]) -> Result<Self, DataLoadError> {
        let df = DataFrame::new(vec![
            Column::new(
                schema::COUNTRY.into(),
                records.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::WHO_REGION.into(),
                records.iter().map(|r| r.who_region.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::CONFIRMED.into(),
                records.iter().map(|r| r.confirmed).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::DEATHS.into(),
                records.iter().map(|r| r.deaths).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::ACTIVE.into(),
                records.iter().map(|r| r.active).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::RECOVERED.into(),
                records.iter().map(|r| r.recovered).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::NEW_DEATHS.into(),
                records.iter().map(|r| r.new_deaths).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::NEW_RECOVERED.into(),
                records.iter().map(|r| r.new_recovered).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::ONE_WEEK_CHANGE.into(),
                records.iter().map(|r| r.one_week_change).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::DEATHS_PER_100_CASES.into(),
                records.iter().map(|r| r.deaths_per_100_cases).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::RECOVERED_PER_100_CASES.into(),
                records.iter().map(|r| r.recovered_per_100_cases).collect::<Vec<_>>(),
            ),
        ])?;

        Self::from_frame(df)
    }

    /// Wrap a frame produced from an already validated dataset.
    pub(crate) fn derived(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Distinct values of a column in first-appearance order.
    /// Unknown columns yield an empty list.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        self.df
            .column(column)
            .ok()
            .and_then(|col| col.as_materialized_series().unique_stable().ok())
            .and_then(|unique| unique.cast(&DataType::String).ok())
            .map(|unique| {
                unique
                    .str()
                    .map(|ca| ca.into_iter().flatten().map(str::to_string).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Sum of a count column. Empty datasets sum to zero.
    pub fn count_sum(&self, metric: Metric) -> PolarsResult<i64> {
        Ok(self.df.column(metric.column())?.i64()?.sum().unwrap_or(0))
    }

    /// Values of a metric as `f64`, in row order.
    pub fn metric_values(&self, metric: Metric) -> PolarsResult<Vec<f64>> {
        let values = self
            .df
            .column(metric.column())?
            .cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Materialise a single row.
    pub fn record(&self, idx: usize) -> PolarsResult<CaseRecord> {
        RecordColumns::new(&self.df)?.get(idx).ok_or_else(|| {
            PolarsError::OutOfBounds(
                format!("row {} out of bounds for {} rows", idx, self.row_count()).into(),
            )
        })
    }

    /// Materialise every row, in order.
    pub fn records(&self) -> PolarsResult<Vec<CaseRecord>> {
        let columns = RecordColumns::new(&self.df)?;
        Ok((0..self.row_count())
            .filter_map(|idx| columns.get(idx))
            .collect())
    }
}

/// Required columns and the type each one is normalised to.
fn required_columns() -> Vec<(&'static str, DataType)> {
    let mut columns: Vec<(&'static str, DataType)> = schema::TEXT_COLUMNS
        .iter()
        .map(|name| (*name, DataType::String))
        .collect();

    columns.extend(Metric::ALL.iter().map(|metric| {
        let dtype = if metric.is_count() {
            DataType::Int64
        } else {
            DataType::Float64
        };
        (metric.column(), dtype)
    }));

    columns
}

/// True when any non-null value of a float column is not a whole number.
fn has_fraction(series: &Series) -> PolarsResult<bool> {
    let values = series.cast(&DataType::Float64)?;
    let has_fraction = values.f64()?.into_iter().flatten().any(|v| v.fract() != 0.0);
    Ok(has_fraction)
}

/// Typed views over the required columns of a validated frame.
struct RecordColumns<'a> {
    country: &'a StringChunked,
    who_region: &'a StringChunked,
    confirmed: &'a Int64Chunked,
    deaths: &'a Int64Chunked,
    active: &'a Int64Chunked,
    recovered: &'a Int64Chunked,
    new_deaths: &'a Int64Chunked,
    new_recovered: &'a Int64Chunked,
    one_week_change: &'a Int64Chunked,
    deaths_per_100_cases: &'a Float64Chunked,
    recovered_per_100_cases: &'a Float64Chunked,
}

impl<'a> RecordColumns<'a> {
    fn new(df: &'a DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            country: df.column(schema::COUNTRY)?.str()?,
            who_region: df.column(schema::WHO_REGION)?.str()?,
            confirmed: df.column(schema::CONFIRMED)?.i64()?,
            deaths: df.column(schema::DEATHS)?.i64()?,
            active: df.column(schema::ACTIVE)?.i64()?,
            recovered: df.column(schema::RECOVERED)?.i64()?,
            new_deaths: df.column(schema::NEW_DEATHS)?.i64()?,
            new_recovered: df.column(schema::NEW_RECOVERED)?.i64()?,
            one_week_change: df.column(schema::ONE_WEEK_CHANGE)?.i64()?,
            deaths_per_100_cases: df.column(schema::DEATHS_PER_100_CASES)?.f64()?,
            recovered_per_100_cases: df.column(schema::RECOVERED_PER_100_CASES)?.f64()?,
        })
    }

    fn get(&self, idx: usize) -> Option<CaseRecord> {
        Some(CaseRecord {
            country: self.country.get(idx)?.to_string(),
            who_region: self.who_region.get(idx)?.to_string(),
            confirmed: self.confirmed.get(idx)?,
            deaths: self.deaths.get(idx)?,
            active: self.active.get(idx)?,
            recovered: self.recovered.get(idx)?,
            new_deaths: self.new_deaths.get(idx)?,
            new_recovered: self.new_recovered.get(idx)?,
            one_week_change: self.one_week_change.get(idx)?,
            deaths_per_100_cases: self.deaths_per_100_cases.get(idx)?,
            recovered_per_100_cases: self.recovered_per_100_cases.get(idx)?,
        })
    }
}

/// CSV reader settings.
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 10000,
        }
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load and validate a CSV file using Polars.
    pub fn load_csv(&self, path: &Path) -> Result<Dataset, DataLoadError> {
        if !path.is_file() {
            return Err(DataLoadError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .finish()?
            .collect()?;

        let dataset = Dataset::from_frame(df)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.row_count(),
            "Loaded case dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use std::io::Write;

    const HEADER: &str = "Country/Region,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered,Deaths / 100 Cases,Recovered / 100 Cases,1 week change,WHO Region";

    fn load(path: impl AsRef<Path>) -> Result<Dataset, DataLoadError> {
        DataLoader::new().load_csv(path.as_ref())
    }

    fn write_csv(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_file() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Afghanistan,36263,1269,25198,9796,106,10,18,3.5,69.49,1,Eastern Mediterranean\n\
             Albania,4880,144,2745,1991,117,6,63,2.95,56.25,15,Europe\n"
        ));

        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.row_count(), 2);

        let albania = dataset.record(1).unwrap();
        assert_eq!(albania.country, "Albania");
        assert_eq!(albania.who_region, "Europe");
        assert_eq!(albania.active, 1991);
        assert_eq!(albania.new_recovered, 63);
        assert!((albania.deaths_per_100_cases - 2.95).abs() < 1e-9);
        assert_eq!(albania.one_week_change, 15);
    }

    #[test]
    fn test_missing_file() {
        let err = load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv(
            "Country/Region,Confirmed,Deaths\n\
             Albania,4880,144\n",
        );

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(_)));
    }

    #[test]
    fn test_non_numeric_count_column() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Albania,lots,144,2745,1991,117,6,63,2.95,56.25,15,Europe\n"
        ));

        let err = load(file.path()).unwrap_err();
        match err {
            DataLoadError::InvalidColumn { column, .. } => assert_eq!(column, "Confirmed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_count_is_rejected() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Afghanistan,36263.7,1269,25198,9796,106,10,18,3.5,69.49,1,Eastern Mediterranean\n\
             Albania,4880.9,144,2745,1991,117,6,63,2.95,56.25,15,Europe\n"
        ));

        let err = load(file.path()).unwrap_err();
        match err {
            DataLoadError::InvalidColumn { column, .. } => assert_eq!(column, "Confirmed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whole_float_counts_are_accepted() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Albania,4880.0,144,2745,1991,117,6,63,2.95,56.25,15,Europe\n"
        ));

        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.count_sum(Metric::Confirmed).unwrap(), 4880);
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Albania,4880,144,2745,1991,117,6,63,2.95,56.25,15,Europe,extra,fields\n"
        ));

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::Polars(_)));
    }

    #[test]
    fn test_empty_cell_is_rejected() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             Albania,4880,,2745,1991,117,6,63,2.95,56.25,15,Europe\n\
             Algeria,27973,1163,18837,7973,616,8,749,4.16,67.34,19,Africa\n"
        ));

        let err = load(file.path()).unwrap_err();
        match err {
            DataLoadError::MissingValues { column, count } => {
                assert_eq!(column, "Deaths");
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_records_round_trip_through_frame() {
        let records = fixtures::sample_records();
        let dataset = Dataset::from_records(&records).unwrap();

        assert_eq!(dataset.records().unwrap(), records);
        assert!(dataset.record(records.len()).is_err());
    }

    #[test]
    fn test_distinct_values() {
        let dataset = fixtures::sample_dataset();

        let regions = dataset.distinct_values(schema::WHO_REGION);
        assert_eq!(regions, vec!["Americas", "Europe", "Africa"]);
        assert!(dataset.distinct_values("Population").is_empty());
    }

    #[test]
    fn test_count_sum_of_empty_dataset_is_zero() {
        let dataset = Dataset::from_records(&[]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.count_sum(Metric::Confirmed).unwrap(), 0);
    }
}
