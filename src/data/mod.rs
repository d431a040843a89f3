//! Data module - CSV loading, schema and the filter/aggregate pipeline

mod loader;
mod processor;
mod record;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::{DataLoader, Dataset};
pub use processor::{DataProcessor, ProcessorError, RegionAggregate, Selection};
pub use record::CaseRecord;
pub use schema::Metric;
