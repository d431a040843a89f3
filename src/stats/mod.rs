//! Stats module - summary sums and extreme records

mod calculator;

pub use calculator::{format_count, KeyTakeaways, StatsCalculator, SummaryStats};
