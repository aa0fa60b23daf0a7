//! Aggregation, imputation and summary statistics.
//!
//! Rows are grouped into daily totals and per-interval means, missing step
//! counts are filled from per-`(interval, weekday)` means, and the headline
//! numbers of the report are extracted from the resulting tables.

pub mod aggregate;
pub mod analyzer;
pub mod impute;
pub mod summary;
pub mod types;
pub mod utility;
