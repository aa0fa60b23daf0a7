//! Data types produced by the analysis pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{AnnotatedObservation, DayOfWeek};

/// Total steps for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub steps: f64,
}

/// Mean steps for one interval across all days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalMean {
    pub interval: u16,
    pub steps: f64,
}

/// Mean steps for one interval on weekdays or on weekends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekendIntervalMean {
    pub interval: u16,
    pub is_weekend: bool,
    pub steps: f64,
}

/// Total steps for one day after imputation, split by the imputation flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedDailyTotal {
    pub date: NaiveDate,
    pub is_imputed: bool,
    pub steps: f64,
}

/// An observation after missing steps were filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedObservation {
    pub steps: f64,
    pub date: NaiveDate,
    pub interval: u16,
    pub weekday: DayOfWeek,
    pub is_weekend: bool,
    /// Mean of the `(interval, weekday)` slot, when the slot has any data.
    pub imputed_value: Option<f64>,
    /// Depends on the [`FlagMode`](crate::analyzers::impute::FlagMode) used.
    pub is_imputed: bool,
    /// The original steps value was missing and got filled.
    pub was_missing: bool,
}

impl ImputedObservation {
    /// Back to an annotated row with every value present.
    pub fn to_annotated(&self) -> AnnotatedObservation {
        AnnotatedObservation {
            steps: Some(self.steps),
            date: self.date,
            interval: self.interval,
            weekday: self.weekday,
            is_weekend: self.is_weekend,
        }
    }
}

/// Mean and median of a daily-totals column.
///
/// Post-imputation totals in value-match mode can hold two rows for one date,
/// so `rows` and `days` may differ. The statistics are taken over `rows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub rows: usize,
    pub days: usize,
    pub mean: f64,
    pub median: f64,
}

/// Headline numbers of a report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub observations: usize,
    pub days: usize,
    pub missing_steps: usize,
    pub before_imputation: Option<DistributionSummary>,
    pub after_imputation: Option<DistributionSummary>,
    pub peak_interval: Option<IntervalMean>,
}

/// Everything the analysis produces: four tables plus the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub daily_totals: Vec<DailyTotal>,
    pub interval_profile: Vec<IntervalMean>,
    pub imputed_daily_totals: Vec<ImputedDailyTotal>,
    pub weekend_profile: Vec<WeekendIntervalMean>,
    pub summary: ReportSummary,
}
