//! Scalar summaries pulled out of the aggregated tables.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::analyzers::types::{DistributionSummary, IntervalMean};
use crate::analyzers::utility::{mean, median};
use crate::calendar::AnnotatedObservation;

/// Interval with the highest mean. Ties go to the lowest interval id.
pub fn peak_interval(profile: &[IntervalMean]) -> Option<IntervalMean> {
    let mut best: Option<&IntervalMean> = None;
    for entry in profile {
        match best {
            Some(b) if entry.steps > b.steps => best = Some(entry),
            Some(b) if entry.steps == b.steps && entry.interval < b.interval => best = Some(entry),
            None => best = Some(entry),
            _ => {}
        }
    }
    best.cloned()
}

/// Mean and median over `(date, total)` rows. `None` when there are no rows.
pub fn distribution(
    totals: impl IntoIterator<Item = (NaiveDate, f64)>,
) -> Option<DistributionSummary> {
    let (dates, values): (Vec<NaiveDate>, Vec<f64>) = totals.into_iter().unzip();
    let days = dates.iter().collect::<HashSet<_>>().len();
    Some(DistributionSummary {
        rows: values.len(),
        days,
        mean: mean(&values)?,
        median: median(&values)?,
    })
}

pub fn missing_count(rows: &[AnnotatedObservation]) -> usize {
    rows.iter().filter(|r| r.steps.is_none()).count()
}

/// Intervals on `date` with a recorded, non-zero step count.
pub fn active_intervals_on(rows: &[AnnotatedObservation], date: NaiveDate) -> usize {
    rows.iter()
        .filter(|r| r.date == date)
        .filter(|r| matches!(r.steps, Some(s) if s > 0.0))
        .count()
}
