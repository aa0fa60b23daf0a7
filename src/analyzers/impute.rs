//! Missing-value imputation from per-`(interval, weekday)` means.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::aggregate::{flagged_daily_totals, slot_means};
use crate::analyzers::types::{ImputedDailyTotal, ImputedObservation};
use crate::calendar::{AnnotatedObservation, DayOfWeek};

/// How `is_imputed` is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlagMode {
    /// A row is flagged when its final steps equal its slot mean. Measured
    /// values that happen to equal the mean are flagged too, and zero-sum
    /// `(date, imputed)` totals are dropped.
    #[default]
    ValueMatch,
    /// A row is flagged when it was filled. Daily totals get one row per date,
    /// flagged when any interval that day was filled.
    Provenance,
}

/// Mean steps per `(interval, weekday)`, from present values only.
#[derive(Debug, Clone, Default)]
pub struct SlotMeans(HashMap<(u16, DayOfWeek), f64>);

impl SlotMeans {
    pub fn from_rows(rows: &[AnnotatedObservation]) -> Self {
        Self(
            slot_means(rows)
                .into_iter()
                .map(|g| (g.key, g.value))
                .collect(),
        )
    }

    pub fn get(&self, interval: u16, weekday: DayOfWeek) -> Option<f64> {
        self.0.get(&(interval, weekday)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fills every missing steps value with its slot mean.
///
/// Slot means are computed over all of `rows`. Present values are kept as-is.
///
/// # Errors
///
/// Fails when a missing value belongs to a slot with no present values.
pub fn impute(rows: &[AnnotatedObservation], mode: FlagMode) -> Result<Vec<ImputedObservation>> {
    let means = SlotMeans::from_rows(rows);
    debug!(slots = means.len(), "Slot means computed");

    let mut out = Vec::with_capacity(rows.len());
    let mut filled = 0usize;

    for r in rows {
        let imputed_value = means.get(r.interval, r.weekday);

        let (steps, was_missing) = match (r.steps, imputed_value) {
            (Some(s), _) => (s, false),
            (None, Some(v)) => (v, true),
            (None, None) => bail!(
                "cannot impute {} interval {}: no {} has a recorded value for that interval",
                r.date,
                r.interval,
                r.weekday
            ),
        };

        if was_missing {
            filled += 1;
        }

        let is_imputed = match mode {
            FlagMode::ValueMatch => imputed_value == Some(steps),
            FlagMode::Provenance => was_missing,
        };

        out.push(ImputedObservation {
            steps,
            date: r.date,
            interval: r.interval,
            weekday: r.weekday,
            is_weekend: r.is_weekend,
            imputed_value,
            is_imputed,
            was_missing,
        });
    }

    info!(filled, rows = out.len(), ?mode, "Imputation complete");
    Ok(out)
}

/// Daily totals after imputation, keyed by `(date, is_imputed)`.
pub fn imputed_daily_totals(rows: &[ImputedObservation], mode: FlagMode) -> Vec<ImputedDailyTotal> {
    match mode {
        FlagMode::ValueMatch => {
            let mut totals = flagged_daily_totals(rows, |r| (r.date, r.is_imputed), |r| Some(r.steps));
            // A zero-sum flagged row only holds measured zeros that matched a zero mean.
            totals.retain(|t| !(t.is_imputed && t.steps == 0.0));
            totals
        }
        FlagMode::Provenance => {
            let filled_days: HashSet<NaiveDate> =
                rows.iter().filter(|r| r.was_missing).map(|r| r.date).collect();
            flagged_daily_totals(
                rows,
                |r| (r.date, filled_days.contains(&r.date)),
                |r| Some(r.steps),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, interval: u16, steps: Option<f64>) -> AnnotatedObservation {
        let date = NaiveDate::from_ymd_opt(2012, 10, day).unwrap();
        let weekday = DayOfWeek::from_date(date);
        AnnotatedObservation {
            steps,
            date,
            interval,
            weekday,
            is_weekend: weekday.is_weekend(),
        }
    }

    // Oct 1, 8 and 15 2012 are Mondays.
    fn mondays() -> Vec<AnnotatedObservation> {
        vec![
            row(1, 0, None),
            row(1, 5, None),
            row(8, 0, Some(0.0)),
            row(8, 5, Some(10.0)),
            row(15, 0, Some(0.0)),
            row(15, 5, Some(30.0)),
        ]
    }

    #[test]
    fn test_missing_values_get_slot_mean() {
        let out = impute(&mondays(), FlagMode::ValueMatch).unwrap();

        assert_eq!(out[0].steps, 0.0);
        assert_eq!(out[1].steps, 20.0);
        assert!(out[0].was_missing && out[1].was_missing);
        assert_eq!(out[3].steps, 10.0);
        assert!(!out[3].was_missing);
    }

    #[test]
    fn test_slot_means_ignore_other_weekdays() {
        let mut rows = mondays();
        // Tuesday at the same interval must not leak into Monday's mean
        rows.push(row(2, 5, Some(1000.0)));

        let out = impute(&rows, FlagMode::ValueMatch).unwrap();
        assert_eq!(out[1].steps, 20.0);
    }

    #[test]
    fn test_value_match_flags_coincidental_measurements() {
        let out = impute(&mondays(), FlagMode::ValueMatch).unwrap();

        // measured zeros equal the zero mean of interval 0
        assert!(out[2].is_imputed);
        assert!(out[4].is_imputed);
        assert!(!out[3].is_imputed);
    }

    #[test]
    fn test_provenance_flags_only_filled_rows() {
        let out = impute(&mondays(), FlagMode::Provenance).unwrap();

        let flagged: Vec<bool> = out.iter().map(|r| r.is_imputed).collect();
        assert_eq!(flagged, vec![true, true, false, false, false, false]);
    }

    #[test]
    fn test_unimputable_slot_fails() {
        let rows = vec![row(1, 0, Some(3.0)), row(2, 0, None)];
        let err = impute(&rows, FlagMode::ValueMatch).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Tuesday"), "{msg}");
        assert!(msg.contains("interval 0"), "{msg}");
    }

    #[test]
    fn test_imputation_is_idempotent() {
        let first = impute(&mondays(), FlagMode::ValueMatch).unwrap();
        let complete: Vec<AnnotatedObservation> =
            first.iter().map(ImputedObservation::to_annotated).collect();

        let second = impute(&complete, FlagMode::ValueMatch).unwrap();

        let a: Vec<f64> = first.iter().map(|r| r.steps).collect();
        let b: Vec<f64> = second.iter().map(|r| r.steps).collect();
        assert_eq!(a, b);
        assert!(second.iter().all(|r| !r.was_missing));
    }

    #[test]
    fn test_value_match_drops_zero_flagged_totals() {
        let out = impute(&mondays(), FlagMode::ValueMatch).unwrap();
        let totals = imputed_daily_totals(&out, FlagMode::ValueMatch);

        // Oct 1: filled 0 + 20 -> (true, 20)
        // Oct 8 and 15: measured zeros form (true, 0) rows that are dropped
        assert_eq!(totals.len(), 3);
        assert!(totals[0].is_imputed);
        assert_eq!(totals[0].steps, 20.0);
        assert!(totals[1..].iter().all(|t| !t.is_imputed));
        assert_eq!(totals[1].steps, 10.0);
        assert_eq!(totals[2].steps, 30.0);
    }

    #[test]
    fn test_value_match_splits_day_with_nonzero_match() {
        let mut rows = mondays();
        // interval 5 mean becomes (10 + 30 + 20) / 3 = 20, matching Oct 22
        rows.push(row(22, 0, Some(6.0)));
        rows.push(row(22, 5, Some(20.0)));

        let out = impute(&rows, FlagMode::ValueMatch).unwrap();
        let totals = imputed_daily_totals(&out, FlagMode::ValueMatch);

        let oct22: Vec<(bool, f64)> = totals
            .iter()
            .filter(|t| t.date == NaiveDate::from_ymd_opt(2012, 10, 22).unwrap())
            .map(|t| (t.is_imputed, t.steps))
            .collect();
        assert_eq!(oct22, vec![(false, 6.0), (true, 20.0)]);
    }

    #[test]
    fn test_provenance_totals_one_row_per_day() {
        let mut rows = mondays();
        rows.push(row(22, 0, None));
        rows.push(row(22, 5, Some(50.0)));

        let out = impute(&rows, FlagMode::Provenance).unwrap();
        let totals = imputed_daily_totals(&out, FlagMode::Provenance);

        assert_eq!(totals.len(), 4);
        let oct22 = totals.last().unwrap();
        assert!(oct22.is_imputed);
        assert_eq!(oct22.steps, 50.0);
        assert!(!totals[1].is_imputed);
    }
}
