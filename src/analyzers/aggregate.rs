use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::types::{
    DailyTotal, ImputedDailyTotal, IntervalMean, WeekendIntervalMean,
};
use crate::calendar::{AnnotatedObservation, DayOfWeek};

/// How the present values of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
}

/// One output row of [`group_by`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K> {
    pub key: K,
    pub value: f64,
    /// Number of present values the group was reduced from.
    pub count: usize,
}

/// Groups `rows` by `key`, reducing the present values returned by `value`.
///
/// Missing values are skipped. A group whose values are all missing yields no
/// row. Output is in ascending key order.
pub fn group_by<T, K, FK, FV>(rows: &[T], key: FK, value: FV, reducer: Reducer) -> Vec<Group<K>>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> Option<f64>,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();

    for row in rows {
        let Some(v) = value(row) else {
            continue;
        };
        let slot = acc.entry(key(row)).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    acc.into_iter()
        .map(|(key, (sum, count))| Group {
            key,
            value: match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / count as f64,
            },
            count,
        })
        .collect()
}

/// Total steps per day, keyed by `(date, is_weekend)`.
pub fn daily_totals(rows: &[AnnotatedObservation]) -> Vec<DailyTotal> {
    group_by(rows, |r| (r.date, r.is_weekend), |r| r.steps, Reducer::Sum)
        .into_iter()
        .map(|g| DailyTotal {
            date: g.key.0,
            is_weekend: g.key.1,
            steps: g.value,
        })
        .collect()
}

/// Mean steps per interval across all days.
pub fn interval_profile(rows: &[AnnotatedObservation]) -> Vec<IntervalMean> {
    group_by(rows, |r| r.interval, |r| r.steps, Reducer::Mean)
        .into_iter()
        .map(|g| IntervalMean {
            interval: g.key,
            steps: g.value,
        })
        .collect()
}

/// Mean steps per interval, split into weekdays and weekends.
pub fn weekend_profile(rows: &[AnnotatedObservation]) -> Vec<WeekendIntervalMean> {
    group_by(rows, |r| (r.interval, r.is_weekend), |r| r.steps, Reducer::Mean)
        .into_iter()
        .map(|g| WeekendIntervalMean {
            interval: g.key.0,
            is_weekend: g.key.1,
            steps: g.value,
        })
        .collect()
}

/// Mean steps per `(interval, weekday)` slot.
pub fn slot_means(rows: &[AnnotatedObservation]) -> Vec<Group<(u16, DayOfWeek)>> {
    group_by(rows, |r| (r.interval, r.weekday), |r| r.steps, Reducer::Mean)
}

/// Sums per `(date, flag)` where `flag` comes from the caller.
pub(crate) fn flagged_daily_totals<T>(
    rows: &[T],
    key: impl Fn(&T) -> (NaiveDate, bool),
    value: impl Fn(&T) -> Option<f64>,
) -> Vec<ImputedDailyTotal> {
    group_by(rows, key, value, Reducer::Sum)
        .into_iter()
        .map(|g| ImputedDailyTotal {
            date: g.key.0,
            is_imputed: g.key.1,
            steps: g.value,
        })
        .collect()
}
