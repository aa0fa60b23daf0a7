//! Calendar annotation: weekday and weekend flag for each observation.
//!
//! Weekdays come from the proleptic-Gregorian day count and a fixed label
//! table, never from locale-aware date formatting, so the output is the same
//! on every machine.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::parser::Observation;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Indexed by days since 0001-01-01 modulo 7. That date was a Monday.
static DAY_TABLE: [DayOfWeek; 7] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
    DayOfWeek::Sunday,
];

impl DayOfWeek {
    pub fn from_date(date: NaiveDate) -> Self {
        // num_days_from_ce() is 1 for 0001-01-01
        let offset = (date.num_days_from_ce() - 1).rem_euclid(7);
        DAY_TABLE[offset as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// An [`Observation`] with its calendar fields attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedObservation {
    pub steps: Option<f64>,
    pub date: NaiveDate,
    pub interval: u16,
    pub weekday: DayOfWeek,
    pub is_weekend: bool,
}

/// Attaches weekday and weekend flag to every observation.
pub fn annotate(observations: &[Observation]) -> Vec<AnnotatedObservation> {
    observations
        .iter()
        .map(|o| {
            let weekday = DayOfWeek::from_date(o.date);
            AnnotatedObservation {
                steps: o.steps.map(f64::from),
                date: o.date,
                interval: o.interval,
                weekday,
                is_weekend: weekday.is_weekend(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_known_weekdays() {
        assert_eq!(DayOfWeek::from_date(date(2012, 10, 1)), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from_date(date(2012, 10, 6)), DayOfWeek::Saturday);
        assert_eq!(DayOfWeek::from_date(date(2012, 10, 7)), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::from_date(date(2012, 11, 15)), DayOfWeek::Thursday);
        assert_eq!(DayOfWeek::from_date(date(2000, 2, 29)), DayOfWeek::Tuesday);
        assert_eq!(DayOfWeek::from_date(date(1, 1, 1)), DayOfWeek::Monday);
    }

    #[test]
    fn test_matches_chrono_weekday_over_two_months() {
        let mut d = date(2012, 10, 1);
        while d <= date(2012, 11, 30) {
            let ours = DayOfWeek::from_date(d);
            assert_eq!(
                ours as u32,
                d.weekday().num_days_from_monday(),
                "mismatch on {d}"
            );
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_weekend_flag() {
        assert!(DayOfWeek::Saturday.is_weekend());
        assert!(DayOfWeek::Sunday.is_weekend());
        assert!(!DayOfWeek::Monday.is_weekend());
        assert!(!DayOfWeek::Friday.is_weekend());
    }

    #[test]
    fn test_annotate_keeps_missing_steps() {
        let rows = vec![
            Observation {
                steps: None,
                date: date(2012, 10, 6),
                interval: 0,
            },
            Observation {
                steps: Some(12),
                date: date(2012, 10, 8),
                interval: 5,
            },
        ];

        let annotated = annotate(&rows);

        assert_eq!(annotated[0].steps, None);
        assert_eq!(annotated[0].weekday, DayOfWeek::Saturday);
        assert!(annotated[0].is_weekend);
        assert_eq!(annotated[1].steps, Some(12.0));
        assert_eq!(annotated[1].weekday, DayOfWeek::Monday);
        assert!(!annotated[1].is_weekend);
    }

    #[test]
    fn test_label_serializes_as_english_name() {
        let json = serde_json::to_string(&DayOfWeek::Wednesday).unwrap();
        assert_eq!(json, "\"Wednesday\"");
    }
}
