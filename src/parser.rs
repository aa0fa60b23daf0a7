//! CSV loader for the activity dataset.
//!
//! Expected header: `steps,date,interval`. Missing step counts are either an
//! empty field or `NA`.

use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One 5-minute slot on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub steps: Option<u32>,
    pub date: NaiveDate,
    /// Time-of-day label such as `835` for 08:35. Ordered, but not contiguous.
    pub interval: u16,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    steps: Option<String>,
    date: String,
    interval: String,
}

/// Parses the activity CSV.
///
/// # Errors
///
/// Fails on the first malformed row, on a repeated `(date, interval)` pair,
/// and when the file has no data rows.
pub fn parse_activity(bytes: &[u8]) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let headers = rdr.headers().context("reading CSV header")?.clone();

    for required in ["steps", "date", "interval"] {
        if !headers.iter().any(|h| h == required) {
            bail!("CSV header is missing the '{required}' column (found: {headers:?})");
        }
    }

    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for record in rdr.records() {
        let record = record.context("reading CSV record")?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw: RawRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("line {line}: malformed record"))?;

        let obs = parse_row(raw).with_context(|| format!("line {line}"))?;

        if !seen.insert((obs.date, obs.interval)) {
            bail!(
                "line {line}: duplicate observation for date {} interval {}",
                obs.date,
                obs.interval
            );
        }

        rows.push(obs);
    }

    if rows.is_empty() {
        bail!("activity CSV contains no data rows");
    }

    debug!(rows = rows.len(), "Parsed activity CSV");
    Ok(rows)
}

fn parse_row(raw: RawRow) -> Result<Observation> {
    let steps = match raw.steps.as_deref() {
        None | Some("") | Some("NA") => None,
        Some(s) => Some(
            s.parse::<u32>()
                .with_context(|| format!("invalid step count '{s}'"))?,
        ),
    };

    let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}'", raw.date))?;

    let interval = raw
        .interval
        .parse::<u16>()
        .with_context(|| format!("invalid interval '{}'", raw.interval))?;

    Ok(Observation {
        steps,
        date,
        interval,
    })
}
