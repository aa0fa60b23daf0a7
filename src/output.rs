//! Report output: text summary, JSON, and CSV tables.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{ActivityReport, DistributionSummary, ReportSummary};

pub const DAILY_TOTALS_FILE: &str = "daily_totals.csv";
pub const INTERVAL_PROFILE_FILE: &str = "interval_profile.csv";
pub const IMPUTED_DAILY_TOTALS_FILE: &str = "imputed_daily_totals.csv";
pub const WEEKEND_PROFILE_FILE: &str = "weekend_profile.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &ReportSummary) {
    debug!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &ReportSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Plain-text block with the headline numbers.
pub fn render_summary(summary: &ReportSummary) -> String {
    let peak = match &summary.peak_interval {
        Some(p) => format!("{} ({:.2} steps on average)", p.interval, p.steps),
        None => "n/a".to_string(),
    };

    let lines = [
        format!(
            "Observations: {} over {} days",
            summary.observations, summary.days
        ),
        format!("Missing step values: {}", summary.missing_steps),
        format!("Most active interval: {peak}"),
        distribution_line("before imputation", summary.before_imputation.as_ref()),
        distribution_line("after imputation", summary.after_imputation.as_ref()),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn distribution_line(label: &str, d: Option<&DistributionSummary>) -> String {
    match d {
        Some(d) => format!(
            "Daily steps {label}: mean {:.2}, median {:.2} ({} rows over {} days)",
            d.mean, d.median, d.rows, d.days
        ),
        None => format!("Daily steps {label}: n/a"),
    }
}

/// Writes `rows` as a CSV file with a header row, replacing any existing file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating '{}'", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Table written");
    Ok(())
}

/// Writes the four tables and `summary.json` into `dir`, creating it if needed.
#[tracing::instrument(skip(report), fields(dir = %dir.display()))]
pub fn write_report(dir: &Path, report: &ActivityReport) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating '{}'", dir.display()))?;

    write_table(&dir.join(DAILY_TOTALS_FILE), &report.daily_totals)?;
    write_table(&dir.join(INTERVAL_PROFILE_FILE), &report.interval_profile)?;
    write_table(&dir.join(IMPUTED_DAILY_TOTALS_FILE), &report.imputed_daily_totals)?;
    write_table(&dir.join(WEEKEND_PROFILE_FILE), &report.weekend_profile)?;

    let summary_path = dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&report.summary)?;
    fs::write(&summary_path, json)
        .with_context(|| format!("writing '{}'", summary_path.display()))?;

    info!("Report files written");
    Ok(())
}
