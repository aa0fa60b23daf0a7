use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::aggregate::{daily_totals, interval_profile, weekend_profile};
use crate::analyzers::impute::{FlagMode, impute, imputed_daily_totals};
use crate::analyzers::summary::{distribution, missing_count, peak_interval};
use crate::analyzers::types::{ActivityReport, ImputedObservation, ReportSummary};
use crate::calendar::{AnnotatedObservation, annotate};
use crate::parser::Observation;

/// Runs annotate → aggregate → impute → aggregate over the loaded rows.
///
/// # Errors
///
/// Propagates imputation failures (a missing value in a slot with no data).
#[tracing::instrument(skip(observations), fields(rows = observations.len()))]
pub fn analyze(observations: &[Observation], mode: FlagMode) -> Result<ActivityReport> {
    let annotated = annotate(observations);
    let days: HashSet<_> = annotated.iter().map(|r| r.date).collect();

    let daily = daily_totals(&annotated);
    let profile = interval_profile(&annotated);
    let missing = missing_count(&annotated);
    debug!(
        days = days.len(),
        daily_rows = daily.len(),
        intervals = profile.len(),
        missing,
        "Pre-imputation aggregates computed"
    );

    let imputed = impute(&annotated, mode)?;
    let imputed_daily = imputed_daily_totals(&imputed, mode);
    let complete: Vec<AnnotatedObservation> =
        imputed.iter().map(ImputedObservation::to_annotated).collect();
    let weekend = weekend_profile(&complete);

    let summary = ReportSummary {
        observations: annotated.len(),
        days: days.len(),
        missing_steps: missing,
        before_imputation: distribution(daily.iter().map(|d| (d.date, d.steps))),
        after_imputation: distribution(imputed_daily.iter().map(|d| (d.date, d.steps))),
        peak_interval: peak_interval(&profile),
    };

    info!(
        observations = summary.observations,
        days = summary.days,
        missing_steps = summary.missing_steps,
        "Analysis complete"
    );

    Ok(ActivityReport {
        daily_totals: daily,
        interval_profile: profile,
        imputed_daily_totals: imputed_daily,
        weekend_profile: weekend,
        summary,
    })
}
