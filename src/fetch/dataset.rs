use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use super::archive::{DEFAULT_ENTRY, extract_csv};
use super::{BasicClient, fetch_bytes};
use crate::config::Settings;

/// Downloads the dataset archive into the data directory and extracts the CSV.
///
/// Returns the path of the extracted CSV. When it already exists the download
/// is skipped unless `force` is set.
#[tracing::instrument(skip(settings), fields(url = %settings.dataset_url, data_dir = %settings.data_dir.display()))]
pub async fn download_dataset(settings: &Settings, force: bool) -> Result<PathBuf> {
    let csv_path = settings.csv_path();

    if csv_path.exists() && !force {
        info!(path = %csv_path.display(), "Dataset already present, skipping download");
        return Ok(csv_path);
    }

    std::fs::create_dir_all(&settings.data_dir)
        .with_context(|| format!("creating '{}'", settings.data_dir.display()))?;

    let client = BasicClient::new()?;
    let started = std::time::Instant::now();
    let body = fetch_bytes(&client, &settings.dataset_url).await?;
    info!(
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dataset archive downloaded"
    );

    let archive_path = settings.archive_path();
    std::fs::write(&archive_path, &body)
        .with_context(|| format!("writing '{}'", archive_path.display()))?;

    let csv = extract_csv(&body, DEFAULT_ENTRY)?;
    std::fs::write(&csv_path, &csv)
        .with_context(|| format!("writing '{}'", csv_path.display()))?;

    info!(path = %csv_path.display(), bytes = csv.len(), "Dataset extracted");
    Ok(csv_path)
}
