//! Runtime settings resolved from the environment (and `.env`).

use std::path::PathBuf;

use crate::fetch::archive::DEFAULT_ENTRY;

pub const DEFAULT_DATASET_URL: &str =
    "https://d396qusza40orc.cloudfront.net/repdata%2Fdata%2Factivity.zip";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "logs/activity_report.log";

const ARCHIVE_NAME: &str = "activity.zip";

/// Where the dataset comes from and where files go.
///
/// | Variable            | Default                      |
/// |---------------------|------------------------------|
/// | `ACTIVITY_DATA_URL` | course dataset archive       |
/// | `ACTIVITY_DATA_DIR` | `data`                       |
/// | `LOG_FILE_PATH`     | `logs/activity_report.log`   |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dataset_url: String,
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            dataset_url: get("ACTIVITY_DATA_URL", DEFAULT_DATASET_URL),
            data_dir: PathBuf::from(get("ACTIVITY_DATA_DIR", DEFAULT_DATA_DIR)),
            log_file_path: PathBuf::from(get("LOG_FILE_PATH", DEFAULT_LOG_FILE)),
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_ENTRY)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_NAME)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
