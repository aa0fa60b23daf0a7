//! CLI entry point for the activity report.
//!
//! `download` fetches and unpacks the step-count dataset; `report` loads it,
//! fills missing values and prints the summary statistics.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use activity_report::analyzers::analyzer::analyze;
use activity_report::analyzers::impute::FlagMode;
use activity_report::config::Settings;
use activity_report::fetch::{download_dataset, read_source};
use activity_report::output::{print_json, print_pretty, render_summary, write_report};
use activity_report::parser::parse_activity;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "activity_report")]
#[command(about = "Step-count activity analysis with missing-value imputation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and extract the activity dataset into the data directory
    Download {
        /// Download again even if the CSV is already present
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Analyze the dataset and print summary statistics
    Report {
        /// CSV, .zip or .csv.gz path, or URL (defaults to <data dir>/activity.csv)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Directory to write the aggregated tables and summary.json into
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// How imputed rows are flagged
        #[arg(long, value_enum, default_value_t = FlagMode::ValueMatch)]
        flag_mode: FlagMode,

        /// Also log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let _log_guard = init_logging(&settings.log_file_path)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Download { force } => {
            let path = download_dataset(&settings, force).await?;
            info!(path = %path.display(), "Dataset ready");
        }
        Commands::Report {
            source,
            out,
            flag_mode,
            json,
        } => {
            let source =
                source.unwrap_or_else(|| settings.csv_path().to_string_lossy().into_owned());

            let bytes = read_source(&source).await?;
            let observations = parse_activity(&bytes)?;
            info!(source = %source, rows = observations.len(), "Dataset loaded");

            let report = analyze(&observations, flag_mode)?;

            print!("{}", render_summary(&report.summary));
            print_pretty(&report.summary);
            if json {
                print_json(&report.summary)?;
            }

            if let Some(dir) = out {
                write_report(&dir, &report)?;
            }
        }
    }

    Ok(())
}

/// Coloured stderr output plus a daily-rolling JSON log file.
fn init_logging(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("activity_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}
