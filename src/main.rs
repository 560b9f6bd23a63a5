//! AnodeLog - headless dashboard pass over anode current logs
//!
//! Loads the CSV files named on the command line, applies the saved default
//! timeframe and column selection (or the ones given as options), and prints
//! the dashboard as JSON.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use anodelog::analysis::resample::Timeframe;
use anodelog::loader::UploadedFile;
use anodelog::normalize::TIMESTAMP_FORMAT;
use anodelog::session::AnalysisSession;
use anodelog::settings::UserSettings;

#[derive(Parser, Debug)]
#[command(name = "anodelog", version, about = "Anode current log analyzer")]
struct Args {
    /// Logger CSV exports to combine
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Timeframe preset, e.g. "10s (avg)" or "1 hr (avg)"
    #[arg(long)]
    timeframe: Option<Timeframe>,

    /// Extra column to summarize and chart (repeatable)
    #[arg(long = "select")]
    selected: Vec<String>,

    /// Range start, "DD/MM/YYYY HH:MM:SS"
    #[arg(long, value_parser = parse_instant, requires = "to")]
    from: Option<NaiveDateTime>,

    /// Range end, "DD/MM/YYYY HH:MM:SS"
    #[arg(long, value_parser = parse_instant, requires = "from")]
    to: Option<NaiveDateTime>,

    /// Save the timeframe and accepted selection as the new defaults
    #[arg(long)]
    remember: bool,
}

fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let files = args
        .files
        .iter()
        .map(|p| UploadedFile::from_path(p).with_context(|| format!("reading {}", p.display())))
        .collect::<Result<Vec<_>>>()?;

    let mut settings = UserSettings::load();
    let mut request = settings.to_request();
    if let Some(timeframe) = args.timeframe {
        request.timeframe = timeframe;
    }
    if !args.selected.is_empty() {
        request.selected = args.selected;
    }
    if let (Some(start), Some(end)) = (args.from, args.to) {
        request = request.with_range(start, end);
    }

    let mut session = AnalysisSession::new();
    let dashboard = session
        .run(&files, &request)
        .with_context(|| format!("analysis failed ({} files)", files.len()))?;

    if !dashboard.file_errors.is_empty() {
        tracing::warn!(
            "{} of {} files skipped",
            dashboard.file_errors.len(),
            files.len()
        );
    }

    if args.remember {
        settings.remember(&request, &dashboard);
        settings.save().map_err(|e| anyhow!(e))?;
        tracing::info!("Saved defaults: {}", request.timeframe.label());
    }

    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
