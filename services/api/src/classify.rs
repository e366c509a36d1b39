use crate::infra::build_classifier;
use bookvpro::config::{AppConfig, MAX_WORKERS};
use bookvpro::error::AppError;
use bookvpro::export::{write_spreadsheet, SpreadsheetFormat};
use bookvpro::telemetry;
use bookvpro::workflows::grading::{ClassificationRecord, Grade};
use bookvpro::workflows::jobs::normalize_titles;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// File with one title per line (reads stdin when omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Write the result spreadsheet to this path (.csv for CSV, otherwise xlsx)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Concurrent lookups (defaults to BOOKVPRO_WORKERS)
    #[arg(long)]
    pub(crate) workers: Option<usize>,
}

pub(crate) async fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let ClassifyArgs {
        input,
        output,
        workers,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    let titles = normalize_titles(raw.lines());
    if titles.is_empty() {
        println!("No titles to classify");
        return Ok(());
    }

    let workers = workers.unwrap_or(config.jobs.workers).clamp(1, MAX_WORKERS);
    let classifier = build_classifier(&config)?;
    let records = classifier
        .classify_all(titles, workers, config.jobs.request_delay)
        .await;

    print!("{}", render_table(&records));

    if let Some(path) = output {
        let sheet = write_spreadsheet(&records, SpreadsheetFormat::from_path(&path))?;
        tokio::fs::write(&path, sheet).await?;
        println!("Spreadsheet written to {}", path.display());
    }

    Ok(())
}

fn render_table(records: &[ClassificationRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            record.grade, record.seller_count, record.search_volume, record.title, record.link
        );
    }
    let graded_a = records
        .iter()
        .filter(|record| record.grade == Grade::A)
        .count();
    let _ = write!(out, "\n{} titles | {} graded A\n", records.len(), graded_a);
    out
}
