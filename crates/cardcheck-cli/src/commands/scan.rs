//! Scan command - check every document in a directory.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use cardcheck_core::pipeline::PROGRESS_INTERVAL;
use cardcheck_core::{discover_documents, write_report, Pipeline, DEFAULT_REPORT_NAME};

use super::{load_config, load_vocabulary};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Directory holding the scanned records
    #[arg(short, long)]
    dir: PathBuf,

    /// CSV file with the accepted manufacturer terms
    #[arg(long)]
    vaccines: PathBuf,

    /// Report file name, written inside the input directory
    #[arg(short, long, default_value = DEFAULT_REPORT_NAME)]
    output: String,

    /// Number of documents checked concurrently
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,
}

pub async fn run(args: ScanArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    // Everything that can abort the run is checked before the first document.
    if !args.dir.is_dir() {
        anyhow::bail!("Not a valid directory: {}", args.dir.display());
    }
    let config = load_config(config_path)?;
    let vocabulary = load_vocabulary(&args.vaccines)?;

    let documents = discover_documents(&args.dir, &[args.output.as_str()])?;
    println!(
        "{} Found {} files to check",
        style("ℹ").blue(),
        documents.len()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Pipeline::from_config(&config, vocabulary);
    let result = pipeline
        .run(&documents, args.jobs, |_| {
            pb.inc(1);
            let done = pb.position();
            if done % PROGRESS_INTERVAL as u64 == 0 {
                pb.suspend(|| println!("{} files processed.", done));
            }
        })
        .await;
    pb.finish_and_clear();
    let report = result?;

    let report_path = args.dir.join(&args.output);
    write_report(&report_path, &report.records)?;
    info!("Report written to {}", report_path.display());

    println!(
        "{} Checked {} files in {:.1}s",
        style("✓").green(),
        report.total(),
        report.elapsed.as_secs_f64()
    );
    println!(
        "   {} valid, {} invalid, {} unreadable",
        style(report.valid_count()).green(),
        style(report.total() - report.valid_count() - report.unreadable_count()).yellow(),
        style(report.unreadable_count()).red()
    );
    println!(
        "{} Report written to {}",
        style("✓").green(),
        report_path.display()
    );

    Ok(())
}
