//! Inspect command - check a single document and print its record.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use cardcheck_core::{DocumentRef, Outcome, Pipeline, ValidationRecord};

use super::{load_config, load_vocabulary};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// CSV file with the accepted manufacturer terms
    #[arg(long)]
    vaccines: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: InspectArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let config = load_config(config_path)?;
    let vocabulary = load_vocabulary(&args.vaccines)?;

    let pipeline = Pipeline::from_config(&config, vocabulary);
    let record = pipeline
        .process_document(&DocumentRef::from_path(&args.input))
        .await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => print!("{}", format_record_text(&record)),
    }

    Ok(())
}

fn format_record_text(record: &ValidationRecord) -> String {
    let evidence = &record.evidence;
    let mut output = String::new();

    let verdict = match record.outcome {
        Outcome::Valid => style("valid").green(),
        Outcome::Invalid => style("invalid").yellow(),
        Outcome::Unreadable => style("unreadable").red(),
    };
    output.push_str(&format!("File: {} (id {})\n", record.filename, record.id));
    output.push_str(&format!("Verdict: {} ({} of 3 checks)\n", verdict, record.valid_checks));

    if let Some(source) = evidence.text_source {
        output.push_str(&format!("Text source: {}\n", source));
    }
    if !evidence.flag.is_empty() {
        output.push_str(&format!("Flag: {}\n", evidence.flag));
    }
    output.push('\n');

    output.push_str(&format!(
        "Marker phrase: {}\n",
        if evidence.has_vaccine_marker { "found" } else { "not found" }
    ));
    output.push_str(&format!("Manufacturer: {}\n", or_dash(&evidence.manufacturer)));
    output.push_str(&format!("Dates: {}\n", or_dash(&evidence.dates.join(", "))));
    output.push_str(&format!("Lot numbers: {}\n", or_dash(&evidence.lot_numbers.join(", "))));

    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
