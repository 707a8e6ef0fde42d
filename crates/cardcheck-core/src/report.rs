//! CSV report of validation records.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::record::ValidationRecord;

/// Report file name used when none is given.
pub const DEFAULT_REPORT_NAME: &str = "vaccine_data.csv";

/// Separator for list-valued columns.
pub const LIST_SEPARATOR: &str = "; ";

/// Report columns, in order.
pub const REPORT_HEADERS: [&str; 13] = [
    "filename",
    "id",
    "has_vaccine_marker",
    "vaccine_dates",
    "manufacturer",
    "lot_numbers",
    "flag",
    "has_at_least_one_lot_number",
    "has_manufacturer",
    "has_at_least_one_date",
    "valid_checks",
    "valid",
    "text_source",
];

/// Write `records` as CSV to `path`.
///
/// The report is written to a temporary file in the same directory and
/// renamed into place, so a reader never sees a partial file.
pub fn write_report(path: &Path, records: &[ValidationRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        writer.write_record(REPORT_HEADERS)?;
        for record in records {
            writer.write_record(row(record))?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn row(record: &ValidationRecord) -> [String; 13] {
    let evidence = &record.evidence;
    [
        record.filename.clone(),
        record.id.clone(),
        yes_no(evidence.has_vaccine_marker).to_string(),
        evidence.dates.join(LIST_SEPARATOR),
        evidence.manufacturer.clone(),
        evidence.lot_numbers.join(LIST_SEPARATOR),
        evidence.flag.clone(),
        flag(record.has_at_least_one_lot_number).to_string(),
        flag(record.has_manufacturer).to_string(),
        flag(record.has_at_least_one_date).to_string(),
        record.valid_checks.to_string(),
        flag(record.is_valid).to_string(),
        evidence
            .text_source
            .map(|s| s.as_str())
            .unwrap_or_default()
            .to_string(),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
