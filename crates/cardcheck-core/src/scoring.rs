//! Validity verdict for one document.
//!
//! A genuine record need not have every field legible: it must carry the
//! marker phrase plus at least two of manufacturer, date and lot number.

use crate::models::document::DocumentRef;
use crate::models::record::{FieldEvidence, Outcome, ValidationRecord};

/// Corroborating fields required alongside the marker phrase.
pub const REQUIRED_CHECKS: u8 = 2;

/// Build the final record for a document from its evidence.
pub fn score(document: &DocumentRef, evidence: FieldEvidence) -> ValidationRecord {
    let has_manufacturer = !evidence.manufacturer.is_empty();
    let has_at_least_one_date = !evidence.dates.is_empty();
    let has_at_least_one_lot_number = !evidence.lot_numbers.is_empty();

    let valid_checks = [has_manufacturer, has_at_least_one_date, has_at_least_one_lot_number]
        .iter()
        .filter(|&&check| check)
        .count() as u8;

    let is_valid = evidence.has_vaccine_marker && valid_checks >= REQUIRED_CHECKS;

    let outcome = if evidence.text_source.is_none() {
        Outcome::Unreadable
    } else if is_valid {
        Outcome::Valid
    } else {
        Outcome::Invalid
    };

    ValidationRecord {
        filename: document.filename.clone(),
        id: document.derived_id.clone(),
        evidence,
        has_manufacturer,
        has_at_least_one_date,
        has_at_least_one_lot_number,
        valid_checks,
        is_valid,
        outcome,
    }
}
