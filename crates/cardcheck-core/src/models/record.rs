//! Per-document evidence and validation records.

use serde::{Deserialize, Serialize};

/// Diagnostic for documents whose file could not be read.
pub const FLAG_UNREADABLE: &str = "File could not be read";

/// Diagnostic for documents without the marker phrase.
pub const FLAG_MARKER_NOT_FOUND: &str = "COVID-19 Vaccination Record phrase not found";

/// Which acquisition path produced a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSource {
    /// Text layer of the first PDF page.
    NativePdfText,
    /// OCR of a rendering of the first PDF page.
    OcrFromPdfRender,
    /// OCR of the file itself.
    OcrFromImage,
}

impl TextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSource::NativePdfText => "native-pdf-text",
            TextSource::OcrFromPdfRender => "ocr-from-pdf-render",
            TextSource::OcrFromImage => "ocr-from-image",
        }
    }
}

impl std::fmt::Display for TextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEvidence {
    /// Whether the marker phrase was found.
    pub has_vaccine_marker: bool,

    /// Vocabulary term the manufacturer matched, if any.
    pub manufacturer_raw: String,

    /// Canonical display name for `manufacturer_raw`.
    pub manufacturer: String,

    /// Dates in `MM/DD/YYYY`, in order of appearance.
    pub dates: Vec<String>,

    /// Lot codes, in order of appearance.
    pub lot_numbers: Vec<String>,

    /// Diagnostic; empty when nothing went wrong.
    pub flag: String,

    /// Where the text came from. `None` when no text could be acquired.
    pub text_source: Option<TextSource>,
}

impl FieldEvidence {
    /// Evidence for a document whose text could not be acquired.
    pub fn unreadable() -> Self {
        Self {
            flag: FLAG_UNREADABLE.to_string(),
            ..Self::default()
        }
    }

    /// Evidence for a readable document lacking the marker phrase.
    pub fn marker_not_found(source: TextSource) -> Self {
        Self {
            flag: FLAG_MARKER_NOT_FOUND.to_string(),
            text_source: Some(source),
            ..Self::default()
        }
    }
}

/// Terminal state of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid,
    Unreadable,
}

/// Final output row for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub filename: String,
    pub id: String,
    #[serde(flatten)]
    pub evidence: FieldEvidence,
    pub has_manufacturer: bool,
    pub has_at_least_one_date: bool,
    pub has_at_least_one_lot_number: bool,
    /// Number of corroborating fields present (0 - 3).
    pub valid_checks: u8,
    pub is_valid: bool,
    pub outcome: Outcome,
}
