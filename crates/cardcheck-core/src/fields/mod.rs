//! Rule-based field extractors for vaccination records.
//!
//! All extractors are pure: they never fail and return empty results when
//! nothing matches.

pub mod dates;
pub mod lots;
pub mod patterns;

pub use dates::{extract_dates, normalize_date, normalize_dates, DateExtractor};
pub use lots::{extract_lots, LotExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in order of appearance.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text along with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span (start, end) in the source text.
    pub position: (usize, usize),
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
        }
    }
}
