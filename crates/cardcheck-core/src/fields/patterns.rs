//! Regex patterns for vaccination record fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date candidates. Group 1 holds the date; it must start after whitespace
    // (or at the start of the text) so digit runs glued to other tokens, such
    // as lot codes, are not picked up. Years are 20xx or a two-digit 2x.
    pub static ref DATE_CANDIDATE: Regex = Regex::new(concat!(
        r"(?i)(?:^|\s)(",
        // 03/15/2021, 3-15-21, 03 | 15 | 2021
        r"\d{1,2}\s*[-/|]\s*\d{1,2}\s*[-/|]\s*(?:20\d{2}|2\d)\b",
        // Mar 15, 2021 / March 15th 2021
        r"|(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)",
        r"\.?[\s/-]*\d{1,2}(?:st|nd|rd|th)?,?[\s/-]+(?:20\d{2}|2\d)\b",
        // 15 March 2021 / 15-Mar-21
        r"|\d{1,2}(?:st|nd|rd|th)?[\s/-]*",
        r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)",
        r"\.?,?[\s/-]*(?:20\d{2}|2\d)\b",
        r")"
    )).unwrap();

    // Separators padded with spaces on both sides ("03 - 15 - 2021").
    pub static ref SPACED_SEPARATOR: Regex = Regex::new(r"\s+[/-]\s+").unwrap();

    // Fully numeric date after separator cleanup.
    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"^(\d{1,2})\s*[/-]\s*(\d{1,2})\s*[/-]\s*(\d{4}|\d{2})$"
    ).unwrap();

    // Ordinal suffix on a day number.
    pub static ref ORDINAL_DAY: Regex = Regex::new(r"(?i)^(\d{1,2})(?:st|nd|rd|th)$").unwrap();

    // Accepted lot code shapes: 123A45B, EJ1234, A12345.
    pub static ref LOT_NUMBER: Regex = Regex::new(
        r"[0-9]{3}[A-Z][0-9]{2}[A-Z]|E[A-Z][0-9]{4}|A[0-9]{5}"
    ).unwrap();
}
