//! Date extraction and normalization.

use chrono::NaiveDate;

use super::patterns::{DATE_CANDIDATE, NUMERIC_DATE, ORDINAL_DAY, SPACED_SEPARATOR};
use super::{ExtractionMatch, FieldExtractor};

/// Canonical output format.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Date candidate extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_CANDIDATE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.start(), m.end()))
            .collect()
    }
}

/// Raw date candidates in order of appearance.
pub fn extract_dates(text: &str) -> Vec<String> {
    DateExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Normalize candidates to `MM/DD/YYYY`, silently dropping the ones that do
/// not parse. Order is kept and duplicates are not removed.
pub fn normalize_dates<S: AsRef<str>>(candidates: &[S]) -> Vec<String> {
    candidates
        .iter()
        .filter_map(|c| normalize_date(c.as_ref()))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

/// Parse one candidate into a calendar date.
pub fn normalize_date(candidate: &str) -> Option<NaiveDate> {
    let cleaned = candidate.replace('|', "/");
    let cleaned = SPACED_SEPARATOR.replace_all(cleaned.trim(), "/");

    if let Some(caps) = NUMERIC_DATE.captures(&cleaned) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;

        // Month first, unless only a day-first reading is possible.
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else {
            (first, second)
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    parse_month_name_date(&cleaned)
}

/// "Mar 15, 2021", "15th March 2021", "15-Mar-21".
fn parse_month_name_date(text: &str) -> Option<NaiveDate> {
    let mut month = None;
    let mut numbers = Vec::with_capacity(2);

    for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        if token.chars().all(|c| c.is_ascii_digit()) {
            numbers.push(token);
        } else if let Some(caps) = ORDINAL_DAY.captures(token) {
            numbers.push(caps.get(1)?.as_str());
        } else if month.is_none() {
            month = Some(month_to_number(token)?);
        } else {
            return None;
        }
    }

    match (month, numbers.as_slice()) {
        (Some(month), [day, year]) => {
            let day: u32 = day.parse().ok()?;
            NaiveDate::from_ymd_opt(parse_year(year)?, month, day)
        }
        _ => None,
    }
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        4 => Some(year),
        // Two-digit year: 00-68 -> 2000s, 69-99 -> 1900s
        2 if year <= 68 => Some(2000 + year),
        2 => Some(1900 + year),
        _ => None,
    }
}

/// Full or abbreviated English month name (at least three letters).
fn month_to_number(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&token))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_numeric_dates() {
        let text = "1st dose 03/15/2021 2nd dose 4-12-21 booster 11 | 02 | 2021";
        assert_eq!(
            extract_dates(text),
            vec!["03/15/2021", "4-12-21", "11 | 02 | 2021"]
        );
    }

    #[test]
    fn test_extract_requires_leading_whitespace() {
        // Glued to a lot code, so not a candidate.
        assert!(extract_dates("LotEJ1234/03/15/2021").is_empty());
        assert_eq!(extract_dates("03/15/2021 at clinic"), vec!["03/15/2021"]);
    }

    #[test]
    fn test_extract_rejects_non_20xx_years() {
        assert!(extract_dates("born 03/15/1985").is_empty());
        assert!(extract_dates("phone 555-12-34").is_empty());
    }

    #[test]
    fn test_extract_month_name_dates() {
        let text = "Given Mar 15, 2021 and again 12 April 2021 then Sept 3rd 2021";
        assert_eq!(
            extract_dates(text),
            vec!["Mar 15, 2021", "12 April 2021", "Sept 3rd 2021"]
        );
    }

    #[test]
    fn test_extract_ignores_month_like_words() {
        assert!(extract_dates("Decision 5 pending").is_empty());
    }

    #[test]
    fn test_extractor_positions() {
        let found = DateExtractor::new().extract("Dose 03/15/2021").unwrap();
        assert_eq!(found.value, "03/15/2021");
        assert_eq!(found.position, (5, 15));
    }

    #[test]
    fn test_normalize_separators() {
        let candidates = ["03|15|2021", "03 - 15 - 2021", "03 / 15 / 2021", "3-15-21"];
        assert_eq!(
            normalize_dates(&candidates),
            vec!["03/15/2021", "03/15/2021", "03/15/2021", "03/15/2021"]
        );
    }

    #[test]
    fn test_normalize_day_first_when_unambiguous() {
        assert_eq!(normalize_dates(&["15/03/2021"]), vec!["03/15/2021"]);
        // Ambiguous: month first.
        assert_eq!(normalize_dates(&["04/05/2021"]), vec!["04/05/2021"]);
    }

    #[test]
    fn test_normalize_month_names() {
        let candidates = ["Mar 15, 2021", "12 April 2021", "Sept 3rd 2021", "15-MAR-21"];
        assert_eq!(
            normalize_dates(&candidates),
            vec!["03/15/2021", "04/12/2021", "09/03/2021", "03/15/2021"]
        );
    }

    #[test]
    fn test_normalize_drops_unparseable() {
        let candidates = ["13/13/2021", "02/30/2021", "03/15/2021", "Foo 12 2021"];
        assert_eq!(normalize_dates(&candidates), vec!["03/15/2021"]);
    }

    #[test]
    fn test_normalize_keeps_duplicates_and_order() {
        let candidates = ["05/01/2021", "01/20/2021", "05/01/2021"];
        assert_eq!(
            normalize_dates(&candidates),
            vec!["05/01/2021", "01/20/2021", "05/01/2021"]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for date in ["03/15/2021", "12/31/2020", "01/01/2022"] {
            let once = normalize_dates(&[date]);
            assert_eq!(once, vec![date.to_string()]);
            assert_eq!(normalize_dates(&once), once);
        }
    }

    #[test]
    fn test_month_to_number() {
        assert_eq!(month_to_number("Jan"), Some(1));
        assert_eq!(month_to_number("SEPT"), Some(9));
        assert_eq!(month_to_number("december"), Some(12));
        assert_eq!(month_to_number("Ma"), None);
        assert_eq!(month_to_number("Moderna"), None);
    }
}
