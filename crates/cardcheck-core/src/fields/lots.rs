//! Lot number extraction.

use super::patterns::LOT_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Lot code extractor for the accepted code shapes.
pub struct LotExtractor;

impl LotExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LotExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LotExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        LOT_NUMBER
            .find_iter(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.start(), m.end()))
            .collect()
    }
}

/// Lot codes in order of appearance.
pub fn extract_lots(text: &str) -> Vec<String> {
    LotExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_each_shape() {
        assert_eq!(extract_lots("Lot 011J20A"), vec!["011J20A"]);
        assert_eq!(extract_lots("Lot EJ1234"), vec!["EJ1234"]);
        assert_eq!(extract_lots("Lot A12345"), vec!["A12345"]);
    }

    #[test]
    fn test_extract_in_order() {
        let text = "Dose 1 EN6201 03/01/2021\nDose 2 030A21A 03/29/2021";
        assert_eq!(extract_lots(text), vec!["EN6201", "030A21A"]);
    }

    #[test]
    fn test_rejects_other_codes() {
        assert!(extract_lots("ID 123456 code ab1234 ref B12345").is_empty());
        assert!(extract_lots("lot ej1234").is_empty());
    }

    #[test]
    fn test_extractor_positions() {
        let found = LotExtractor::new().extract("Lot: EW0182").unwrap();
        assert_eq!(found.value, "EW0182");
        assert_eq!(found.position, (5, 11));
    }
}
