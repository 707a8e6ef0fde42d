//! Manufacturer vocabulary loaded from a CSV table.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{CardcheckError, Result};

/// Column holding the accepted key terms.
pub const KEY_TERM_COLUMN: &str = "vaccine_key_terms";

/// Column holding the canonical display name for each key term.
pub const CANONICAL_COLUMN: &str = "manufacturer";

/// Accepted manufacturer key terms and their canonical names.
#[derive(Debug, Clone, Default)]
pub struct ManufacturerVocabulary {
    terms: Vec<String>,
    canonical: HashMap<String, String>,
}

impl ManufacturerVocabulary {
    /// Build a vocabulary from `(key term, canonical name)` pairs.
    ///
    /// An empty canonical name maps the key term to itself.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vocabulary = Self::default();
        for (term, name) in pairs {
            vocabulary.insert(term.into(), name.into());
        }
        vocabulary
    }

    /// Load a vocabulary from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            CardcheckError::Vocabulary(format!("could not open {}: {}", path.display(), e))
        })?;
        let vocabulary = Self::from_reader(file)?;
        debug!("Loaded {} vocabulary terms from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// Load a vocabulary from CSV data with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let term_idx = column(KEY_TERM_COLUMN).ok_or_else(|| {
            CardcheckError::Vocabulary(format!("missing '{}' column", KEY_TERM_COLUMN))
        })?;
        let name_idx = column(CANONICAL_COLUMN);

        let mut vocabulary = Self::default();
        for row in rdr.records() {
            let row = row?;
            let term = row.get(term_idx).unwrap_or_default();
            if term.is_empty() {
                continue;
            }
            let name = name_idx.and_then(|i| row.get(i)).unwrap_or_default();
            vocabulary.insert(term.to_string(), name.to_string());
        }

        Ok(vocabulary)
    }

    fn insert(&mut self, term: String, name: String) {
        if self.canonical.contains_key(&term) {
            return;
        }
        let name = if name.trim().is_empty() { term.clone() } else { name };
        self.canonical.insert(term.clone(), name);
        self.terms.push(term);
    }

    /// Key terms in file order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Canonical display name for a key term. Unknown terms map to themselves.
    pub fn canonical_name<'a>(&'a self, term: &'a str) -> &'a str {
        self.canonical.get(term).map(String::as_str).unwrap_or(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
