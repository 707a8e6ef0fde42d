//! Consensus fuzzy matching of free text against a vocabulary.
//!
//! OCR noise hurts each similarity metric differently: substitutions hurt
//! the whole-string ratio, reordering hurts naive comparisons, truncation
//! hurts token sets. Every scorer is run and the single highest score wins.

mod scorers;
mod vocabulary;

pub use scorers::{normalize, partial_ratio, ratio, token_set_ratio, Scorer};
pub use vocabulary::ManufacturerVocabulary;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use crate::models::config::DEFAULT_MATCH_THRESHOLD;

/// Result of classifying a text against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyMatch {
    /// Matched vocabulary entry, `None` when the best score is below threshold.
    pub term: Option<String>,
    /// Best score across all scorers (0 - 100).
    pub score: u8,
    /// Scorer that produced `score`. `None` when nothing could be scored.
    pub scorer: Option<Scorer>,
}

impl VocabularyMatch {
    /// A match that found nothing to compare.
    pub fn none() -> Self {
        Self {
            term: None,
            score: 0,
            scorer: None,
        }
    }

    /// Whether a vocabulary entry reached the threshold.
    pub fn is_match(&self) -> bool {
        self.term.is_some()
    }

    /// Matched term, or an empty string.
    pub fn term_or_empty(&self) -> &str {
        self.term.as_deref().unwrap_or("")
    }
}

/// Classify `text` against `vocabulary`.
///
/// Scorers run in [`Scorer::ALL`] order and each picks its own best entry
/// (earliest entry on ties). The overall winner is the highest of those;
/// an earlier scorer keeps the win on equal scores. Empty text or an empty
/// vocabulary yields [`VocabularyMatch::none`].
pub fn classify<S: AsRef<str>>(text: &str, vocabulary: &[S], threshold: u8) -> VocabularyMatch {
    let query = normalize(text);
    if query.is_empty() || vocabulary.is_empty() {
        return VocabularyMatch::none();
    }

    let entries: Vec<String> = vocabulary.iter().map(|e| normalize(e.as_ref())).collect();

    let mut best: Option<(usize, u8, Scorer)> = None;
    for scorer in Scorer::ALL {
        let Some((index, score)) = best_entry(scorer, &query, &entries) else {
            continue;
        };
        trace!("{} best: {:?} ({})", scorer, vocabulary[index].as_ref(), score);

        if best.is_none_or(|(_, top, _)| score > top) {
            best = Some((index, score, scorer));
        }
    }

    match best {
        Some((index, score, scorer)) => VocabularyMatch {
            term: (score >= threshold).then(|| vocabulary[index].as_ref().to_string()),
            score,
            scorer: Some(scorer),
        },
        None => VocabularyMatch::none(),
    }
}

/// Best (index, score) for one scorer; the first entry wins ties.
fn best_entry(scorer: Scorer, query: &str, entries: &[String]) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;
    for (index, entry) in entries.iter().enumerate() {
        if entry.is_empty() {
            continue;
        }
        let score = scorer.score(query, entry);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}
