//! String similarity scorers on a 0 - 100 scale.
//!
//! All scorers expect input already passed through [`normalize`]. A score of
//! 100 means the strings are identical under that scorer's view.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// Available similarity scorers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Order- and duplicate-insensitive comparison of token sets.
    TokenSet,
    /// Whole-string similarity.
    Ratio,
    /// Best alignment of the shorter string inside the longer one.
    Partial,
}

impl Scorer {
    /// Evaluation order. Earlier scorers win ties.
    pub const ALL: [Scorer; 3] = [Scorer::TokenSet, Scorer::Ratio, Scorer::Partial];

    pub fn score(&self, a: &str, b: &str) -> u8 {
        match self {
            Scorer::TokenSet => token_set_ratio(a, b),
            Scorer::Ratio => ratio(a, b),
            Scorer::Partial => partial_ratio(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scorer::TokenSet => "token_set",
            Scorer::Ratio => "ratio",
            Scorer::Partial => "partial",
        }
    }
}

impl std::fmt::Display for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercase, replace everything but letters and digits with spaces, and
/// collapse whitespace runs.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-string similarity. Empty input scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_percent(normalized_levenshtein(a, b))
}

/// Similarity of the shorter string against its best-matching window of the
/// longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let width = shorter.chars().count();
    if width == 0 {
        return 0;
    }

    // Byte offsets of every char boundary, so windows can be sliced as &str.
    let bounds: Vec<usize> = longer
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(longer.len()))
        .collect();

    let mut best = 0;
    for start in 0..bounds.len().saturating_sub(width) {
        let window = &longer[bounds[start]..bounds[start + width]];
        let score = ratio(shorter, window);
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    best
}

/// Token-set similarity: compares the shared tokens against each side's full
/// token set, so a string whose tokens all appear in the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = concat(&shared, &only_a);
    let combined_b = concat(&shared, &only_b);

    ratio(&shared, &combined_a)
        .max(ratio(&shared, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join<'a, 'b>(tokens: impl Iterator<Item = &'a &'b str>) -> String
where
    'b: 'a,
{
    tokens.copied().collect::<Vec<&str>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
