//! Frequency-based keyword extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_N: usize = 15;

/// Common English function words excluded from keyword counts.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "if", "in", "into",
    "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with", "we", "you", "your",
];

/// A letter followed by at least one letter, apostrophe or hyphen.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]+").expect("valid word regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub count: usize,
}

/// Returns the `top_n` most frequent non-stop-word tokens of `text`.
///
/// Tokens are lower-cased; stop words and tokens of two characters or fewer
/// are dropped. Records are ordered by descending count, ties keeping the
/// order in which each keyword first appeared.
#[must_use]
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<KeywordRecord> {
    let mut order: Vec<KeywordRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in WORD_RE.find_iter(text) {
        let word = token.as_str().to_lowercase();
        if word.chars().count() <= 2 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if let Some(&i) = index.get(&word) {
            order[i].count += 1;
        } else {
            index.insert(word.clone(), order.len());
            order.push(KeywordRecord {
                keyword: word,
                count: 1,
            });
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(top_n);
    order
}
