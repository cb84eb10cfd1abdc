//! Flesch Reading Ease scoring.
//!
//! Two counting strategies share one formula:
//!
//! - [`ReadabilityMethod::Standard`] tokenizes on whitespace, segments
//!   sentences on terminal punctuation and applies a few English syllable
//!   corrections. Text without any word cannot be scored this way and falls
//!   back to the basic path.
//! - [`ReadabilityMethod::Basic`] counts letter runs, `.!?`-separated segments
//!   and vowel groups with a silent trailing `e`.
//!
//! `score = 206.835 − 1.015 × (words / sentences) − 84.6 × (syllables / words)`

use std::sync::LazyLock;

use pagelens_core::ReadabilityMethod;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid letter-run regex"));

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadabilityError {
    #[error("text contains no words")]
    NoWords,
}

/// Seven ordered reading-ease bands, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadabilityLevel {
    #[serde(rename = "Very easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very confusing")]
    VeryConfusing,
}

impl ReadabilityLevel {
    /// Band for `score`. Lower bounds are inclusive.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::VeryEasy
        } else if score >= 80.0 {
            Self::Easy
        } else if score >= 70.0 {
            Self::FairlyEasy
        } else if score >= 60.0 {
            Self::Standard
        } else if score >= 50.0 {
            Self::FairlyDifficult
        } else if score >= 30.0 {
            Self::Difficult
        } else {
            Self::VeryConfusing
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryEasy => "Very easy",
            Self::Easy => "Easy",
            Self::FairlyEasy => "Fairly easy",
            Self::Standard => "Standard",
            Self::FairlyDifficult => "Fairly difficult",
            Self::Difficult => "Difficult",
            Self::VeryConfusing => "Very confusing",
        }
    }
}

impl std::fmt::Display for ReadabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityResult {
    /// Reading-ease score rounded to two decimals.
    pub score: f64,
    pub level: ReadabilityLevel,
}

impl ReadabilityResult {
    /// Builds a result from an unrounded score. The level is taken from the
    /// raw value, the reported score is rounded.
    #[must_use]
    pub fn from_raw_score(raw: f64) -> Self {
        Self {
            score: (raw * 100.0).round() / 100.0,
            level: ReadabilityLevel::from_score(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityScorer {
    method: ReadabilityMethod,
}

impl ReadabilityScorer {
    #[must_use]
    pub fn new(method: ReadabilityMethod) -> Self {
        Self { method }
    }

    #[must_use]
    pub fn method(&self) -> ReadabilityMethod {
        self.method
    }

    /// Scores `text` with the configured method.
    #[must_use]
    pub fn score(&self, text: &str) -> ReadabilityResult {
        let raw = match self.method {
            ReadabilityMethod::Basic => basic_reading_ease(text),
            ReadabilityMethod::Standard => standard_reading_ease(text).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "standard readability failed, using basic formula");
                basic_reading_ease(text)
            }),
        };
        ReadabilityResult::from_raw_score(raw)
    }
}

/// Scores `text` with [`ReadabilityMethod::Standard`].
#[must_use]
pub fn compute_readability(text: &str) -> ReadabilityResult {
    ReadabilityScorer::new(ReadabilityMethod::Standard).score(text)
}

#[allow(clippy::cast_precision_loss)]
fn flesch(words: usize, sentences: usize, syllables: usize) -> f64 {
    let words = words.max(1) as f64;
    let sentences = sentences.max(1) as f64;
    206.835 - 1.015 * (words / sentences) - 84.6 * (syllables as f64 / words)
}

/// Manual formula over letter runs and `.!?` segments. Always succeeds.
pub(crate) fn basic_reading_ease(text: &str) -> f64 {
    let words: Vec<&str> = LETTER_RUN.find_iter(text).map(|m| m.as_str()).collect();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let syllables: usize = words.iter().map(|w| basic_syllables(w)).sum();
    flesch(words.len(), sentences, syllables)
}

pub(crate) fn standard_reading_ease(text: &str) -> Result<f64, ReadabilityError> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().any(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        return Err(ReadabilityError::NoWords);
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphabetic))
        .count();
    let syllables: usize = words.iter().map(|w| standard_syllables(w)).sum();
    Ok(flesch(words.len(), sentences, syllables))
}

fn letters_lowercase(word: &str) -> Vec<char> {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn vowel_groups(letters: &[char]) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;
    for c in letters {
        let is_vowel = VOWELS.contains(c);
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }
    count
}

/// Vowel groups minus a silent trailing `e`, at least one.
pub(crate) fn basic_syllables(word: &str) -> usize {
    let letters = letters_lowercase(word);
    let mut count = vowel_groups(&letters);
    if letters.last() == Some(&'e') && count > 1 {
        count -= 1;
    }
    count.max(1)
}

/// Vowel groups with corrections for silent `-e`, `-ed` and `-es` while
/// keeping the syllabic consonant `-le` ("table", "simple").
pub(crate) fn standard_syllables(word: &str) -> usize {
    let letters = letters_lowercase(word);
    if letters.len() <= 3 {
        return 1;
    }
    let mut count = vowel_groups(&letters);
    let n = letters.len();
    let before = |offset: usize| letters[n - offset];

    let silent = match (letters[n - 2], letters[n - 1]) {
        ('l', 'e') => VOWELS.contains(&before(3)),
        (_, 'e') => true,
        ('e', 'd') => !matches!(before(3), 't' | 'd'),
        ('e', 's') => !matches!(before(3), 's' | 'x' | 'z' | 'c' | 'g') && !ends_with_sibilant(&letters),
        _ => false,
    };
    if silent && count > 1 {
        count -= 1;
    }
    count.max(1)
}

fn ends_with_sibilant(letters: &[char]) -> bool {
    let n = letters.len();
    n >= 4 && matches!((letters[n - 4], letters[n - 3]), ('c' | 's', 'h'))
}
