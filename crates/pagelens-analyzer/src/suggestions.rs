//! Structural heuristics for AI-search visibility.
//!
//! Answer engines favour pages that are easy to segment and attribute: a
//! clear heading hierarchy, lists, structured data, author signals, a short
//! opening summary and plain sentences. Each rule below is evaluated on its
//! own and contributes to exactly one category.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Words in the first paragraph above which a TL;DR is suggested.
const SUMMARY_WORD_LIMIT: usize = 50;
/// Average words per sentence above which shorter sentences are suggested.
const SENTENCE_WORD_LIMIT: f64 = 25.0;

const SINGLE_H1: &str = "Use exactly one <h1> heading per page to clearly define the topic.";
const MORE_H2: &str =
    "Include multiple <h2> subheadings to structure your content into sections.";
const ADD_LISTS: &str =
    "Add bullet or numbered lists to break down complex information into digestible points.";
const ADD_SCHEMA: &str = "Implement schema.org structured data (e.g. Article or FAQ) to help search engines understand your page.";
const ADD_AUTHOR: &str = "Add author information and, if appropriate, credentials or citations to establish trust and expertise.";
const ADD_TLDR: &str = "Consider adding a concise summary or TL;DR at the beginning of the article to answer common questions quickly.";
const ADD_INTRO: &str = "Add a short introductory paragraph that summarises the page's topic.";
const SHORTER_SENTENCES: &str =
    "Use shorter sentences and a conversational tone to improve readability and user engagement.";

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid static selector")
}

static H1: LazyLock<Selector> = LazyLock::new(|| css("h1"));
static H2: LazyLock<Selector> = LazyLock::new(|| css("h2"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| css("ul, ol"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| css("script[type='application/ld+json']"));
static MICRODATA: LazyLock<Selector> = LazyLock::new(|| css("[itemscope], [itemtype]"));
static AUTHOR_META: LazyLock<Selector> = LazyLock::new(|| css("meta[name='author']"));
static AUTHOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| css("a[rel~='author'], link[rel~='author']"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| css("p"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Headings,
    Lists,
    Schema,
    Trust,
    Summary,
    Tone,
}

/// Suggestions keyed by category. A key exists only when a rule fired.
pub type SuggestionSet = BTreeMap<SuggestionCategory, Vec<String>>;

/// Evaluates every heuristic against the page text and HTML.
#[must_use]
pub fn suggest(content: &str, html: &str) -> SuggestionSet {
    let document = Html::parse_document(html);
    let count = |selector: &Selector| document.select(selector).count();

    let mut suggestions = SuggestionSet::new();
    let mut add = |category: SuggestionCategory, message: &str| {
        suggestions
            .entry(category)
            .or_default()
            .push(message.to_string());
    };

    if count(&H1) != 1 {
        add(SuggestionCategory::Headings, SINGLE_H1);
    }
    if count(&H2) < 2 {
        add(SuggestionCategory::Headings, MORE_H2);
    }

    if count(&LISTS) == 0 {
        add(SuggestionCategory::Lists, ADD_LISTS);
    }

    if count(&JSON_LD) == 0 && count(&MICRODATA) == 0 {
        add(SuggestionCategory::Schema, ADD_SCHEMA);
    }

    if count(&AUTHOR_META) == 0 && count(&AUTHOR_LINK) == 0 {
        add(SuggestionCategory::Trust, ADD_AUTHOR);
    }

    match document.select(&PARAGRAPH).next() {
        // Inline tags split text nodes mid-word, so join before counting.
        Some(first) => {
            let words = first.text().collect::<String>().split_whitespace().count();
            if words > SUMMARY_WORD_LIMIT {
                add(SuggestionCategory::Summary, ADD_TLDR);
            }
        }
        None => add(SuggestionCategory::Summary, ADD_INTRO),
    }

    if average_sentence_words(content).is_some_and(|avg| avg > SENTENCE_WORD_LIMIT) {
        add(SuggestionCategory::Tone, SHORTER_SENTENCES);
    }

    suggestions
}

/// Mean word count of the non-empty `.`-separated segments of `text`.
#[allow(clippy::cast_precision_loss)]
fn average_sentence_words(text: &str) -> Option<f64> {
    let lengths: Vec<usize> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().count())
        .collect();
    if lengths.is_empty() {
        return None;
    }
    Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
}

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;
