use std::collections::BTreeMap;

use serde::Serialize;

use crate::keywords::KeywordRecord;
use crate::performance::PerformanceResult;
use crate::readability::ReadabilityResult;
use crate::suggestions::SuggestionSet;

/// Prefix of the top-level error when the page could not be fetched.
pub const FETCH_FAILED_PREFIX: &str = "Failed to fetch content from the URL";
/// Prefix of the top-level error when a stage aborted the pipeline.
pub const STAGE_FAILED_PREFIX: &str = "Unexpected error";

/// The analysis result for one URL.
///
/// Sections are `None` until their stage succeeds and are omitted from JSON
/// when absent. A report with `error` set is still well formed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_analysis: Option<Vec<KeywordRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<ReadabilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_search_optimization: Option<SuggestionSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-stage failures recorded when stages run in isolation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stage_errors: BTreeMap<String, String>,
}

impl Report {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A report carrying only the URL and a fetch failure.
    #[must_use]
    pub fn fetch_failed(url: impl Into<String>, reason: &impl std::fmt::Display) -> Self {
        Self {
            url: url.into(),
            error: Some(format!("{FETCH_FAILED_PREFIX}: {reason}")),
            ..Self::default()
        }
    }

    pub(crate) fn abort(&mut self, reason: &impl std::fmt::Display) {
        self.error = Some(format!("{STAGE_FAILED_PREFIX}: {reason}"));
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of analysis sections present.
    #[must_use]
    pub fn section_count(&self) -> usize {
        [
            self.keyword_analysis.is_some(),
            self.readability.is_some(),
            self.performance.is_some(),
            self.ai_search_optimization.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}
