use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::keywords::extract_keywords;
use crate::performance::PerformanceProber;
use crate::readability::ReadabilityScorer;
use crate::report::Report;
use crate::suggestions::suggest;
use crate::types::FetchResult;

/// Input shared by every stage of one analysis.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub url: String,
    pub page: Arc<FetchResult>,
}

/// One step of the analysis pipeline.
///
/// A stage writes its own section of the [`Report`] and nothing else. Stages
/// run strictly in sequence against the same fetched page.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Name used in logs and as the key of `Report::stage_errors`.
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &StageContext, report: &mut Report) -> Result<(), AnalysisError>;
}

/// Top keywords of the main content.
pub struct KeywordStage {
    top_n: usize,
}

impl KeywordStage {
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

#[async_trait]
impl Stage for KeywordStage {
    fn name(&self) -> &'static str {
        "keywords"
    }

    async fn run(&self, ctx: &StageContext, report: &mut Report) -> Result<(), AnalysisError> {
        report.keyword_analysis = Some(extract_keywords(&ctx.page.content, self.top_n));
        Ok(())
    }
}

pub struct ReadabilityStage {
    scorer: ReadabilityScorer,
}

impl ReadabilityStage {
    #[must_use]
    pub fn new(scorer: ReadabilityScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Stage for ReadabilityStage {
    fn name(&self) -> &'static str {
        "readability"
    }

    async fn run(&self, ctx: &StageContext, report: &mut Report) -> Result<(), AnalysisError> {
        report.readability = Some(self.scorer.score(&ctx.page.content));
        Ok(())
    }
}

/// Live timing of the URL. Probe failures are data, not stage errors.
pub struct PerformanceStage {
    prober: PerformanceProber,
}

impl PerformanceStage {
    #[must_use]
    pub fn new(prober: PerformanceProber) -> Self {
        Self { prober }
    }
}

#[async_trait]
impl Stage for PerformanceStage {
    fn name(&self) -> &'static str {
        "performance"
    }

    async fn run(&self, ctx: &StageContext, report: &mut Report) -> Result<(), AnalysisError> {
        report.performance = Some(self.prober.measure(&ctx.url).await);
        Ok(())
    }
}

/// Structural suggestions over the main content and the raw HTML.
pub struct SuggestionStage;

#[async_trait]
impl Stage for SuggestionStage {
    fn name(&self) -> &'static str {
        "suggestions"
    }

    async fn run(&self, ctx: &StageContext, report: &mut Report) -> Result<(), AnalysisError> {
        report.ai_search_optimization = Some(suggest(&ctx.page.content, &ctx.page.raw_html));
        Ok(())
    }
}
