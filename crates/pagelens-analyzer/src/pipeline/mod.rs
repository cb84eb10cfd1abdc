//! Report orchestration.
//!
//! ```text
//! START → FETCHING ─┬→ FAILED   (report = {url, error})
//!                   └→ FETCHED → ANALYZING ─┬→ FAILED   (abort: error + earlier sections)
//!                                           └→ COMPLETE
//! ```
//!
//! Stages run one after another in the order they were registered. What
//! happens when a stage fails is decided by [`FailurePolicy`]:
//! `AbortRemaining` stops at the first failure and sets the top-level
//! `error`, `IsolateStages` keeps going and records the failure under
//! `stage_errors`.

mod stage;

use std::sync::Arc;

use pagelens_core::{AppConfig, FailurePolicy};

use crate::cache::PageCache;
use crate::error::FetchError;
use crate::fetch::{FetcherConfig, PageFetcher};
use crate::performance::PerformanceProber;
use crate::readability::ReadabilityScorer;
use crate::report::Report;
use crate::types::FetchResult;

pub use stage::{
    KeywordStage, PerformanceStage, ReadabilityStage, Stage, StageContext, SuggestionStage,
};

/// Runs the fetch and every registered stage for one URL at a time.
///
/// Cheap to share behind an `Arc`; concurrent calls only contend on the
/// page cache.
pub struct Analyzer {
    fetcher: PageFetcher,
    stages: Vec<Box<dyn Stage>>,
    policy: FailurePolicy,
}

impl Analyzer {
    #[must_use]
    pub fn builder(fetcher: PageFetcher) -> AnalyzerBuilder {
        AnalyzerBuilder::new(fetcher)
    }

    /// Wires a cache, fetcher, prober and the default stage list
    /// (keywords, readability, performance, suggestions) from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let cache = Arc::new(PageCache::new(config.cache_ttl(), config.cache_max_entries));
        let fetcher = PageFetcher::new(
            &FetcherConfig {
                timeout: config.fetch_timeout(),
                user_agent: config.user_agent.clone(),
            },
            cache,
        )?;
        let prober = PerformanceProber::new(config.probe_timeout(), &config.user_agent)?;

        Ok(Self::builder(fetcher)
            .failure_policy(config.failure_policy)
            .stage(KeywordStage::new(config.keyword_top_n))
            .stage(ReadabilityStage::new(ReadabilityScorer::new(
                config.readability_method,
            )))
            .stage(PerformanceStage::new(prober))
            .stage(SuggestionStage)
            .build())
    }

    #[must_use]
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Fetches `url` and runs every stage against the result.
    ///
    /// Never fails: a fetch failure yields a report holding only the URL and
    /// the error, and stage failures are handled per the failure policy.
    pub async fn analyze(&self, url: &str) -> Report {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed, skipping analysis");
                return Report::fetch_failed(url, &e);
            }
        };
        self.analyze_page(url, page).await
    }

    /// Runs the stages against an already extracted page.
    pub async fn analyze_page(&self, url: &str, page: Arc<FetchResult>) -> Report {
        let ctx = StageContext {
            url: url.to_string(),
            page,
        };
        let mut report = Report::new(url);

        for stage in &self.stages {
            let Err(e) = stage.run(&ctx, &mut report).await else {
                continue;
            };
            tracing::error!(url, stage = stage.name(), error = %e, "analysis stage failed");
            match self.policy {
                FailurePolicy::AbortRemaining => {
                    report.abort(&e);
                    break;
                }
                FailurePolicy::IsolateStages => {
                    report
                        .stage_errors
                        .insert(stage.name().to_string(), e.to_string());
                }
            }
        }

        tracing::info!(
            url,
            sections = report.section_count(),
            aborted = report.is_error(),
            failed_stages = report.stage_errors.len(),
            "analysis complete"
        );
        report
    }
}

/// Assembles an [`Analyzer`] with a custom stage list.
pub struct AnalyzerBuilder {
    fetcher: PageFetcher,
    stages: Vec<Box<dyn Stage>>,
    policy: FailurePolicy,
}

impl AnalyzerBuilder {
    #[must_use]
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            stages: Vec::new(),
            policy: FailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Appends a stage; stages run in the order added.
    #[must_use]
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn build(self) -> Analyzer {
        Analyzer {
            fetcher: self.fetcher,
            stages: self.stages,
            policy: self.policy,
        }
    }
}
