//! Single-page SEO analysis.
//!
//! [`Analyzer::analyze`] fetches one URL through a TTL cache, extracts its
//! main content and structure, then runs keyword, readability, performance
//! and AI-search suggestion stages into one [`Report`].

pub mod cache;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod performance;
pub mod pipeline;
pub mod readability;
pub mod report;
pub mod suggestions;
pub mod types;

pub use cache::{CacheStats, PageCache};
pub use error::{AnalysisError, FetchError};
pub use fetch::{extract_page, FetcherConfig, PageFetcher};
pub use keywords::{extract_keywords, KeywordRecord};
pub use performance::{PerformanceProber, PerformanceResult};
pub use pipeline::{Analyzer, AnalyzerBuilder, Stage, StageContext};
pub use readability::{compute_readability, ReadabilityLevel, ReadabilityResult, ReadabilityScorer};
pub use report::Report;
pub use suggestions::{suggest, SuggestionCategory, SuggestionSet};
pub use types::FetchResult;
