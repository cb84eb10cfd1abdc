use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which Flesch Reading Ease computation the readability scorer uses.
///
/// Selected once from configuration so tests can pin either path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadabilityMethod {
    /// Refined word/sentence/syllable counting, falling back to [`Self::Basic`]
    /// when the text cannot be segmented.
    #[default]
    Standard,
    /// The closed-form manual formula over letter runs and `.!?` splits.
    Basic,
}

impl std::fmt::Display for ReadabilityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadabilityMethod::Standard => write!(f, "standard"),
            ReadabilityMethod::Basic => write!(f, "basic"),
        }
    }
}

/// How the report orchestrator reacts to a stage failing after a successful fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing stage stops the pipeline. Sections assigned before the
    /// failure are kept and the report carries a top-level `error`.
    #[default]
    AbortRemaining,
    /// Every stage runs; failures are recorded per stage and the rest of the
    /// report is still produced.
    IsolateStages,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::AbortRemaining => write!(f, "abort"),
            FailurePolicy::IsolateStages => write!(f, "isolate"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub keyword_top_n: usize,
    pub readability_method: ReadabilityMethod,
    pub failure_policy: FailurePolicy,
    pub rate_limit_per_minute: usize,
}

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SEOAnalyzer/1.0; +https://example.com)";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: 30,
            probe_timeout_secs: 30,
            cache_ttl_secs: 3600,
            cache_max_entries: 100,
            keyword_top_n: 15,
            readability_method: ReadabilityMethod::Standard,
            failure_policy: FailurePolicy::AbortRemaining,
            rate_limit_per_minute: 60,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("keyword_top_n", &self.keyword_top_n)
            .field("readability_method", &self.readability_method)
            .field("failure_policy", &self.failure_policy)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
