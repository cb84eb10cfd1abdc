use thiserror::Error;

/// Failure to acquire a page. Terminal for the whole analysis.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Failure inside an analysis stage after the page was fetched.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{stage} stage failed: {reason}")]
    Stage { stage: String, reason: String },
}
