//! Page acquisition with caching.
//!
//! ```text
//! url → PageCache (hit) ─────────────────────────────→ Arc<FetchResult>
//!        └ miss → GET (fixed UA, bounded timeout) → extract_page → put
//! ```

pub mod extract;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::cache::PageCache;
use crate::error::FetchError;
use crate::types::FetchResult;

pub use extract::{extract_main_content, extract_page};

/// HTTP settings for [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: pagelens_core::app_config::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches pages over HTTP and extracts them, consulting a shared cache first.
pub struct PageFetcher {
    client: Client,
    cache: Arc<PageCache>,
}

impl PageFetcher {
    /// Creates a fetcher with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &FetcherConfig, cache: Arc<PageCache>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, cache })
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Returns the extracted page for `url`.
    ///
    /// A fresh cache entry is returned without any network I/O. Otherwise one
    /// GET is issued, the body is extracted, and the result is written through
    /// to the cache, replacing any stale entry. Failures are not retried.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`]: the request exceeded the configured timeout.
    /// - [`FetchError::UnexpectedStatus`]: the server answered with a non-2xx status.
    /// - [`FetchError::Http`]: DNS, TLS, connection or body-read failure.
    pub async fn fetch(&self, url: &str) -> Result<Arc<FetchResult>, FetchError> {
        if let Some(cached) = self.cache.get(url) {
            tracing::debug!(url, "page cache hit");
            return Ok(cached);
        }

        tracing::debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| classify(url, e))?;
        let page = Arc::new(extract_page(&html));
        self.cache.put(url, Arc::clone(&page), Instant::now());

        tracing::info!(url, bytes = html.len(), "fetched page");
        Ok(page)
    }
}

fn classify(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(err)
    }
}
