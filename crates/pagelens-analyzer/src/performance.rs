//! Live page-load timing.
//!
//! The probe always performs its own request: it measures the network, so
//! cached pages are never reused here.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Sentinel status code reported when no response was received.
pub const PROBE_FAILED_STATUS: i32 = -1;

/// Outcome of one timed fetch. The two shapes never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerformanceResult {
    Measured {
        status_code: i32,
        response_time_seconds: f64,
        page_size_kb: f64,
    },
    Failed {
        status_code: i32,
        error: String,
    },
}

impl PerformanceResult {
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            status_code: PROBE_FAILED_STATUS,
            error: error.into(),
        }
    }

    /// Builds a measurement, rounding time to milliseconds and size to
    /// hundredths of a kilobyte.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn measured(status: u16, elapsed: Duration, body_bytes: usize) -> Self {
        Self::Measured {
            status_code: i32::from(status),
            response_time_seconds: round_to(elapsed.as_secs_f64(), 3),
            page_size_kb: round_to(body_bytes as f64 / 1024.0, 2),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            Self::Measured { status_code, .. } | Self::Failed { status_code, .. } => *status_code,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub struct PerformanceProber {
    client: Client,
}

impl PerformanceProber {
    /// Creates a prober whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Times one GET of `url`, including the full body read.
    ///
    /// Never fails: transport errors become [`PerformanceResult::Failed`].
    /// Any HTTP status, including 4xx/5xx, counts as a measured response.
    pub async fn measure(&self, url: &str) -> PerformanceResult {
        let started = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return probe_failure(url, &e),
        };
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return probe_failure(url, &e),
        };
        let elapsed = started.elapsed();

        tracing::debug!(
            url,
            status,
            elapsed_secs = elapsed.as_secs_f64(),
            bytes = body.len(),
            "performance probe complete"
        );
        PerformanceResult::measured(status, elapsed, body.len())
    }
}

fn probe_failure(url: &str, err: &reqwest::Error) -> PerformanceResult {
    tracing::warn!(url, error = %err, "performance probe failed");
    PerformanceResult::failed(err.to_string())
}
