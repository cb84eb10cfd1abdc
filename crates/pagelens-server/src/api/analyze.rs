use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use pagelens_analyzer::Report;
use reqwest::Url;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    url: Option<String>,
}

/// `POST /api/analyze` with a JSON body `{"url": "..."}`.
pub(super) async fn analyze_json(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::bad_request(req_id.0.clone(), e.body_text()))?;
    run_analysis(&state, req_id, request.url.as_deref()).await
}

/// `GET /api/analyze?url=...`
pub(super) async fn analyze_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(request): Query<AnalyzeRequest>,
) -> Result<Json<Report>, ApiError> {
    run_analysis(&state, req_id, request.url.as_deref()).await
}

async fn run_analysis(
    state: &AppState,
    req_id: RequestId,
    raw_url: Option<&str>,
) -> Result<Json<Report>, ApiError> {
    let url = validate_url(raw_url).map_err(|message| {
        tracing::debug!(request_id = %req_id.0, %message, "rejected analysis request");
        ApiError::bad_request(req_id.0.clone(), message)
    })?;

    tracing::info!(request_id = %req_id.0, url, "analysis requested");
    let report = state.analyzer.analyze(url).await;
    Ok(Json(report))
}

/// Accepts absolute `http`/`https` URLs with a host. Returns the trimmed
/// input unchanged so the cache sees the URL exactly as submitted.
fn validate_url(raw: Option<&str>) -> Result<&str, String> {
    let url = raw.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err("No URL provided".to_string());
    }

    let parsed = Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported URL scheme: {other}")),
    }
    if !parsed.has_host() {
        return Err("URL has no host".to_string());
    }

    Ok(url)
}
