//! Command handlers for the CLI.
//!
//! Reports go to stdout as JSON; logs go to stderr so the output can be
//! piped straight into other tools.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use pagelens_analyzer::pipeline::{KeywordStage, ReadabilityStage, SuggestionStage};
use pagelens_analyzer::{
    extract_page, Analyzer, FetcherConfig, PageCache, PageFetcher, ReadabilityScorer,
};
use pagelens_core::AppConfig;
use serde::Serialize;

/// Analyze every URL with one shared analyzer (and so one shared cache).
///
/// Reports are printed in the order the URLs were given, regardless of
/// which analysis finishes first.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    urls: Vec<String>,
    concurrency: usize,
    compact: bool,
) -> anyhow::Result<()> {
    let analyzer = Arc::new(Analyzer::from_config(config)?);
    let total = urls.len();

    let mut reports = stream::iter(urls.into_iter().enumerate().map(|(index, url)| {
        let analyzer = Arc::clone(&analyzer);
        async move { (index, analyzer.analyze(&url).await) }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;
    reports.sort_by_key(|(index, _)| *index);

    let failed = reports.iter().filter(|(_, r)| r.is_error()).count();
    for (_, report) in &reports {
        print_json(report, compact)?;
    }

    if failed > 0 {
        tracing::warn!(total, failed, "some analyses did not complete");
    }
    Ok(())
}

/// Fetch one page and print its extracted fields.
pub(crate) async fn run_page(
    config: &AppConfig,
    url: &str,
    raw: bool,
    compact: bool,
) -> anyhow::Result<()> {
    let fetcher = build_fetcher(config)?;
    let page = fetcher
        .fetch(url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch {url}: {e}"))?;

    let mut page = (*page).clone();
    if !raw {
        page.raw_html.clear();
    }
    print_json(&page, compact)
}

/// Analyze a saved HTML file. The performance probe is skipped since there
/// is no live page to time.
pub(crate) async fn run_file(
    config: &AppConfig,
    path: &Path,
    url: Option<&str>,
    compact: bool,
) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;

    let label = url.map_or_else(|| format!("file://{}", path.display()), str::to_string);
    let report = offline_analyzer(config)?
        .analyze_page(&label, Arc::new(extract_page(&html)))
        .await;
    print_json(&report, compact)
}

pub(crate) fn offline_analyzer(config: &AppConfig) -> anyhow::Result<Analyzer> {
    Ok(Analyzer::builder(build_fetcher(config)?)
        .failure_policy(config.failure_policy)
        .stage(KeywordStage::new(config.keyword_top_n))
        .stage(ReadabilityStage::new(ReadabilityScorer::new(
            config.readability_method,
        )))
        .stage(SuggestionStage)
        .build())
}

fn build_fetcher(config: &AppConfig) -> anyhow::Result<PageFetcher> {
    let cache = Arc::new(PageCache::new(config.cache_ttl(), config.cache_max_entries));
    let fetcher = PageFetcher::new(
        &FetcherConfig {
            timeout: config.fetch_timeout(),
            user_agent: config.user_agent.clone(),
        },
        cache,
    )?;
    Ok(fetcher)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
