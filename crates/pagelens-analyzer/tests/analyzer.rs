//! End-to-end tests for `Analyzer::analyze`.
//!
//! Pages are served by `wiremock`; failing stages are injected through
//! `AnalyzerBuilder` to exercise both failure policies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagelens_analyzer::pipeline::{KeywordStage, ReadabilityStage, SuggestionStage};
use pagelens_analyzer::{
    AnalysisError, Analyzer, FetcherConfig, PageCache, PageFetcher, ReadabilityScorer, Report,
    Stage, StageContext,
};
use pagelens_core::{AppConfig, FailurePolicy, ReadabilityMethod};

const ARTICLE: &str = r#"<html><head>
    <title>Brewing coffee at home</title>
    <meta name="author" content="Sam Barista">
    <script type="application/ld+json">{"@type": "HowTo"}</script>
</head><body>
    <header>Coffee Blog</header>
    <article>
        <h1>Brewing coffee at home</h1>
        <p>Fresh coffee beans make better coffee. Grind the beans just before brewing.</p>
        <h2>Equipment</h2>
        <ul><li>Grinder</li><li>Kettle</li><li>Scale</li></ul>
        <h2>Method</h2>
        <p>Pour hot water slowly over the coffee grounds. Wait four minutes.</p>
    </article>
</body></html>"#;

fn test_config() -> AppConfig {
    AppConfig {
        user_agent: "pagelens-test/0.1".to_string(),
        fetch_timeout_secs: 5,
        probe_timeout_secs: 5,
        ..AppConfig::default()
    }
}

fn test_fetcher() -> PageFetcher {
    let config = FetcherConfig {
        timeout: Duration::from_secs(5),
        user_agent: "pagelens-test/0.1".to_string(),
    };
    let cache = Arc::new(PageCache::new(Duration::from_secs(60), 10));
    PageFetcher::new(&config, cache).expect("failed to build test PageFetcher")
}

async fn serve_article(server: &MockServer) -> String {
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(server)
        .await;
    format!("{}/article", server.uri())
}

/// Fails every time and counts how often it ran.
struct FailingStage {
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Stage for FailingStage {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn run(&self, _ctx: &StageContext, _report: &mut Report) -> Result<(), AnalysisError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Err(AnalysisError::Stage {
            stage: "failing".to_string(),
            reason: "injected failure".to_string(),
        })
    }
}

fn analyzer_with_failure(policy: FailurePolicy, runs: &Arc<AtomicUsize>) -> Analyzer {
    Analyzer::builder(test_fetcher())
        .failure_policy(policy)
        .stage(KeywordStage::new(5))
        .stage(FailingStage {
            runs: Arc::clone(runs),
        })
        .stage(ReadabilityStage::new(ReadabilityScorer::new(
            ReadabilityMethod::Basic,
        )))
        .stage(SuggestionStage)
        .build()
}

// ---------------------------------------------------------------------------
// Default pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn default_pipeline_fills_every_section() {
    let server = MockServer::start().await;
    let url = serve_article(&server).await;

    let analyzer = Analyzer::from_config(&test_config()).unwrap();
    assert_eq!(
        analyzer.stage_names(),
        ["keywords", "readability", "performance", "suggestions"]
    );

    let report = analyzer.analyze(&url).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["url"], url.as_str());
    assert!(json.get("error").is_none(), "unexpected error: {json}");
    assert!(json.get("stage_errors").is_none());

    let keywords = json["keyword_analysis"].as_array().unwrap();
    assert_eq!(keywords[0]["keyword"], "coffee");
    assert_eq!(keywords[0]["count"], 4);

    assert!(json["readability"]["score"].is_f64());
    assert!(json["readability"]["level"].is_string());

    assert_eq!(json["performance"]["status_code"], 200);
    assert!(json["performance"].get("error").is_none());

    assert_eq!(json["ai_search_optimization"], serde_json::json!({}));
}

#[tokio::test]
async fn unreachable_host_yields_url_and_error_only() {
    let analyzer = Analyzer::from_config(&test_config()).unwrap();
    let report = analyzer.analyze("https://unreachable.invalid").await;

    let json = serde_json::to_value(&report).unwrap();
    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();

    assert_eq!(keys, ["error", "url"]);
    assert_eq!(json["url"], "https://unreachable.invalid");
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to fetch content from the URL"), "got: {error}");
}

#[tokio::test]
async fn non_success_status_aborts_before_stages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let runs = Arc::new(AtomicUsize::new(0));
    let analyzer = analyzer_with_failure(FailurePolicy::IsolateStages, &runs);
    let report = analyzer.analyze(&format!("{}/gone", server.uri())).await;

    assert!(report.is_error());
    assert_eq!(report.section_count(), 0);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_analysis_fetches_page_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&server)
        .await;
    let url = format!("{}/article", server.uri());

    let analyzer = Analyzer::builder(test_fetcher())
        .stage(KeywordStage::new(3))
        .build();
    let first = analyzer.analyze(&url).await;
    let second = analyzer.analyze(&url).await;

    assert_eq!(first.keyword_analysis, second.keyword_analysis);
}

// ---------------------------------------------------------------------------
// Failure policies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn abort_policy_stops_and_keeps_earlier_sections() {
    let server = MockServer::start().await;
    let url = serve_article(&server).await;
    let runs = Arc::new(AtomicUsize::new(0));

    let analyzer = analyzer_with_failure(FailurePolicy::AbortRemaining, &runs);
    let report = analyzer.analyze(&url).await;

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(report.keyword_analysis.is_some());
    assert!(report.readability.is_none());
    assert!(report.ai_search_optimization.is_none());
    assert_eq!(
        report.error.as_deref(),
        Some("Unexpected error: failing stage failed: injected failure")
    );
    assert!(report.stage_errors.is_empty());
}

#[tokio::test]
async fn isolate_policy_runs_every_stage() {
    let server = MockServer::start().await;
    let url = serve_article(&server).await;
    let runs = Arc::new(AtomicUsize::new(0));

    let analyzer = analyzer_with_failure(FailurePolicy::IsolateStages, &runs);
    let report = analyzer.analyze(&url).await;

    assert!(report.error.is_none());
    assert!(report.keyword_analysis.is_some());
    assert!(report.readability.is_some());
    assert!(report.ai_search_optimization.is_some());
    assert_eq!(
        report.stage_errors.get("failing").map(String::as_str),
        Some("failing stage failed: injected failure")
    );
}

#[tokio::test]
async fn builder_defaults_to_abort_policy() {
    let analyzer = Analyzer::builder(test_fetcher()).build();
    assert_eq!(analyzer.failure_policy(), FailurePolicy::AbortRemaining);
    assert!(analyzer.stage_names().is_empty());
}

#[tokio::test]
async fn analyze_page_runs_offline() {
    let analyzer = Analyzer::builder(test_fetcher())
        .stage(KeywordStage::new(1))
        .stage(SuggestionStage)
        .build();
    let page = Arc::new(pagelens_analyzer::extract_page(ARTICLE));

    let report = analyzer.analyze_page("file://article.html", page).await;

    assert_eq!(report.url, "file://article.html");
    let keywords = report.keyword_analysis.unwrap();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].keyword, "coffee");
    assert!(report.performance.is_none());
}
