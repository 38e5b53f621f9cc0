//! End-to-end tests for the analysis pipelines with every upstream mocked.

use sitelens_analyzer::{Analyzer, CroExtractor, LlmClient};
use sitelens_core::{InsightKind, PageAnalysis, PerformanceWinner};
use sitelens_performance::{synthesize, KnownDomains, PerformanceService};
use sitelens_scraper::PageFetcher;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [ { "message": { "role": "assistant", "content": content } } ]
    })
}

async fn mount_page(server: &MockServer, page: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

async fn mount_reply(server: &MockServer, url: &str, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(format!("URL: {url}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .mount(server)
        .await;
}

fn analyzer(llm: Option<LlmClient>) -> Analyzer {
    Analyzer::new(
        PageFetcher::new(5, "sitelens-test").expect("fetcher"),
        CroExtractor::new(llm),
        None,
        PerformanceService::synthetic(KnownDomains::builtin()),
    )
}

#[tokio::test]
async fn analyze_urls_keeps_input_order_and_degrades_per_url() {
    let pages = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&pages, "/a", "<html><h1>Alpha</h1><p>From $10/mo</p></html>").await;
    mount_page(&pages, "/b", "<html><h1>Beta</h1><p>From $15/mo</p></html>").await;
    mount_page(&pages, "/blank", "<html><script>app()</script></html>").await;

    let url_a = format!("{}/a", pages.uri());
    let url_b = format!("{}/b", pages.uri());
    let url_missing = format!("{}/missing", pages.uri());
    let url_blank = format!("{}/blank", pages.uri());

    mount_reply(
        &llm,
        &url_a,
        r#"{"mainHeadline":"Alpha","hasPricing":true,"pricingStartsFrom":"$10/mo","hasDiscount":false,"hasFreeTrial":true}"#,
    )
    .await;
    mount_reply(&llm, &url_b, "not json at all").await;

    let client = LlmClient::with_base_url("k", "m", 5, &format!("{}/v1", llm.uri()))
        .expect("client");
    let urls = vec![url_missing.clone(), url_a.clone(), url_b.clone(), url_blank.clone()];

    let analyses = analyzer(Some(client)).analyze_urls(&urls).await;

    assert_eq!(analyses.len(), 4);
    let returned: Vec<&str> = analyses.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(returned, [url_missing.as_str(), &url_a, &url_b, &url_blank]);

    assert_eq!(analyses[0].main_headline, "Unable to fetch page");
    assert_eq!(analyses[1].main_headline, "Alpha");
    assert!(analyses[1].has_free_trial);
    assert_eq!(analyses[2].main_headline, "Analysis failed");
    assert_eq!(analyses[3].main_headline, "Unable to fetch page");
    assert!(analyses.iter().all(|a| a.screenshot_url.is_none()));
}

#[tokio::test]
async fn analyze_urls_without_llm_key_yields_failed_sentinels() {
    let pages = MockServer::start().await;
    mount_page(&pages, "/a", "<p>Hello</p>").await;

    let urls = vec![format!("{}/a", pages.uri())];
    let analyses = analyzer(None).analyze_urls(&urls).await;

    assert_eq!(analyses.len(), 1);
    let expected = PageAnalysis::failed();
    assert_eq!(analyses[0].main_headline, expected.main_headline);
    assert_eq!(analyses[0].pricing_starts_from, "N/A");
}

#[tokio::test]
async fn analyze_report_compares_from_subject() {
    let pages = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&pages, "/a", "<p>A</p>").await;
    mount_page(&pages, "/b", "<p>B</p>").await;
    let url_a = format!("{}/a", pages.uri());
    let url_b = format!("{}/b", pages.uri());

    mount_reply(
        &llm,
        &url_a,
        r#"{"mainHeadline":"A","hasPricing":true,"pricingStartsFrom":"$10/mo","hasDiscount":false,"hasFreeTrial":true}"#,
    )
    .await;
    mount_reply(
        &llm,
        &url_b,
        r#"{"mainHeadline":"B","hasPricing":true,"pricingStartsFrom":"$15/mo","hasDiscount":true,"hasFreeTrial":false}"#,
    )
    .await;

    let client = LlmClient::with_base_url("k", "m", 5, &format!("{}/v1", llm.uri()))
        .expect("client");
    let report = analyzer(Some(client))
        .analyze_report(&[url_a, url_b], 0)
        .await;

    assert_eq!(report.analyses.len(), 2);
    let kinds: Vec<InsightKind> = report.insights.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&InsightKind::Advantage));
    assert!(kinds.contains(&InsightKind::Disadvantage));
    assert!(report.insights.iter().any(|i| i.text.contains("50% higher")));
}

#[tokio::test]
async fn compare_sites_uses_synthetic_data_without_credential() {
    let report = analyzer(None)
        .compare_sites("https://google.com", "https://salesforce.com")
        .await;

    let known = KnownDomains::builtin();
    assert_eq!(report.your_site, synthesize("https://google.com", &known));
    assert_eq!(report.competitor_site, synthesize("https://salesforce.com", &known));
    assert_eq!(report.comparison.performance_winner, PerformanceWinner::Yours);
    assert!(report.comparison.insights[0].text.contains("-point performance lead"));
}

#[tokio::test]
async fn site_comparison_serializes_camel_case() {
    let report = analyzer(None)
        .compare_sites("https://a.test", "https://b.test")
        .await;
    let json = serde_json::to_value(&report).expect("serialize");

    assert!(json.get("yourSite").is_some());
    assert!(json.get("competitorSite").is_some());
    assert!(json["comparison"].get("performanceWinner").is_some());
    assert!(json["yourSite"]["coreMetrics"]
        .get("largestContentfulPaintMs")
        .is_some());
}
