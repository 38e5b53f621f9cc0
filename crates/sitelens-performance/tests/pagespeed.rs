//! Integration tests for the live measurement path using wiremock HTTP mocks.

use sitelens_performance::{
    synthesize, KnownDomains, PageSpeedClient, PerformanceError, PerformanceService,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/pagespeedonline/v5/runPagespeed";

fn test_client(server: &MockServer) -> PageSpeedClient {
    PageSpeedClient::with_base_url("test-key", 30, &format!("{}{ENDPOINT}", server.uri()))
        .expect("client construction should not fail")
}

fn lighthouse_body() -> serde_json::Value {
    serde_json::json!({
        "id": "https://example.com/",
        "lighthouseResult": {
            "finalUrl": "https://example.com/",
            "categories": {
                "performance": { "id": "performance", "score": 0.87 },
                "accessibility": { "id": "accessibility", "score": 0.914 },
                "best-practices": { "id": "best-practices", "score": 1.0 },
                "seo": { "id": "seo", "score": 0.826 }
            },
            "audits": {
                "first-contentful-paint": { "numericValue": 1234.56 },
                "largest-contentful-paint": { "numericValue": 2480.4 },
                "speed-index": { "numericValue": 3011.0 },
                "total-blocking-time": { "numericValue": 150.2 },
                "cumulative-layout-shift": { "numericValue": 0.043 },
                "interactive": { "numericValue": 4100.0 }
            }
        }
    })
}

#[tokio::test]
async fn measure_parses_lighthouse_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("url", "https://example.com"))
        .and(query_param("key", "test-key"))
        .and(query_param("strategy", "mobile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighthouse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let signal = test_client(&server)
        .measure("https://example.com")
        .await
        .expect("should parse lighthouse result");

    assert_eq!(signal.url, "https://example.com");
    assert_eq!(signal.performance_score, 87);
    assert_eq!(signal.accessibility_score, 91);
    assert_eq!(signal.best_practices_score, 100);
    assert_eq!(signal.seo_score, 83);
    assert_eq!(signal.core_metrics.first_contentful_paint_ms, 1235);
    assert_eq!(signal.core_metrics.largest_contentful_paint_ms, 2480);
    assert_eq!(signal.core_metrics.speed_index_ms, 3011);
    assert_eq!(signal.core_metrics.total_blocking_time_ms, 150);
    assert!((signal.core_metrics.cumulative_layout_shift - 0.043).abs() < f64::EPSILON);
}

#[tokio::test]
async fn measure_maps_429_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .measure("https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, PerformanceError::RateLimited), "got: {err:?}");
}

#[tokio::test]
async fn measure_maps_500_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .measure("https://example.com")
        .await
        .unwrap_err();
    assert!(
        matches!(err, PerformanceError::UnexpectedStatus { status: 500 }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn measure_rejects_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>quota page</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .measure("https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, PerformanceError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn service_uses_live_result_when_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighthouse_body()))
        .mount(&server)
        .await;

    let service = PerformanceService::new(Some(test_client(&server)), KnownDomains::builtin());
    let signal = service.measure("https://example.com").await;
    assert_eq!(signal.performance_score, 87);
}

#[tokio::test]
async fn service_falls_back_on_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let known = KnownDomains::builtin();
    let service = PerformanceService::new(Some(test_client(&server)), known.clone());
    let signal = service.measure("https://stripe.com/pricing").await;

    assert_eq!(signal, synthesize("https://stripe.com/pricing", &known));
    assert!((85..=95).contains(&signal.performance_score));
}

#[tokio::test]
async fn service_falls_back_on_incomplete_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lighthouseResult": { "categories": {} } })),
        )
        .mount(&server)
        .await;

    let known = KnownDomains::builtin();
    let service = PerformanceService::new(Some(test_client(&server)), known.clone());
    let signal = service.measure("https://example.com").await;
    assert_eq!(signal, synthesize("https://example.com", &known));
}

#[tokio::test]
async fn synthetic_service_never_calls_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighthouse_body()))
        .expect(0)
        .mount(&server)
        .await;

    let service = PerformanceService::synthetic(KnownDomains::builtin());
    let signal = service.measure("https://example.com").await;
    assert_eq!(signal.url, "https://example.com");
}
