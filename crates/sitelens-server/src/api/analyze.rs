//! POST /api/v1/analyze: conversion/pricing analysis of a batch of URLs.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use sitelens_analyzer::AnalysisReport;
use sitelens_scraper::{resolve_batch, TargetBatch};

use crate::middleware::RequestId;

use super::{json_body, ApiError, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    pub subject_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub meta: ResponseMeta,
}

fn validate(req_id: &str, body: &AnalyzeRequest, max_urls: usize) -> Result<TargetBatch, ApiError> {
    resolve_batch(&body.urls, body.subject_url.as_deref(), max_urls)
        .map_err(|e| ApiError::validation(req_id, e.to_string()))
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;
    let batch = validate(rid, &body, state.max_urls)?;

    tracing::info!(
        request_id = %rid,
        urls = batch.urls.len(),
        subject = %batch.urls[batch.subject],
        "analyzing batch"
    );

    let report = state.analyzer.analyze_report(&batch.urls, batch.subject).await;

    Ok(Json(AnalyzeResponse {
        report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{offline_app, post_json};
    use super::*;

    fn request(urls: &[&str], subject: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest {
            urls: urls.iter().map(|u| (*u).to_string()).collect(),
            subject_url: subject.map(str::to_string),
        }
    }

    #[test]
    fn validate_defaults_subject_to_first_url() {
        let batch = validate("r", &request(&[" https://a.test ", "https://b.test"], None), 10)
            .expect("valid");
        assert_eq!(batch.urls, ["https://a.test", "https://b.test"]);
        assert_eq!(batch.subject, 0);
    }

    #[test]
    fn validate_resolves_explicit_subject() {
        let batch = validate(
            "r",
            &request(&["https://a.test", "https://b.test"], Some("https://b.test")),
            10,
        )
        .expect("valid");
        assert_eq!(batch.subject, 1);
    }

    #[test]
    fn validate_accepts_subject_with_trailing_slash() {
        let batch = validate(
            "r",
            &request(&["https://a.test", "https://b.test"], Some("https://a.test/")),
            10,
        )
        .expect("valid");
        assert_eq!(batch.subject, 0);
        assert_eq!(batch.urls, ["https://a.test", "https://b.test"]);
    }

    #[test]
    fn validate_rejects_unknown_subject() {
        let err = validate("r", &request(&["https://a.test"], Some("https://c.test")), 10)
            .unwrap_err();
        assert_eq!(err.error.code, "validation_error");
        assert!(err.error.message.contains("https://c.test"), "got: {}", err.error.message);
    }

    #[test]
    fn validate_rejects_empty_and_oversized_batches() {
        assert!(validate("r", &request(&[], None), 10).is_err());
        let err = validate("r", &request(&["https://a.test", "https://b.test"], None), 1)
            .unwrap_err();
        assert!(err.error.message.contains("at most 1"));
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        let err = validate("r", &request(&["https://a.test", "ftp://b.test"], None), 10)
            .unwrap_err();
        assert!(err.error.message.contains("ftp://b.test"), "got: {}", err.error.message);
    }

    #[tokio::test]
    async fn analyze_returns_one_entry_per_url_even_when_all_fetches_fail() {
        let body = r#"{"urls":["http://127.0.0.1:1/a","http://127.0.0.1:1/b","http://127.0.0.1:1/c"]}"#;

        let (status, json) = post_json(offline_app(), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::OK);
        let analyses = json["analyses"].as_array().expect("analyses array");
        assert_eq!(analyses.len(), 3);
        for (entry, suffix) in analyses.iter().zip(["/a", "/b", "/c"]) {
            assert!(entry["url"].as_str().is_some_and(|u| u.ends_with(suffix)));
            assert_eq!(entry["mainHeadline"], "Unable to fetch page");
            assert_eq!(entry["pricingStartsFrom"], "N/A");
            assert_eq!(entry["hasPricing"], false);
        }
        assert_eq!(json["insights"], serde_json::json!([]));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn analyze_rejects_missing_urls() {
        let (status, json) = post_json(offline_app(), "/api/v1/analyze", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn analyze_rejects_relative_url() {
        let (status, json) =
            post_json(offline_app(), "/api/v1/analyze", r#"{"urls":["/pricing"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("/pricing")));
    }
}
