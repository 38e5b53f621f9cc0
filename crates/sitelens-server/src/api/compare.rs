//! POST /api/v1/compare: head-to-head performance comparison.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use sitelens_analyzer::SiteComparison;
use sitelens_scraper::parse_target_url;

use crate::middleware::RequestId;

use super::{json_body, ApiError, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CompareRequest {
    pub your_url: Option<String>,
    pub competitor_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CompareResponse {
    #[serde(flatten)]
    pub comparison: SiteComparison,
    pub meta: ResponseMeta,
}

fn required_url(req_id: &str, field: &str, value: Option<&str>) -> Result<String, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(req_id, format!("{field} is required")))?;
    parse_target_url(value)
        .map_err(|e| ApiError::validation(req_id, format!("{field}: {e}")))?;
    Ok(value.to_owned())
}

pub(super) async fn compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;
    let your_url = required_url(rid, "yourUrl", body.your_url.as_deref())?;
    let competitor_url = required_url(rid, "competitorUrl", body.competitor_url.as_deref())?;

    tracing::info!(request_id = %rid, %your_url, %competitor_url, "comparing sites");

    let comparison = state.analyzer.compare_sites(&your_url, &competitor_url).await;

    Ok(Json(CompareResponse {
        comparison,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{offline_app, post_json};

    #[tokio::test]
    async fn compare_returns_both_sites_and_winner() {
        let body = r#"{"yourUrl":"https://google.com","competitorUrl":"https://salesforce.com"}"#;

        let (status, json) = post_json(offline_app(), "/api/v1/compare", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["yourSite"]["url"], "https://google.com");
        assert_eq!(json["competitorSite"]["url"], "https://salesforce.com");
        assert_eq!(json["comparison"]["performanceWinner"], "yours");
        let insights = json["comparison"]["insights"].as_array().expect("insights");
        assert_eq!(insights[0]["kind"], "advantage");
        assert!(insights[0]["text"]
            .as_str()
            .is_some_and(|t| t.starts_with("google.com has a")));
        assert!(json["yourSite"]["coreMetrics"]["cumulativeLayoutShift"].is_number());
    }

    #[tokio::test]
    async fn compare_is_deterministic_without_credential() {
        let body = r#"{"yourUrl":"https://a.test","competitorUrl":"https://b.test"}"#;
        let (_, first) = post_json(offline_app(), "/api/v1/compare", body).await;
        let (_, second) = post_json(offline_app(), "/api/v1/compare", body).await;
        assert_eq!(first["yourSite"], second["yourSite"]);
        assert_eq!(first["comparison"], second["comparison"]);
    }

    #[tokio::test]
    async fn compare_requires_both_urls() {
        let (status, json) =
            post_json(offline_app(), "/api/v1/compare", r#"{"yourUrl":"https://a.test"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "competitorUrl is required");
    }

    #[tokio::test]
    async fn compare_rejects_invalid_url() {
        let body = r#"{"yourUrl":"not a url","competitorUrl":"https://b.test"}"#;
        let (status, json) = post_json(offline_app(), "/api/v1/compare", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("yourUrl:")));
    }
}
