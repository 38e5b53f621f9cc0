//! Command handlers for the CLI.
//!
//! Inputs go through the same batch validation as the HTTP API, then the
//! shared pipelines run and their output is rendered as JSON.

use serde::Serialize;
use sitelens_analyzer::{AnalysisReport, Analyzer, SiteComparison};
use sitelens_scraper::{parse_target_url, resolve_batch};

/// Runs the conversion analysis for a batch of URLs.
///
/// # Errors
///
/// Returns an error only for invalid input; per-URL failures degrade to
/// sentinel analyses.
pub(crate) async fn run_analyze(
    analyzer: &Analyzer,
    urls: &[String],
    subject: Option<&str>,
    max_urls: usize,
) -> anyhow::Result<AnalysisReport> {
    let batch = resolve_batch(urls, subject, max_urls)
        .map_err(|e| anyhow::anyhow!("{e} (see --subject and SITELENS_MAX_URLS)"))?;
    tracing::info!(
        urls = batch.urls.len(),
        subject = %batch.urls[batch.subject],
        "analyzing batch"
    );
    Ok(analyzer.analyze_report(&batch.urls, batch.subject).await)
}

/// Runs the performance comparison of two sites.
///
/// # Errors
///
/// Returns an error if either URL is invalid.
pub(crate) async fn run_compare(
    analyzer: &Analyzer,
    your_url: &str,
    competitor_url: &str,
) -> anyhow::Result<SiteComparison> {
    parse_target_url(your_url)?;
    parse_target_url(competitor_url)?;
    Ok(analyzer
        .compare_sites(your_url.trim(), competitor_url.trim())
        .await)
}

pub(crate) fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}
