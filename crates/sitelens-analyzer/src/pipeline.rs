use futures::future::join_all;
use serde::Serialize;
use sitelens_core::{
    AppConfig, ComparisonInsight, PageAnalysis, PageSignal, PerformanceComparison,
    PerformanceSignal,
};
use sitelens_insights::{compare_page_signals, compare_performance};
use sitelens_performance::PerformanceService;
use sitelens_scraper::{extract_text, PageFetcher};

use crate::error::AnalyzerError;
use crate::llm::{CroExtractor, LlmClient};
use crate::screenshot::ScreenshotService;

/// Output of a conversion/pricing analysis batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analyses: Vec<PageSignal>,
    pub insights: Vec<ComparisonInsight>,
}

/// Output of a head-to-head performance comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteComparison {
    pub your_site: PerformanceSignal,
    pub competitor_site: PerformanceSignal,
    pub comparison: PerformanceComparison,
}

/// Runs the per-URL pipelines.
#[derive(Debug, Clone)]
pub struct Analyzer {
    fetcher: PageFetcher,
    extractor: CroExtractor,
    screenshots: Option<ScreenshotService>,
    performance: PerformanceService,
}

impl Analyzer {
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        extractor: CroExtractor,
        screenshots: Option<ScreenshotService>,
        performance: PerformanceService,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            screenshots,
            performance,
        }
    }

    /// Builds every collaborator from application config.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError`] if an HTTP client cannot be constructed, a
    /// configured base URL is invalid, or the known-domains file fails to
    /// load.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalyzerError> {
        let fetcher = PageFetcher::new(config.request_timeout_secs, &config.user_agent)?;

        let extractor = config
            .llm_api_key
            .as_deref()
            .map(|key| {
                LlmClient::with_base_url(
                    key,
                    &config.llm_model,
                    config.request_timeout_secs,
                    &config.llm_base_url,
                )
            })
            .transpose()
            .map(CroExtractor::new)?;

        let screenshots = if config.screenshots_enabled {
            Some(ScreenshotService::with_base_url(
                config.request_timeout_secs,
                &config.screenshot_base_url,
            )?)
        } else {
            None
        };

        let performance = PerformanceService::from_config(config)?;

        tracing::info!(
            llm = extractor.is_configured(),
            screenshots = screenshots.is_some(),
            live_performance = performance.is_live(),
            "analyzer configured"
        );

        Ok(Self::new(fetcher, extractor, screenshots, performance))
    }

    /// Fetch, extract and analyze one page. Never fails.
    pub async fn analyze_page(&self, url: &str) -> PageSignal {
        let analysis = async {
            let html = self.fetcher.fetch_or_empty(url).await;
            let text = extract_text(&html);
            if text.is_empty() {
                tracing::warn!(url, "no page text extracted");
                PageAnalysis::unreachable()
            } else {
                self.extractor.extract(url, &text).await
            }
        };
        let screenshot = async {
            match &self.screenshots {
                Some(service) => Some(service.capture(url).await),
                None => None,
            }
        };

        let (analysis, screenshot_url) = tokio::join!(analysis, screenshot);
        PageSignal::from_analysis(url, analysis, screenshot_url)
    }

    /// Analyzes every URL concurrently. The result has one entry per input
    /// URL, in input order.
    pub async fn analyze_urls(&self, urls: &[String]) -> Vec<PageSignal> {
        join_all(urls.iter().map(|url| self.analyze_page(url))).await
    }

    /// Analyzes `urls` and compares them from the point of view of
    /// `urls[subject]`.
    pub async fn analyze_report(&self, urls: &[String], subject: usize) -> AnalysisReport {
        let analyses = self.analyze_urls(urls).await;
        let insights = page_insights(&analyses, subject);
        AnalysisReport { analyses, insights }
    }

    /// Measures both sites concurrently and compares them.
    pub async fn compare_sites(&self, your_url: &str, competitor_url: &str) -> SiteComparison {
        let (your_site, competitor_site) = tokio::join!(
            self.performance.measure(your_url),
            self.performance.measure(competitor_url)
        );
        let comparison = compare_performance(&your_site, &competitor_site);
        SiteComparison {
            your_site,
            competitor_site,
            comparison,
        }
    }
}

/// Conversion insights for `analyses` with `analyses[subject]` as the subject.
///
/// Sentinel records carry no real facts and are left out. No insights are
/// produced when the subject itself is a sentinel or is out of range.
#[must_use]
pub fn page_insights(analyses: &[PageSignal], subject: usize) -> Vec<ComparisonInsight> {
    let Some(subject_signal) = analyses.get(subject).filter(|s| !s.is_sentinel()) else {
        return Vec::new();
    };

    let others: Vec<PageSignal> = analyses
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != subject && !s.is_sentinel())
        .map(|(_, s)| s.clone())
        .collect();

    compare_page_signals(subject_signal, &others)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(url: &str, price: &str, discount: bool, trial: bool) -> PageSignal {
        PageSignal {
            url: url.to_string(),
            main_headline: "Headline".to_string(),
            has_pricing: true,
            pricing_starts_from: price.to_string(),
            has_discount: discount,
            has_free_trial: trial,
            screenshot_url: None,
        }
    }

    fn sentinel(url: &str) -> PageSignal {
        PageSignal::from_analysis(url, PageAnalysis::failed(), None)
    }

    #[test]
    fn insights_skip_sentinel_records() {
        let analyses = vec![
            signal("https://a.com", "$10/mo", false, true),
            sentinel("https://broken.com"),
            signal("https://b.com", "$15/mo", true, false),
        ];

        let insights = page_insights(&analyses, 0);

        assert!(!insights.is_empty());
        assert!(insights.iter().all(|i| !i.text.contains("broken.com")));
    }

    #[test]
    fn sentinel_subject_yields_no_insights() {
        let analyses = vec![
            sentinel("https://a.com"),
            signal("https://b.com", "$15/mo", true, false),
        ];
        assert!(page_insights(&analyses, 0).is_empty());
    }

    #[test]
    fn subject_can_be_any_position() {
        let analyses = vec![
            signal("https://a.com", "$10/mo", false, true),
            signal("https://b.com", "$15/mo", true, false),
        ];
        let from_b = page_insights(&analyses, 1);
        let from_a = page_insights(&analyses, 0);
        assert_ne!(from_a, from_b);
    }

    #[test]
    fn out_of_range_subject_yields_no_insights() {
        let analyses = vec![signal("https://a.com", "$10/mo", false, true)];
        assert!(page_insights(&analyses, 5).is_empty());
    }
}
