//! Per-URL signals and the insights derived from comparing them.
//!
//! All wire shapes use camelCase field names.

use serde::{Deserialize, Serialize};

/// Headline placed in the sentinel record when the analysis step failed.
pub const ANALYSIS_FAILED: &str = "Analysis failed";
/// Headline placed in the sentinel record when the page yielded no text.
pub const UNABLE_TO_FETCH: &str = "Unable to fetch page";
/// Price placeholder used whenever no price is known.
pub const PRICE_NOT_AVAILABLE: &str = "N/A";

/// The five fields the extraction model is asked to return.
///
/// Unknown fields are rejected so a reply with a different shape is treated
/// as a parse failure instead of being half-accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageAnalysis {
    pub main_headline: String,
    pub has_pricing: bool,
    /// Free-form, e.g. `"$10/mo"`, `"€99 per year"` or `"N/A"`.
    pub pricing_starts_from: String,
    pub has_discount: bool,
    pub has_free_trial: bool,
}

impl PageAnalysis {
    /// Sentinel for a page whose analysis could not be completed.
    #[must_use]
    pub fn failed() -> Self {
        Self::sentinel(ANALYSIS_FAILED)
    }

    /// Sentinel for a page that produced no usable text.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::sentinel(UNABLE_TO_FETCH)
    }

    fn sentinel(headline: &str) -> Self {
        Self {
            main_headline: headline.to_string(),
            has_pricing: false,
            pricing_starts_from: PRICE_NOT_AVAILABLE.to_string(),
            has_discount: false,
            has_free_trial: false,
        }
    }

    /// True for either sentinel record.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        is_sentinel_fields(
            &self.main_headline,
            self.has_pricing,
            &self.pricing_starts_from,
            self.has_discount,
            self.has_free_trial,
        )
    }
}

/// Extracted marketing/pricing facts for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignal {
    pub url: String,
    pub main_headline: String,
    pub has_pricing: bool,
    pub pricing_starts_from: String,
    pub has_discount: bool,
    pub has_free_trial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

impl PageSignal {
    #[must_use]
    pub fn from_analysis(
        url: impl Into<String>,
        analysis: PageAnalysis,
        screenshot_url: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            main_headline: analysis.main_headline,
            has_pricing: analysis.has_pricing,
            pricing_starts_from: analysis.pricing_starts_from,
            has_discount: analysis.has_discount,
            has_free_trial: analysis.has_free_trial,
            screenshot_url,
        }
    }

    /// True when the extracted fields are one of the sentinel records.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        is_sentinel_fields(
            &self.main_headline,
            self.has_pricing,
            &self.pricing_starts_from,
            self.has_discount,
            self.has_free_trial,
        )
    }
}

fn is_sentinel_fields(
    headline: &str,
    has_pricing: bool,
    pricing_starts_from: &str,
    has_discount: bool,
    has_free_trial: bool,
) -> bool {
    (headline == ANALYSIS_FAILED || headline == UNABLE_TO_FETCH)
        && !has_pricing
        && !has_discount
        && !has_free_trial
        && pricing_starts_from == PRICE_NOT_AVAILABLE
}

/// Raw Core Web Vitals. Millisecond values are rounded to whole ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreMetrics {
    pub first_contentful_paint_ms: u32,
    pub largest_contentful_paint_ms: u32,
    pub speed_index_ms: u32,
    pub total_blocking_time_ms: u32,
    /// Unitless, within `[0, 1]`.
    pub cumulative_layout_shift: f64,
}

/// Normalized page-speed/SEO/accessibility scores plus raw timings for one
/// URL. Live and synthetic measurements share this exact shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSignal {
    pub url: String,
    pub performance_score: u8,
    pub core_metrics: CoreMetrics,
    pub accessibility_score: u8,
    pub best_practices_score: u8,
    pub seo_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Advantage,
    Disadvantage,
    Recommendation,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightKind::Advantage => write!(f, "advantage"),
            InsightKind::Disadvantage => write!(f, "disadvantage"),
            InsightKind::Recommendation => write!(f, "recommendation"),
        }
    }
}

/// One classified, natural-language observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonInsight {
    pub kind: InsightKind,
    pub text: String,
}

impl ComparisonInsight {
    #[must_use]
    pub fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceWinner {
    Yours,
    Competitor,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceComparison {
    pub performance_winner: PerformanceWinner,
    pub insights: Vec<ComparisonInsight>,
}
