//! Head-to-head comparison of two performance measurements.

use sitelens_core::{
    ComparisonInsight, InsightKind, PerformanceComparison, PerformanceSignal, PerformanceWinner,
};

use crate::phrasing::site_labels;

/// LCP ratio above which the slower site is called out.
pub const LCP_RATIO_THRESHOLD: f64 = 1.2;
/// Minimum SEO / accessibility gap, in points, worth a sentence.
pub const CATEGORY_GAP_THRESHOLD: i16 = 5;

/// Compares `yours` against `competitor`.
///
/// The winner is whichever site has the higher performance score, or
/// [`PerformanceWinner::Tie`] when they match. Insights are emitted in a
/// fixed order: performance score gap, LCP ratio, SEO gap, accessibility gap.
#[must_use]
pub fn compare_performance(
    yours: &PerformanceSignal,
    competitor: &PerformanceSignal,
) -> PerformanceComparison {
    let labels = site_labels([yours.url.as_str(), competitor.url.as_str()]);
    let (you, them) = (labels[0].as_str(), labels[1].as_str());

    let score_gap = i16::from(yours.performance_score) - i16::from(competitor.performance_score);
    let performance_winner = match score_gap {
        0 => PerformanceWinner::Tie,
        gap if gap > 0 => PerformanceWinner::Yours,
        _ => PerformanceWinner::Competitor,
    };

    let mut insights = Vec::new();

    if score_gap > 0 {
        insights.push(ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{you} has a {score_gap}-point performance lead over {them} ({} vs {}).",
                yours.performance_score, competitor.performance_score
            ),
        ));
    } else if score_gap < 0 {
        insights.push(ComparisonInsight::new(
            InsightKind::Disadvantage,
            format!(
                "{them} has a {}-point performance lead over {you} ({} vs {}).",
                -score_gap, competitor.performance_score, yours.performance_score
            ),
        ));
    }

    if let Some(insight) = lcp_insight(yours, competitor, you, them) {
        insights.push(insight);
    }

    insights.extend(category_insight(
        "SEO",
        yours.seo_score,
        competitor.seo_score,
        you,
        them,
    ));
    insights.extend(category_insight(
        "accessibility",
        yours.accessibility_score,
        competitor.accessibility_score,
        you,
        them,
    ));

    PerformanceComparison {
        performance_winner,
        insights,
    }
}

fn lcp_insight(
    yours: &PerformanceSignal,
    competitor: &PerformanceSignal,
    you: &str,
    them: &str,
) -> Option<ComparisonInsight> {
    let your_lcp = yours.core_metrics.largest_contentful_paint_ms;
    let their_lcp = competitor.core_metrics.largest_contentful_paint_ms;
    if your_lcp == 0 || their_lcp == 0 {
        return None;
    }

    let ratio = f64::from(your_lcp) / f64::from(their_lcp);
    if ratio > LCP_RATIO_THRESHOLD {
        let pct = percent_over(ratio);
        return Some(ComparisonInsight::new(
            InsightKind::Disadvantage,
            format!(
                "{you} takes {pct}% longer than {them} to render its largest content ({your_lcp} ms vs {their_lcp} ms)."
            ),
        ));
    }

    let inverse = f64::from(their_lcp) / f64::from(your_lcp);
    if inverse > LCP_RATIO_THRESHOLD {
        let pct = percent_over(inverse);
        return Some(ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{them} takes {pct}% longer than {you} to render its largest content ({their_lcp} ms vs {your_lcp} ms)."
            ),
        ));
    }

    None
}

fn category_insight(
    category: &str,
    your_score: u8,
    their_score: u8,
    you: &str,
    them: &str,
) -> Option<ComparisonInsight> {
    let gap = i16::from(your_score) - i16::from(their_score);
    if gap.abs() < CATEGORY_GAP_THRESHOLD {
        return None;
    }

    Some(if gap > 0 {
        ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{you} scores {gap} points higher than {them} on {category} ({your_score} vs {their_score})."
            ),
        )
    } else {
        ComparisonInsight::new(
            InsightKind::Recommendation,
            format!(
                "Improve {category} on {you}: {them} scores {} points higher ({their_score} vs {your_score}).",
                -gap
            ),
        )
    })
}

#[allow(clippy::cast_possible_truncation)]
fn percent_over(ratio: f64) -> i64 {
    ((ratio - 1.0) * 100.0).round() as i64
}
