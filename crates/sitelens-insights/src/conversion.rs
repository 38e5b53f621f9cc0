//! Conversion/pricing comparison across two or more analyzed pages.
//!
//! The subject site is passed explicitly; classification is always from its
//! point of view. Each boolean dimension (pricing shown, discount active,
//! free trial offered) only produces a sentence when the participants split
//! into a non-empty "have" group and a non-empty "lack" group.

use sitelens_core::{ComparisonInsight, InsightKind, PageSignal};

use crate::phrasing::{agree, join_names, site_labels};
use crate::price::parse_price;

/// A participant with its resolved label.
struct Site<'a> {
    signal: &'a PageSignal,
    label: String,
}

/// Compares `subject` against `others` and returns insights in a fixed
/// order: pricing visibility, starting price, discount, free trial, then
/// (for exactly one competitor) competitive positioning.
///
/// Returns an empty list when `others` is empty.
#[must_use]
pub fn compare_page_signals(subject: &PageSignal, others: &[PageSignal]) -> Vec<ComparisonInsight> {
    if others.is_empty() {
        return Vec::new();
    }

    let signals: Vec<&PageSignal> = std::iter::once(subject).chain(others).collect();
    let labels = site_labels(signals.iter().map(|s| s.url.as_str()));
    let sites: Vec<Site<'_>> = signals
        .into_iter()
        .zip(labels)
        .map(|(signal, label)| Site { signal, label })
        .collect();

    let mut insights = Vec::new();
    insights.extend(pricing_visibility(&sites));
    insights.extend(starting_price(&sites));
    insights.extend(discount(&sites));
    insights.extend(free_trial(&sites));
    if sites.len() == 2 {
        insights.extend(positioning(&sites[0], &sites[1]));
    }
    insights
}

/// Splits sites into `(have, lack)` label lists and reports whether the
/// subject (index 0) is in the "have" group. `None` when either group is
/// empty.
fn partition<'s>(
    sites: &'s [Site<'_>],
    has: impl Fn(&PageSignal) -> bool,
) -> Option<(Vec<&'s str>, Vec<&'s str>, bool)> {
    let (have, lack): (Vec<&Site<'_>>, Vec<&Site<'_>>) =
        sites.iter().partition(|site| has(site.signal));
    if have.is_empty() || lack.is_empty() {
        return None;
    }
    let subject_has = has(sites[0].signal);
    Some((
        have.iter().map(|s| s.label.as_str()).collect(),
        lack.iter().map(|s| s.label.as_str()).collect(),
        subject_has,
    ))
}

fn pricing_visibility(sites: &[Site<'_>]) -> Option<ComparisonInsight> {
    let (have, lack, subject_has) = partition(sites, |s| s.has_pricing)?;
    Some(if subject_has {
        ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{} {} pricing publicly, while {} {} not.",
                join_names(&have),
                agree(have.len(), "shows", "show"),
                join_names(&lack),
                agree(lack.len(), "does", "do"),
            ),
        )
    } else {
        ComparisonInsight::new(
            InsightKind::Recommendation,
            format!(
                "Consider showing pricing on {}: {} {} prices up front.",
                sites[0].label,
                join_names(&have),
                agree(have.len(), "shows", "show"),
            ),
        )
    })
}

fn discount(sites: &[Site<'_>]) -> Option<ComparisonInsight> {
    let (have, lack, subject_has) = partition(sites, |s| s.has_discount)?;
    Some(if subject_has {
        ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{} {} running an active discount or promotion, while {} {} not.",
                join_names(&have),
                agree(have.len(), "is", "are"),
                join_names(&lack),
                agree(lack.len(), "is", "are"),
            ),
        )
    } else {
        ComparisonInsight::new(
            InsightKind::Disadvantage,
            format!(
                "{} {} running an active discount or promotion that {} is not matching.",
                join_names(&have),
                agree(have.len(), "is", "are"),
                sites[0].label,
            ),
        )
    })
}

fn free_trial(sites: &[Site<'_>]) -> Option<ComparisonInsight> {
    let (have, lack, subject_has) = partition(sites, |s| s.has_free_trial)?;
    Some(if subject_has {
        ComparisonInsight::new(
            InsightKind::Advantage,
            format!(
                "{} {} a free trial, while {} {} not.",
                join_names(&have),
                agree(have.len(), "offers", "offer"),
                join_names(&lack),
                agree(lack.len(), "does", "do"),
            ),
        )
    } else {
        ComparisonInsight::new(
            InsightKind::Recommendation,
            format!(
                "Consider offering a free trial on {}: {} {} one.",
                sites[0].label,
                join_names(&have),
                agree(have.len(), "offers", "offer"),
            ),
        )
    })
}

/// Lowest vs highest parseable starting price. Needs at least two
/// parseable prices that are not all equal.
fn starting_price(sites: &[Site<'_>]) -> Option<ComparisonInsight> {
    let priced: Vec<(&Site<'_>, f64)> = sites
        .iter()
        .filter_map(|site| parse_price(&site.signal.pricing_starts_from).map(|p| (site, p)))
        .collect();
    if priced.len() < 2 {
        return None;
    }

    let min = priced.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
    let max = priced.iter().map(|(_, p)| *p).fold(f64::NEG_INFINITY, f64::max);
    if same_price(min, max) {
        return None;
    }

    let lowest: Vec<&Site<'_>> = priced
        .iter()
        .filter(|(_, p)| same_price(*p, min))
        .map(|(s, _)| *s)
        .collect();
    let highest: Vec<&Site<'_>> = priced
        .iter()
        .filter(|(_, p)| same_price(*p, max))
        .map(|(s, _)| *s)
        .collect();

    let lowest_names: Vec<&str> = lowest.iter().map(|s| s.label.as_str()).collect();
    let highest_names: Vec<&str> = highest.iter().map(|s| s.label.as_str()).collect();
    let low_text = lowest[0].signal.pricing_starts_from.trim();
    let high_text = highest[0].signal.pricing_starts_from.trim();

    let detail = if min > 0.0 {
        format!(
            "{low_text} vs {high_text} at {}, {}% higher",
            join_names(&highest_names),
            percent_higher(min, max)
        )
    } else {
        format!("{low_text} vs {high_text} at {}", join_names(&highest_names))
    };

    let subject_is_lowest = lowest.iter().any(|s| std::ptr::eq(*s, &sites[0]));
    let kind = if subject_is_lowest {
        InsightKind::Advantage
    } else {
        InsightKind::Disadvantage
    };

    Some(ComparisonInsight::new(
        kind,
        format!(
            "{} {} the lowest starting price ({detail}).",
            join_names(&lowest_names),
            agree(lowest_names.len(), "has", "have"),
        ),
    ))
}

/// Exclusive advantages of each side across the three boolean dimensions.
fn positioning(subject: &Site<'_>, rival: &Site<'_>) -> Option<ComparisonInsight> {
    let subject_only = exclusive_strengths(subject.signal, rival.signal);
    let rival_only = exclusive_strengths(rival.signal, subject.signal);

    let (kind, text) = match (subject_only.is_empty(), rival_only.is_empty()) {
        (true, true) => return None,
        (false, false) => (
            InsightKind::Recommendation,
            format!(
                "Competitive positioning: {} stands out with {}, while {} stands out with {}.",
                subject.label,
                join_names(&subject_only),
                rival.label,
                join_names(&rival_only),
            ),
        ),
        (false, true) => (
            InsightKind::Advantage,
            format!(
                "Competitive positioning: {} stands out with {}; {} has no exclusive advantage.",
                subject.label,
                join_names(&subject_only),
                rival.label,
            ),
        ),
        (true, false) => (
            InsightKind::Disadvantage,
            format!(
                "Competitive positioning: {} stands out with {}; {} has no exclusive advantage.",
                rival.label,
                join_names(&rival_only),
                subject.label,
            ),
        ),
    };

    Some(ComparisonInsight::new(kind, text))
}

fn exclusive_strengths(a: &PageSignal, b: &PageSignal) -> Vec<&'static str> {
    let mut strengths = Vec::new();
    if a.has_pricing && !b.has_pricing {
        strengths.push("transparent pricing");
    }
    if a.has_discount && !b.has_discount {
        strengths.push("active promotions");
    }
    if a.has_free_trial && !b.has_free_trial {
        strengths.push("free trial");
    }
    strengths
}

fn same_price(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[allow(clippy::cast_possible_truncation)]
fn percent_higher(low: f64, high: f64) -> i64 {
    ((high - low) / low * 100.0).round() as i64
}
