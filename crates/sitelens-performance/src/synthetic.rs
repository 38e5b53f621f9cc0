//! Deterministic stand-in for the live measurement API.
//!
//! The base score comes from a 32-bit polynomial rolling hash of the URL,
//! mapped into a score band (the known-domain band when one exists). Every
//! timing metric is a linear function of the score's distance from 100, so a
//! lower score is always slower and less stable, and the ordering
//! FCP < LCP < speed index holds for every score.

use sitelens_core::{domain_label, CoreMetrics, PerformanceSignal};

use crate::known_domains::{KnownDomains, ScoreBand};

/// `h = h * 31 + unit` over the UTF-16 code units of `input`, wrapping at
/// 32 bits, returned as its magnitude.
#[must_use]
pub fn url_hash(input: &str) -> u32 {
    input
        .encode_utf16()
        .fold(0_i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Synthesizes a full [`PerformanceSignal`] for `url`.
///
/// Identical inputs always produce identical output.
#[must_use]
pub fn synthesize(url: &str, known: &KnownDomains) -> PerformanceSignal {
    let hash = url_hash(url);
    let band = known
        .band_for(&domain_label(url))
        .unwrap_or(ScoreBand::DEFAULT);
    let performance_score = band.pick(hash);

    PerformanceSignal {
        url: url.to_string(),
        performance_score,
        core_metrics: metrics_for_score(performance_score),
        accessibility_score: secondary_score(hash, 7, 70, 30),
        best_practices_score: secondary_score(hash, 11, 75, 25),
        seo_score: secondary_score(hash, 13, 80, 20),
    }
}

/// Timing metrics implied by a performance score.
#[must_use]
pub fn metrics_for_score(performance_score: u8) -> CoreMetrics {
    let deficit = u32::from(100_u8.saturating_sub(performance_score));

    CoreMetrics {
        first_contentful_paint_ms: 800 + 28 * deficit,
        largest_contentful_paint_ms: 1_200 + 45 * deficit,
        speed_index_ms: 1_400 + 50 * deficit,
        total_blocking_time_ms: 20 + 9 * deficit,
        cumulative_layout_shift: round_to_thousandths(0.01 + f64::from(deficit) * 0.0035),
    }
}

/// `base + (hash / divisor) % span`, capped at 100.
fn secondary_score(hash: u32, divisor: u32, base: u8, span: u32) -> u8 {
    let offset = u8::try_from((hash / divisor) % span).unwrap_or(0);
    base.saturating_add(offset).min(100)
}

fn round_to_thousandths(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}
