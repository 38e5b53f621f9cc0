//! Numeric reading of free-form price strings.

use std::sync::LazyLock;

use regex::Regex;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,]*").expect("valid number regex"));

/// Reads the first numeric token out of a free-form price.
///
/// `"$10/mo"` → `10.0`, `"From $1,299.00 per year"` → `1299.0`,
/// `"€9,99"` → `9.99`, `"1.299,00 €"` → `1299.0`, `"€1.000"` → `1000.0`.
/// Strings without digits (`"N/A"`, `"Contact us"`, `"Free"`) yield `None`.
/// Currency and billing period are ignored.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let token = NUMBER_RE
        .find(raw)?
        .as_str()
        .trim_end_matches([',', '.']);

    // The last separator is the decimal point unless exactly three digits
    // follow it; every other separator groups thousands.
    let normalized = match token.rfind([',', '.']) {
        Some(pos) if token.len() - pos - 1 != 3 => {
            let (whole, fraction) = token.split_at(pos);
            format!("{}.{}", strip_separators(whole), &fraction[1..])
        }
        _ => strip_separators(token),
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn strip_separators(digits: &str) -> String {
    digits.chars().filter(char::is_ascii_digit).collect()
}
