//! Extraction prompt for the chat-completion model.

/// System message: role plus the exact reply shape.
pub const SYSTEM_PROMPT: &str = "You extract conversion and pricing facts from website text. \
Reply with a single JSON object with exactly these keys and no others: \
mainHeadline (string), hasPricing (boolean), pricingStartsFrom (string), \
hasDiscount (boolean), hasFreeTrial (boolean).";

/// Rules the model must follow when reading prices and promotions.
const RULES: &str = "\
Rules:
1. mainHeadline is the primary hero headline of the page, verbatim.
2. hasPricing is true only if concrete prices or plan tiers are shown.
3. pricingStartsFrom is the lowest FINAL price of a paid tier, including currency and billing period (e.g. \"$10/mo\"). Use \"N/A\" if no price is shown.
4. Ignore struck-through prices and prices labelled \"was\", \"regular\" or \"before\".
5. When a plan shows an original and a discounted price, use the discounted price.
6. \"Free trial\" is not a price. A free tier is only a price if it is a permanent plan.
7. hasDiscount is true only when two prices are shown for the same plan, or an explicit percentage-off, coupon or promotional banner appears. Annual-versus-monthly billing differences alone are NOT a discount.
8. hasFreeTrial is true only if a time-limited free trial is offered.";

/// Builds the user message for one page.
#[must_use]
pub fn build_user_prompt(url: &str, page_text: &str) -> String {
    format!("{RULES}\n\nURL: {url}\n\nPage text:\n{page_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_contains_url_rules_and_text() {
        let prompt = build_user_prompt("https://example.com", "Plans from $9/mo");
        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains("struck-through"));
        assert!(prompt.contains("Annual-versus-monthly"));
        assert!(prompt.ends_with("Plans from $9/mo"));
    }

    #[test]
    fn system_prompt_names_all_five_fields() {
        for key in [
            "mainHeadline",
            "hasPricing",
            "pricingStartsFrom",
            "hasDiscount",
            "hasFreeTrial",
        ] {
            assert!(SYSTEM_PROMPT.contains(key), "missing {key}");
        }
    }
}
