//! Keyword-based category suggestions

/// Category used when no keyword matches
pub const FALLBACK_CATEGORY: &str = "Miscellaneous";

const RULES: &[(&[&str], &str)] = &[
    (&["grocery", "supermarket"], "Groceries"),
    (&["restaurant", "cafe"], "Dining"),
    (&["gas", "fuel"], "Transportation"),
    (&["doctor", "pharmacy"], "Healthcare"),
    (&["rent", "mortgage"], "Housing"),
    (&["internet", "phone"], "Utilities"),
];

/// Suggest a category from a free-text description
///
/// Rules are checked in order; the first keyword found (case-insensitive,
/// anywhere in the text) wins.
pub fn suggest_category(description: &str) -> &'static str {
    let text = description.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rules() {
        assert_eq!(suggest_category("Weekly GROCERY run"), "Groceries");
        assert_eq!(suggest_category("Cafe Luna"), "Dining");
        assert_eq!(suggest_category("Shell fuel"), "Transportation");
        assert_eq!(suggest_category("Pharmacy"), "Healthcare");
        assert_eq!(suggest_category("March rent"), "Housing");
        assert_eq!(suggest_category("Phone bill"), "Utilities");
        assert_eq!(suggest_category("Birthday gift"), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_first_rule_wins() {
        // Contains both "supermarket" and "gas"
        assert_eq!(suggest_category("Supermarket gas station"), "Groceries");
    }
}
