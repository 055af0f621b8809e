//! Phone harvesting and challenge detection
//!
//! Revealed phone numbers appear as `tel:` links in the page markup. The
//! challenge predicate recognizes the captcha signatures that gate the
//! reveal; actually solving a challenge is an external capability.

use once_cell::sync::Lazy;
use regex::Regex;

static TEL_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href=["']tel:([^"']+)["']"#).expect("valid regex"));

static CHALLENGE_IFRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<iframe[^>]+src=["'][^"']*(?:recaptcha|captcha)[^"']*["']"#)
        .expect("valid regex")
});

/// Extracts normalized phone numbers from `tel:` links, deduplicated in
/// order of first appearance. Only digits and a leading `+` survive
/// normalization.
pub fn extract_phones(html: &str) -> Vec<String> {
    let mut phones = Vec::new();

    for caps in TEL_HREF.captures_iter(html) {
        let normalized: String = caps[1]
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        if !normalized.is_empty() && !phones.contains(&normalized) {
            phones.push(normalized);
        }
    }

    phones
}

/// Challenge-detection predicate: a captcha iframe or a g-recaptcha
/// element signature on the page.
pub fn has_challenge(html: &str) -> bool {
    CHALLENGE_IFRAME.is_match(html) || html.contains("g-recaptcha")
}
