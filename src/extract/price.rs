//! Price extraction
//!
//! Prices on listing pages carry the tenge mark and grouping spaces
//! ("54 999 000 〒"). Location and parsing are separate steps: first find
//! the most plausible price fragment, then concatenate its digits.

use super::PageText;
use once_cell::sync::Lazy;
use regex::Regex;

/// Price fragments longer than this are assumed to be running text that
/// merely mentions a price.
const MAX_FRAGMENT_LEN: usize = 50;

static PRICE_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d\s]*(?:млн)?\s*〒)").expect("valid regex"));

/// Locates the raw price fragment on a page.
///
/// Prefers a short block containing the tenge mark and at least one digit;
/// falls back to a pattern search over the full text.
pub fn find_price_text(page: &PageText) -> Option<String> {
    for block in &page.blocks {
        if block.contains('〒')
            && block.chars().count() < MAX_FRAGMENT_LEN
            && block.chars().any(|c| c.is_ascii_digit())
        {
            return Some(block.clone());
        }
    }

    PRICE_IN_TEXT
        .captures(&page.text)
        .map(|caps| caps[1].trim().to_string())
}

/// Parses a price fragment into integer tenge.
///
/// All non-digit characters are stripped and the remaining digits are read
/// in order; a fragment with no digits yields `None`.
pub fn parse_price(fragment: &str) -> Option<i64> {
    let digits: String = fragment.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_with_grouping_spaces() {
        assert_eq!(parse_price("54 999 000〒"), Some(54_999_000));
        assert_eq!(parse_price("54 999 000 〒"), Some(54_999_000));
    }

    #[test]
    fn test_parse_price_plain_digits() {
        assert_eq!(parse_price("12500000"), Some(12_500_000));
    }

    #[test]
    fn test_parse_price_no_digits() {
        assert_eq!(parse_price("договорная"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("〒"), None);
    }

    #[test]
    fn test_parse_price_digits_concatenated_in_order() {
        // Mixed separators still read digit-by-digit in order.
        assert_eq!(parse_price("1 2.3,4〒"), Some(1234));
    }

    #[test]
    fn test_find_price_prefers_short_block() {
        let page = PageText::from_parts(
            "шум",
            vec![
                "Описание квартиры без цены".to_string(),
                "54 999 000 〒".to_string(),
            ],
        );
        assert_eq!(find_price_text(&page).as_deref(), Some("54 999 000 〒"));
    }

    #[test]
    fn test_find_price_skips_long_blocks() {
        let long = format!("{} 10 000 000 〒", "а".repeat(80));
        let page = PageText::from_parts("", vec![long]);
        // Long block rejected, no pattern in full text either.
        assert_eq!(find_price_text(&page), None);
    }

    #[test]
    fn test_find_price_fallback_to_full_text() {
        let page = PageText::from_parts("Продам квартиру за 33 500 000 〒 срочно", vec![]);
        let found = find_price_text(&page).unwrap();
        assert_eq!(parse_price(&found), Some(33_500_000));
    }
}
