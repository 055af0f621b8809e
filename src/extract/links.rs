//! List-page link extraction and pagination signals
//!
//! Listing links always take the `/a/show/<id>` form; the numeric id is
//! the canonical identity, so links are deduplicated by id with the order
//! of first appearance preserved. The next-page signal is the presence of
//! an enabled "next" control inside the paginator nav.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

static LISTING_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href=["'][^"']*?/a/show/(\d+)[^"']*["']"#).expect("valid regex")
});

static LISTING_ID_IN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/a/show/(\d+)").expect("valid regex"));

/// Extracts canonical listing URLs from a list page
///
/// # Arguments
///
/// * `html` - Raw list-page markup
/// * `base_url` - Site base the canonical URLs are rebuilt against
///
/// # Returns
///
/// Canonical listing URLs, deduplicated by listing id, order of first
/// appearance preserved.
pub fn extract_listing_links(html: &str, base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in LISTING_HREF.captures_iter(html) {
        let id = &caps[1];
        if seen.insert(id.to_string()) {
            links.push(format!("{base}/a/show/{id}"));
        }
    }

    links
}

/// Parses the numeric listing id out of a listing URL.
pub fn listing_id(url: &str) -> Option<u64> {
    LISTING_ID_IN_URL
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
}

/// Checks whether the list page advertises a further page: an enabled
/// next-button inside the paginator nav.
pub fn has_next_page(html: &str) -> bool {
    let document = Html::parse_document(html);

    let nav = match Selector::parse("nav.paginator") {
        Ok(s) => s,
        Err(_) => return false,
    };
    let next = match Selector::parse("a.paginator__btn--next") {
        Ok(s) => s,
        Err(_) => return false,
    };

    document
        .select(&nav)
        .flat_map(|n| n.select(&next))
        .any(|btn| btn.value().attr("disabled").is_none())
}
