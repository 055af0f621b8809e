//! Field extractors for listing pages
//!
//! Every extractor is a pure function over page text: it returns an
//! `Option` and never fails on malformed input; a missing field is a
//! normal "no value" outcome. The anchor phrases and patterns live in
//! this module only, so they can be swapped for another source site
//! without touching the orchestrator.
//!
//! # Components
//!
//! - `price`: price-fragment location and digit-concatenation parsing
//! - `title`: room/area/floor decomposition of the free-text title
//! - `params`: anchored label → typed token extraction with sanity ranges
//! - `description`: two-strategy description recovery plus garbage cleaning
//! - `phone`: tel: link harvesting and challenge detection
//! - `links`: listing-URL and pagination-control extraction from list pages

pub mod description;
pub mod links;
pub mod params;
pub mod phone;
pub mod price;
pub mod title;

pub use description::{clean_description, extract_description};
pub use links::{extract_listing_links, has_next_page, listing_id};
pub use phone::{extract_phones, has_challenge};
pub use price::{find_price_text, parse_price};
pub use title::{parse_title, TitleFacts};

/// The text view of one listing page that extractors operate on.
///
/// `text` is the full visible text with newline separators; `blocks` holds
/// the per-element texts of the block-level nodes (div/p), which the
/// description extractor scans independently.
#[derive(Debug, Clone, Default)]
pub struct PageText {
    pub text: String,
    pub blocks: Vec<String>,
}

impl PageText {
    /// Builds the text view from raw HTML.
    pub fn from_html(html: &str) -> Self {
        use scraper::{Html, Selector};

        let document = Html::parse_document(html);

        let text = document
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let mut blocks = Vec::new();
        if let Ok(selector) = Selector::parse("div, p") {
            for element in document.select(&selector) {
                let block = element
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !block.is_empty() {
                    blocks.push(block);
                }
            }
        }

        Self { text, blocks }
    }

    /// Builds a view directly from parts; used by tests and replay tooling.
    pub fn from_parts(text: impl Into<String>, blocks: Vec<String>) -> Self {
        Self {
            text: text.into(),
            blocks,
        }
    }
}
