//! Record assembly and district filtering
//!
//! `assemble` is deterministic for identical input markup: it runs every
//! field extractor, merges the results and stamps the extraction time.
//! Network access, phone reveal and challenge handling stay with the
//! orchestrator.

use super::ListingRecord;
use crate::districts::{self, City, District};
use crate::extract::{self, PageText};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static MICRODISTRICT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:мкр|микрорайон)\.?\s+([\w\- ]{2,40}?)(?:\s*[,·\n]|$)")
        .expect("valid regex")
});

/// Assembles a listing record from a detail page.
pub fn assemble(html: &str, city: City, source_url: &str) -> ListingRecord {
    let document = Html::parse_document(html);
    let page = PageText::from_html(html);

    let title = extract_title(&document);
    let title_facts = title
        .as_deref()
        .map(extract::parse_title)
        .unwrap_or_default();

    let address = extract_address(&page);
    let district = address
        .as_deref()
        .and_then(districts::resolve_district)
        .map(|d| d.slug.to_string());

    let price_raw = extract::find_price_text(&page);
    let price_kzt = price_raw.as_deref().and_then(extract::parse_price);

    let description_raw = extract::extract_description(&page);
    let description = description_raw
        .as_deref()
        .map(extract::clean_description)
        .filter(|d| !d.is_empty());

    let microdistrict = derive_microdistrict(title.as_deref(), address.as_deref());

    let text = &page.text;

    ListingRecord {
        url: source_url.to_string(),
        listing_id: extract::listing_id(source_url),
        city,
        address,
        district,
        microdistrict,
        price_raw,
        price_kzt,
        rooms: title_facts.rooms.or_else(|| extract::params::rooms(text)),
        area_total: title_facts
            .area_total
            .or_else(|| extract::params::area_total(text)),
        kitchen_area: extract::params::kitchen_area(text),
        floor: title_facts
            .floor
            .or_else(|| extract::params::floor_of_total(text).map(|(f, _)| f)),
        floors_total: title_facts
            .floors_total
            .or_else(|| extract::params::floor_of_total(text).map(|(_, t)| t)),
        year_built: extract::params::year_built(text),
        building_type: extract::params::building_type(text),
        condition: extract::params::condition(text),
        ceiling_height: extract::params::ceiling_height(text),
        furnishing: extract::params::furnishing(text),
        parking: extract::params::parking(text),
        bathroom: extract::params::bathroom(text),
        title,
        description_raw,
        description,
        phones: None,
        phone_status: "pending".to_string(),
        extracted_at: Utc::now(),
    }
}

/// The filter-by-confirmation district check.
///
/// List pages scoped to a district are observed to leak out-of-district
/// listings, so membership must be confirmed from the detail page itself.
/// With no requested district every record passes; with one, a record
/// passes only when its resolved district agrees or a curated alias of the
/// requested district appears in the address text.
pub fn matches_district(record: &ListingRecord, requested: Option<&District>) -> bool {
    let requested = match requested {
        Some(d) => d,
        None => return true,
    };

    let resolved = match record.district.as_deref() {
        Some(slug) => slug,
        None => return false,
    };

    if resolved == requested.slug {
        return true;
    }

    // Canonical names containing each other (either direction) still count
    // as agreement; slugs differing only by city prefix are caught above.
    if let Some(resolved_district) = districts::all_districts().find(|d| d.slug == resolved) {
        let a = resolved_district.canonical_name().to_lowercase();
        let b = requested.canonical_name().to_lowercase();
        if a.contains(&b) || b.contains(&a) {
            return true;
        }
    }

    if let Some(address) = record.address.as_deref() {
        let address = address.to_lowercase();
        if requested
            .aliases
            .iter()
            .any(|alias| address.contains(&alias.to_lowercase()))
        {
            return true;
        }
    }

    false
}

/// Title from the `<h1>`, falling back to the `<title>` tag with the site
/// suffix cut off.
fn extract_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("h1") {
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split(" — ")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty())
}

/// Address line: the first line after the "Город" marker that is not a
/// map-control caption, falling back to any short line with the district
/// marker.
fn extract_address(page: &PageText) -> Option<String> {
    if let Some(idx) = page.text.find("Город") {
        let chunk: String = page.text[idx..].chars().take(200).collect();
        for line in chunk.lines().skip(1).take(4) {
            let line = line.replace("показать на карте", "");
            let line = line.trim();
            if !line.is_empty() {
                return Some(line.to_string());
            }
        }
    }

    page.text
        .lines()
        .map(str::trim)
        .find(|line| line.contains("р-н") && line.chars().count() < 100)
        .map(str::to_string)
}

fn derive_microdistrict(title: Option<&str>, address: Option<&str>) -> Option<String> {
    for source in [title, address].into_iter().flatten() {
        if let Some(caps) = MICRODISTRICT.captures(source) {
            let name = caps[1].trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}
