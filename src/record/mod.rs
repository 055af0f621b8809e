//! Listing records and their assembly
//!
//! # Components
//!
//! - `ListingRecord`: one scraped listing, every extracted field optional
//! - `assemble`: runs all field extractors over one page and merges results
//! - `matches_district`: the filter-by-confirmation district check

mod assembler;

pub use assembler::{assemble, matches_district};

use crate::districts::City;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped listing.
///
/// Absence of a structural or commercial field is a normal outcome, not an
/// error; only records with neither title nor description are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    // Identity
    pub url: String,
    pub listing_id: Option<u64>,

    // Location
    pub city: City,
    pub address: Option<String>,
    pub district: Option<String>,
    pub microdistrict: Option<String>,

    // Commercial
    pub price_raw: Option<String>,
    pub price_kzt: Option<i64>,

    // Structural
    pub rooms: Option<u32>,
    pub area_total: Option<f64>,
    pub kitchen_area: Option<f64>,
    pub floor: Option<u32>,
    pub floors_total: Option<u32>,
    pub year_built: Option<u32>,
    pub building_type: Option<String>,
    pub condition: Option<String>,
    pub ceiling_height: Option<f64>,
    pub furnishing: Option<String>,
    pub parking: Option<String>,
    pub bathroom: Option<String>,

    // Text
    pub title: Option<String>,
    pub description_raw: Option<String>,
    pub description: Option<String>,

    // Contact
    pub phones: Option<String>,
    pub phone_status: String,

    // Provenance: stamped at extraction time, not at flush time
    pub extracted_at: DateTime<Utc>,
}

impl ListingRecord {
    /// A record with neither title nor description carries too little
    /// signal to persist.
    pub fn has_signal(&self) -> bool {
        self.title.as_deref().map_or(false, |t| !t.is_empty())
            || self.description.as_deref().map_or(false, |d| !d.is_empty())
            || self
                .description_raw
                .as_deref()
                .map_or(false, |d| !d.is_empty())
    }
}
