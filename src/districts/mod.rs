//! District registry and resolution
//!
//! This module maps free-text address phrases to canonical district slugs.
//!
//! # Components
//!
//! - `District`: a canonical district identifier with its known name variants
//! - `registry`: the static slug → alias tables for Almaty and Astana
//! - `resolve_district`: anchored-pattern matching over raw address text

mod registry;
mod resolve;

pub use registry::{all_districts, city_districts, find_district, District};
pub use resolve::resolve_district;

use serde::{Deserialize, Serialize};

/// A supported source city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Almaty,
    Astana,
}

impl City {
    /// The URL path slug used in city-scoped listing URLs
    pub fn slug(&self) -> &'static str {
        match self {
            City::Almaty => "almaty",
            City::Astana => "astana",
        }
    }

    /// The Russian display name as it appears on listing pages
    pub fn label(&self) -> &'static str {
        match self {
            City::Almaty => "Алматы",
            City::Astana => "Астана",
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
