//! Title decomposition
//!
//! Listing titles follow the loose form
//! "2-комнатная квартира · 45 м² · 3/9 этаж". Three independent
//! sub-patterns pull rooms, area and floor/floor-count; each is optional,
//! so a partial title yields a partial result, never a failure.

use once_cell::sync::Lazy;
use regex::Regex;

static ROOMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)-комнатн").expect("valid regex"));

static AREA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*м²").expect("valid regex"));

static FLOOR_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)/(\d+)\s*этаж").expect("valid regex"));

/// Structural facts recovered from a listing title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleFacts {
    pub rooms: Option<u32>,
    pub area_total: Option<f64>,
    pub floor: Option<u32>,
    pub floors_total: Option<u32>,
}

/// Decomposes a free-text title into structural facts.
pub fn parse_title(title: &str) -> TitleFacts {
    let rooms = ROOMS
        .captures(title)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|r| (1..=20).contains(r));

    let area_total = AREA
        .captures(title)
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok())
        .filter(|a| (5.0..=1000.0).contains(a));

    let (floor, floors_total) = match FLOOR_PAIR.captures(title) {
        Some(c) => {
            let f = c[1].parse::<u32>().ok();
            let t = c[2].parse::<u32>().ok();
            match (f, t) {
                (Some(f), Some(t)) if f >= 1 && f <= t && t <= 100 => (Some(f), Some(t)),
                _ => (None, None),
            }
        }
        None => (None, None),
    };

    TitleFacts {
        rooms,
        area_total,
        floor,
        floors_total,
    }
}
