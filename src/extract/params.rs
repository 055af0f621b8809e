//! Anchored parameter extraction
//!
//! Listing parameter rows have no stable markup, but their label phrases
//! are stable ("Год постройки", "Площадь кухни", ...). Each extractor
//! anchors on a label and reads a typed token within a bounded lookahead
//! window, rejecting values outside a sane range.

use once_cell::sync::Lazy;
use regex::Regex;

const YEAR_MIN: u32 = 1900;
const YEAR_MAX: u32 = 2030;

/// Lookahead window (in characters) after an anchor phrase.
const WINDOW: usize = 60;

static YEAR_BUILT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)год\s+постройки\D{0,20}(\d{4})").expect("valid regex"));

static KITCHEN_AREA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)площадь\s+кухни[^\d]{0,20}(\d+(?:[.,]\d+)?)").expect("valid regex")
});

static CEILING_HEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)потолки[^\d]{0,20}(\d(?:[.,]\d+)?)\s*м").expect("valid regex"));

static ROOMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*комнат").expect("valid regex"));

static FLOOR_OF_TOTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s+из\s+(\d+)").expect("valid regex"));

static AREA_TOTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)площадь[^\d]{0,20}(\d+(?:[.,]\d+)?)\s*м²").expect("valid regex")
});

static BUILDING_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(кирпичн\w*|панельн\w*|монолитн\w*|каркасно[\s-]камышитов\w*)")
        .expect("valid regex")
});

static CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(свежий ремонт|не новый, но аккуратный ремонт|требует ремонта|черновая отделка|без ремонта)",
    )
    .expect("valid regex")
});

static FURNISHING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(полностью|частично|без мебели)").expect("valid regex"));

static PARKING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(паркинг|гараж|стоянка)").expect("valid regex"));

static BATHROOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(раздельный|совмещенный|совмещённый|2\s*с/у и более)").expect("valid regex")
});

/// Returns up to `WINDOW` characters of text following the first
/// (case-insensitive) occurrence of `anchor`, or `None` when the anchor
/// phrase is absent.
fn window_after(text: &str, anchor: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let needle = anchor.to_lowercase();
    let idx = lower.find(&needle)?;
    // The byte index is valid in the lowercased haystack only, so the
    // window is taken there; anchors and tokens are case-folded anyway.
    let tail = &lower[idx + needle.len()..];
    Some(tail.chars().take(WINDOW).collect())
}

pub fn year_built(text: &str) -> Option<u32> {
    YEAR_BUILT
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y))
}

pub fn kitchen_area(text: &str) -> Option<f64> {
    KITCHEN_AREA
        .captures(text)
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok())
        .filter(|a| (2.0..=100.0).contains(a))
}

pub fn ceiling_height(text: &str) -> Option<f64> {
    CEILING_HEIGHT
        .captures(text)
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok())
        .filter(|h| (2.0..=6.0).contains(h))
}

/// Room count from a parameter row ("5 комнат"); title parsing is the
/// preferred source, this is the fallback.
pub fn rooms(text: &str) -> Option<u32> {
    ROOMS
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|r| (1..=20).contains(r))
}

pub fn area_total(text: &str) -> Option<f64> {
    AREA_TOTAL
        .captures(text)
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok())
        .filter(|a| (5.0..=1000.0).contains(a))
}

/// Floor and floor count from the "3 из 9" parameter form.
pub fn floor_of_total(text: &str) -> Option<(u32, u32)> {
    let caps = FLOOR_OF_TOTAL.captures(text)?;
    let floor = caps[1].parse::<u32>().ok()?;
    let total = caps[2].parse::<u32>().ok()?;
    if floor >= 1 && floor <= total && total <= 100 {
        Some((floor, total))
    } else {
        None
    }
}

pub fn building_type(text: &str) -> Option<String> {
    let window = window_after(text, "тип дома")?;
    BUILDING_TYPE.captures(&window).map(|c| c[1].to_string())
}

pub fn condition(text: &str) -> Option<String> {
    let window = window_after(text, "состояние")?;
    CONDITION.captures(&window).map(|c| c[1].to_string())
}

pub fn furnishing(text: &str) -> Option<String> {
    let window = window_after(text, "мебел")?;
    FURNISHING.captures(&window).map(|c| c[1].to_string())
}

pub fn parking(text: &str) -> Option<String> {
    let window = window_after(text, "парков")
        .or_else(|| window_after(text, "паркинг"))?;
    PARKING.captures(&window).map(|c| c[1].to_string())
}

pub fn bathroom(text: &str) -> Option<String> {
    let window = window_after(text, "санузел")?;
    BATHROOM.captures(&window).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_built_in_range() {
        assert_eq!(year_built("Год постройки 2015"), Some(2015));
        assert_eq!(year_built("год постройки: 1968"), Some(1968));
    }

    #[test]
    fn test_year_built_out_of_range() {
        assert_eq!(year_built("Год постройки 1899"), None);
        assert_eq!(year_built("Год постройки 2031"), None);
    }

    #[test]
    fn test_year_built_absent() {
        assert_eq!(year_built("квартира в новом доме"), None);
    }

    #[test]
    fn test_kitchen_area() {
        assert_eq!(kitchen_area("Площадь кухни 12.5 м²"), Some(12.5));
        assert_eq!(kitchen_area("площадь кухни — 9,1"), Some(9.1));
        assert_eq!(kitchen_area("кухня хорошая"), None);
    }

    #[test]
    fn test_ceiling_height() {
        assert_eq!(ceiling_height("Потолки 2.7 м"), Some(2.7));
        assert_eq!(ceiling_height("Потолки 9 м"), None);
    }

    #[test]
    fn test_floor_of_total() {
        assert_eq!(floor_of_total("Этаж 3 из 9"), Some((3, 9)));
        assert_eq!(floor_of_total("Этаж 12 из 9"), None);
    }

    #[test]
    fn test_building_type_window_bounded() {
        assert_eq!(
            building_type("Тип дома: монолитный").as_deref(),
            Some("монолитный")
        );
        // Token far beyond the window must not be picked up.
        let distant = format!("Тип дома {} кирпичный", "х".repeat(200));
        assert_eq!(building_type(&distant), None);
    }

    #[test]
    fn test_condition_and_furnishing() {
        assert_eq!(
            condition("Состояние: свежий ремонт").as_deref(),
            Some("свежий ремонт")
        );
        assert_eq!(
            furnishing("Мебель полностью").as_deref(),
            Some("полностью")
        );
    }

    #[test]
    fn test_bathroom_and_parking() {
        assert_eq!(
            bathroom("Санузел раздельный").as_deref(),
            Some("раздельный")
        );
        assert_eq!(parking("Парковка: гараж").as_deref(), Some("гараж"));
    }
}
