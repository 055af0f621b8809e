//! District resolution from raw address text
//!
//! Three anchored patterns are tried in order, matching the forms the site
//! actually emits: "р-н Байконур", "Алматы р-н", and the bare adjective
//! "Бостандыкский". Each extracted candidate is checked against the alias
//! registry; an exact canonical-name hit always wins over a substring hit,
//! so similarly prefixed district adjectives cannot shadow each other.

use super::registry::{all_districts, District};
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_AFTER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"р-н\s+([\w\-]+)").expect("valid regex"));

static NAME_BEFORE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w\-]+)\s+р-н").expect("valid regex"));

static ADJECTIVE_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+(?:ий|ый|ой))\s*(?:район|р-н)?").expect("valid regex"));

/// Resolves raw address text to a canonical district.
///
/// Returns `None` when no registered district matches; resolution failure
/// is a normal outcome, not an error.
pub fn resolve_district(address: &str) -> Option<&'static District> {
    if let Some(caps) = NAME_AFTER_MARKER.captures(address) {
        if let Some(d) = match_alias(&caps[1]) {
            return Some(d);
        }
    }

    if let Some(caps) = NAME_BEFORE_MARKER.captures(address) {
        if let Some(d) = match_alias(&caps[1]) {
            return Some(d);
        }
    }

    if let Some(caps) = ADJECTIVE_FORM.captures(address) {
        if let Some(d) = match_alias(&caps[1]) {
            return Some(d);
        }
    }

    None
}

/// Matches one extracted name candidate against the registry.
///
/// Pass 1: exact (case-insensitive) equality with a canonical name.
/// Pass 2: substring containment in either direction against any alias,
/// first hit in registry order wins.
fn match_alias(candidate: &str) -> Option<&'static District> {
    let candidate = candidate.to_lowercase();
    if candidate.len() < 4 {
        // Too short to be a district name; avoids matching stray particles.
        return None;
    }

    for district in all_districts() {
        if district.canonical_name().to_lowercase() == candidate {
            return Some(district);
        }
    }

    for district in all_districts() {
        for alias in district.aliases {
            let alias = alias.to_lowercase();
            if alias.contains(&candidate) || candidate.contains(&alias) {
                return Some(district);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_marker_before_name() {
        let d = resolve_district("Астана, р-н Байконур, ул. Иманова 12").unwrap();
        assert_eq!(d.slug, "r-n-bajkonur");
    }

    #[test]
    fn test_resolve_name_before_marker() {
        let d = resolve_district("Астана, Алматы р-н").unwrap();
        assert_eq!(d.slug, "astana-almatinskij");
    }

    #[test]
    fn test_resolve_adjective_form() {
        let d = resolve_district("Бостандыкский район, мкр Орбита-1").unwrap();
        assert_eq!(d.slug, "almaty-bostandykskij");

        let d = resolve_district("Алматы, Медеуский р-н").unwrap();
        assert_eq!(d.slug, "almaty-medeuskij");
    }

    #[test]
    fn test_resolve_short_astana_alias() {
        let d = resolve_district("р-н Есиль, ул. Мангилик Ел").unwrap();
        assert_eq!(d.slug, "astana-esilskij");
    }

    #[test]
    fn test_resolve_unknown_address() {
        assert!(resolve_district("ул. Абая 10, без района").is_none());
        assert!(resolve_district("").is_none());
    }

    #[test]
    fn test_exact_canonical_beats_substring() {
        // "Алатауский" must not be shadowed by any alias that merely
        // contains a shared stem.
        let d = resolve_district("Алатауский р-н").unwrap();
        assert_eq!(d.slug, "almaty-alatauskij");
    }
}
