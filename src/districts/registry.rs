//! Static district alias tables
//!
//! The slugs double as URL path segments on district-scoped listing pages,
//! which is why Baikonur keeps its irregular `r-n-bajkonur` form. The first
//! alias in each list is the canonical name; the rest are the variants
//! observed in address strings.

use super::City;

/// A canonical district identifier with its known name variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct District {
    /// Canonical slug, also the URL path segment
    pub slug: &'static str,

    /// The city this district belongs to
    pub city: City,

    /// Name variants, canonical name first
    pub aliases: &'static [&'static str],
}

impl District {
    /// The canonical (first-listed) name variant
    pub fn canonical_name(&self) -> &'static str {
        self.aliases[0]
    }
}

pub const ALMATY_DISTRICTS: &[District] = &[
    District {
        slug: "almaty-alatauskij",
        city: City::Almaty,
        aliases: &["Алатауский", "Алатауский район", "Алатауский р-н"],
    },
    District {
        slug: "almaty-almalinskij",
        city: City::Almaty,
        aliases: &["Алмалинский", "Алмалинский район", "Алмалинский р-н"],
    },
    District {
        slug: "almaty-aujezovskij",
        city: City::Almaty,
        aliases: &["Ауэзовский", "Ауэзовский район", "Ауэзовский р-н"],
    },
    District {
        slug: "almaty-bostandykskij",
        city: City::Almaty,
        aliases: &["Бостандыкский", "Бостандыкский район", "Бостандыкский р-н"],
    },
    District {
        slug: "almaty-zhetysuskij",
        city: City::Almaty,
        aliases: &["Жетысуский", "Жетысуский район", "Жетысуский р-н"],
    },
    District {
        slug: "almaty-medeuskij",
        city: City::Almaty,
        aliases: &["Медеуский", "Медеуский район", "Медеуский р-н"],
    },
    District {
        slug: "almaty-nauryzbajskiy",
        city: City::Almaty,
        aliases: &["Наурызбайский", "Наурызбайский район", "Наурызбайский р-н"],
    },
    District {
        slug: "almaty-turksibskij",
        city: City::Almaty,
        aliases: &["Турксибский", "Турксибский район", "Турксибский р-н"],
    },
];

pub const ASTANA_DISTRICTS: &[District] = &[
    District {
        slug: "astana-almatinskij",
        city: City::Astana,
        aliases: &["Алматы", "Алматы район", "Алматы р-н"],
    },
    District {
        slug: "astana-esilskij",
        city: City::Astana,
        aliases: &["Есильский", "Есильский район", "Есильский р-н", "Есиль"],
    },
    District {
        slug: "astana-nura",
        city: City::Astana,
        aliases: &["Нуринский", "Нуринский район", "Нуринский р-н", "Нура"],
    },
    District {
        slug: "astana-saryarkinskij",
        city: City::Astana,
        aliases: &[
            "Сарыаркинский",
            "Сарыаркинский район",
            "Сарыаркинский р-н",
            "Сарыарка",
        ],
    },
    District {
        slug: "r-n-bajkonur",
        city: City::Astana,
        aliases: &[
            "Байконурский",
            "Байконурский район",
            "Байконурский р-н",
            "Байконур",
        ],
    },
    District {
        slug: "astana-saraishyk",
        city: City::Astana,
        aliases: &["Сарайшық", "Сарайшықский", "Сарайшық район", "Сарайшық р-н"],
    },
];

/// Iterates over every known district across all cities
pub fn all_districts() -> impl Iterator<Item = &'static District> {
    ALMATY_DISTRICTS.iter().chain(ASTANA_DISTRICTS.iter())
}

/// Returns the districts belonging to one city
pub fn city_districts(city: City) -> &'static [District] {
    match city {
        City::Almaty => ALMATY_DISTRICTS,
        City::Astana => ASTANA_DISTRICTS,
    }
}

/// Looks up a district by slug
///
/// # Arguments
///
/// * `city` - The city whose districts are searched
/// * `name` - Full slug, or the short form without the city prefix
///   (e.g. `bostandykskij`, `bajkonur`)
///
/// # Returns
///
/// * `Some(&District)` - The matching registry entry
/// * `None` - No district of that city carries the name
pub fn find_district(city: City, name: &str) -> Option<&'static District> {
    let name = name.trim().to_lowercase();

    city_districts(city).iter().find(|d| {
        d.slug == name
            || d.slug == format!("{}-{}", city.slug(), name)
            || (d.slug == "r-n-bajkonur" && name == "bajkonur")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sizes() {
        assert_eq!(ALMATY_DISTRICTS.len(), 8);
        assert_eq!(ASTANA_DISTRICTS.len(), 6);
        assert_eq!(all_districts().count(), 14);
    }

    #[test]
    fn test_find_by_full_slug() {
        let d = find_district(City::Almaty, "almaty-bostandykskij").unwrap();
        assert_eq!(d.canonical_name(), "Бостандыкский");
    }

    #[test]
    fn test_find_by_short_form() {
        let d = find_district(City::Almaty, "bostandykskij").unwrap();
        assert_eq!(d.slug, "almaty-bostandykskij");

        let d = find_district(City::Astana, "esilskij").unwrap();
        assert_eq!(d.slug, "astana-esilskij");
    }

    #[test]
    fn test_find_bajkonur_irregular_slug() {
        let d = find_district(City::Astana, "bajkonur").unwrap();
        assert_eq!(d.slug, "r-n-bajkonur");
    }

    #[test]
    fn test_find_wrong_city() {
        assert!(find_district(City::Astana, "bostandykskij").is_none());
    }

    #[test]
    fn test_every_district_has_aliases() {
        for d in all_districts() {
            assert!(!d.aliases.is_empty(), "{} has no aliases", d.slug);
        }
    }
}
