//! The fixed category table driving every crawl.
//!
//! The storefront exposes eight top-level categories; the crawler never
//! discovers categories dynamically. Identity is the display name.

/// One top-level product grouping on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display name, e.g. `"Furniture Sets"`. Also the value breadcrumb
    /// entries are matched against.
    pub name: &'static str,
    /// Absolute URL of the category listing page.
    pub url: &'static str,
    /// URL path segment identifying the category (`/sg/<segment>/...`).
    pub path_segment: &'static str,
}

/// The eight crawl targets, in output order.
pub static CATEGORIES: [Category; 8] = [
    Category {
        name: "Sofas",
        url: "https://www.castlery.com/sg/sofas/all-sofas",
        path_segment: "sofas",
    },
    Category {
        name: "Tables",
        url: "https://www.castlery.com/sg/tables/all-tables",
        path_segment: "tables",
    },
    Category {
        name: "Chairs",
        url: "https://www.castlery.com/sg/chairs/all-chairs",
        path_segment: "chairs",
    },
    Category {
        name: "Beds",
        url: "https://www.castlery.com/sg/beds/all-bedroom",
        path_segment: "beds",
    },
    Category {
        name: "Storage",
        url: "https://www.castlery.com/sg/storage/all-storage",
        path_segment: "storage",
    },
    Category {
        name: "Furniture Sets",
        url: "https://www.castlery.com/sg/furniture-sets/all-furniture-sets",
        path_segment: "furniture-sets",
    },
    Category {
        name: "Outdoor",
        url: "https://www.castlery.com/sg/outdoor/all-outdoor",
        path_segment: "outdoor",
    },
    Category {
        name: "Accessories",
        url: "https://www.castlery.com/sg/accessories/all-accessories",
        path_segment: "accessories",
    },
];

/// Resolves a page path (or full URL) to the category whose path segment it
/// contains, e.g. `/sg/tables/dining-tables/seb-table` → `Tables`.
///
/// Longer segments are matched first so `furniture-sets` is never shadowed
/// by a shorter segment embedded in it.
#[must_use]
pub fn category_for_path(path: &str) -> Option<&'static Category> {
    let mut by_len: Vec<&Category> = CATEGORIES.iter().collect();
    by_len.sort_by_key(|c| std::cmp::Reverse(c.path_segment.len()));
    by_len
        .into_iter()
        .find(|c| path.contains(&format!("/{}/", c.path_segment)))
}

/// Returns the first known category name that appears as a substring of
/// `text`, e.g. `"All Tables"` → `Some("Tables")`.
#[must_use]
pub fn match_category_name(text: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .map(|c| c.name)
        .find(|name| text.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_eight_categories() {
        assert_eq!(CATEGORIES.len(), 8);
    }

    #[test]
    fn category_names_are_unique() {
        let mut names: Vec<_> = CATEGORIES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn urls_embed_their_own_path_segment() {
        for c in &CATEGORIES {
            assert!(
                c.url.contains(&format!("/{}/", c.path_segment)),
                "category '{}' url does not contain its path segment",
                c.name
            );
        }
    }

    #[test]
    fn path_lookup_resolves_detail_page_path() {
        let cat = category_for_path("/sg/tables/dining-tables/products/seb-table").unwrap();
        assert_eq!(cat.name, "Tables");
    }

    #[test]
    fn path_lookup_resolves_furniture_sets() {
        let cat = category_for_path("/sg/furniture-sets/all-furniture-sets").unwrap();
        assert_eq!(cat.name, "Furniture Sets");
    }

    #[test]
    fn path_lookup_returns_none_for_unknown_path() {
        assert!(category_for_path("/sg/gift-cards/holiday").is_none());
    }

    #[test]
    fn path_lookup_requires_segment_boundaries() {
        // "sofas" inside another word must not match.
        assert!(category_for_path("/sg/article/why-sofas-matter").is_none());
    }

    #[test]
    fn name_match_finds_substring() {
        assert_eq!(match_category_name("All Tables"), Some("Tables"));
        assert_eq!(match_category_name("Outdoor Living"), Some("Outdoor"));
    }

    #[test]
    fn name_match_returns_none_when_absent() {
        assert!(match_category_name("Dining Sets").is_none());
    }
}
