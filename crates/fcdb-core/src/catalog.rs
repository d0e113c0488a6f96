//! The persisted catalog shape.
//!
//! Field declaration order here is a contract: serde serializes struct keys
//! in declaration order, and the YAML artifact is expected to carry
//! `name, url, price, original_price, description, category, collection,
//! tag, delivery, options, images` in exactly that order. Do not reorder
//! fields.

use serde::{Deserialize, Serialize};

/// One configurable product attribute (material, colour, size, ...) and its
/// distinct observed values in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Lowercased, trimmed attribute name, e.g. `"material"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<String>,
}

/// A catalog-eligible product photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

/// The final per-product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub name: String,
    pub url: String,
    pub price: String,
    pub original_price: Option<String>,
    pub description: String,
    /// Resolved main category name. Never empty: falls back to the category
    /// being walked when the detail page yields nothing.
    pub category: String,
    /// Sub-line name; may be empty.
    pub collection: String,
    pub tag: Option<String>,
    /// Placeholder/default allowed; empty only on degraded records.
    pub delivery: String,
    pub options: Vec<ProductOption>,
    /// Deduplicated, at most 10 entries.
    pub images: Vec<ProductImage>,
}

/// A category and its products in visit order. A failed product yields a
/// degraded-but-present record, never a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub url: String,
    pub products: Vec<ProductDetail>,
}

/// The persisted artifact: all categories in fixed input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CategoryGroup>,
}

impl Catalog {
    /// Assembles the catalog from per-category results. Input order is
    /// output order; nothing is re-sorted.
    #[must_use]
    pub fn from_groups(groups: Vec<CategoryGroup>) -> Self {
        Self { categories: groups }
    }

    /// Total number of product records across all categories.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|g| g.products.len()).sum()
    }

    /// Serializes to YAML: block sequences, declaration-order keys,
    /// non-ASCII text verbatim.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_yaml` error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Serializes to pretty-printed JSON with the same key order as YAML.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> ProductDetail {
        ProductDetail {
            name: "Seb Dining Table".to_string(),
            url: "https://www.castlery.com/sg/products/seb-dining-table".to_string(),
            price: "$899".to_string(),
            original_price: None,
            description: "Solid oak".to_string(),
            category: "Tables".to_string(),
            collection: "Dining Sets".to_string(),
            tag: None,
            delivery: "Leaves warehouse by Feb 3".to_string(),
            options: vec![ProductOption {
                kind: "material".to_string(),
                values: vec!["Oak".to_string(), "Walnut".to_string()],
            }],
            images: vec![ProductImage {
                url: "https://res.cloudinary.com/castlery/crusader/variants/seb-1.jpg".to_string(),
            }],
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_groups(vec![CategoryGroup {
            name: "Tables".to_string(),
            url: "https://www.castlery.com/sg/tables/all-tables".to_string(),
            products: vec![sample_product()],
        }])
    }

    #[test]
    fn yaml_preserves_declared_key_order() {
        let yaml = sample_catalog().to_yaml().unwrap();
        let keys = [
            "name:",
            "url:",
            "price:",
            "original_price:",
            "description:",
            "category:",
            "collection:",
            "tag:",
            "delivery:",
            "options:",
            "images:",
        ];
        let product_block = yaml.split("products:").nth(1).unwrap();
        let mut last = 0;
        for key in keys {
            let pos = product_block[last..]
                .find(key)
                .unwrap_or_else(|| panic!("key '{key}' missing or out of order"));
            last += pos;
        }
    }

    #[test]
    fn yaml_renders_absent_tag_as_null() {
        let yaml = sample_catalog().to_yaml().unwrap();
        assert!(yaml.contains("tag: null"));
        assert!(yaml.contains("original_price: null"));
    }

    #[test]
    fn yaml_uses_block_sequences() {
        let yaml = sample_catalog().to_yaml().unwrap();
        assert!(yaml.contains("- name:"), "expected block-style sequence");
        assert!(!yaml.contains("categories: ["), "flow style not allowed");
    }

    #[test]
    fn yaml_preserves_non_ascii_verbatim() {
        let mut catalog = sample_catalog();
        catalog.categories[0].products[0].name = "Café Chair — Ébène".to_string();
        let yaml = catalog.to_yaml().unwrap();
        assert!(yaml.contains("Café Chair — Ébène"));
    }

    #[test]
    fn yaml_option_type_key_is_renamed() {
        let yaml = sample_catalog().to_yaml().unwrap();
        assert!(yaml.contains("type: material"));
        assert!(!yaml.contains("kind:"));
    }

    #[test]
    fn json_round_trips() {
        let catalog = sample_catalog();
        let json = catalog.to_json().unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn product_count_sums_all_groups() {
        let mut catalog = sample_catalog();
        catalog.categories.push(CategoryGroup {
            name: "Sofas".to_string(),
            url: "https://www.castlery.com/sg/sofas/all-sofas".to_string(),
            products: vec![sample_product(), sample_product()],
        });
        assert_eq!(catalog.product_count(), 3);
    }
}
