//! Category walk: list page, per-product detail visits, field merge.
//!
//! Failure domains are strictly contained. A failed product visit yields a
//! degraded record built from the list entry; a failed category page yields
//! a group with an empty product list. The walk itself never errors.

use fcdb_core::{Category, CategoryGroup, ProductDetail, ProductImage};
use tracing::{info, warn};

use crate::detail::{extract_detail, DetailFields};
use crate::list::{extract_list_entries, ProductListEntry};
use crate::navigator::Navigator;
use crate::rules::ExtractionRules;

/// Walks one category end to end and always returns a group for it.
pub async fn walk_category<N: Navigator>(
    navigator: &mut N,
    category: &Category,
    rules: &ExtractionRules,
) -> CategoryGroup {
    info!(category = category.name, url = category.url, "walking category");

    let page = match navigator.open(category.url).await {
        Ok(page) => page,
        Err(err) => {
            warn!(category = category.name, error = %err, "category page failed to load");
            return CategoryGroup {
                name: category.name.to_string(),
                url: category.url.to_string(),
                products: Vec::new(),
            };
        }
    };

    let has_product_links = page.dom.ids().any(|id| {
        page.dom.tag(id) == "a"
            && page
                .dom
                .attr(id, "href")
                .is_some_and(|href| href.contains(rules.product_path))
    });
    if !has_product_links {
        warn!(
            category = category.name,
            "no product links on category page, extracting anyway"
        );
    }

    let entries = extract_list_entries(&page, rules);
    info!(
        category = category.name,
        products = entries.len(),
        "sampled product list"
    );

    let mut products = Vec::with_capacity(entries.len());
    for entry in entries {
        info!(
            category = category.name,
            index = entry.index,
            name = %entry.name,
            "visiting product"
        );
        match navigator.open(&entry.url).await {
            Ok(detail_page) => {
                let detail = extract_detail(&detail_page, rules);
                products.push(merge(entry, detail, category, rules));
            }
            Err(err) => {
                warn!(
                    category = category.name,
                    url = %entry.url,
                    error = %err,
                    "product page failed, recording list fields only"
                );
                products.push(degraded(entry, category));
            }
        }
    }

    CategoryGroup {
        name: category.name.to_string(),
        url: category.url.to_string(),
        products,
    }
}

/// Detail fields win when non-empty; the list entry supplies url,
/// description, and tag unconditionally.
fn merge(
    entry: ProductListEntry,
    detail: DetailFields,
    category: &Category,
    rules: &ExtractionRules,
) -> ProductDetail {
    ProductDetail {
        name: non_empty_or(detail.name, entry.name),
        url: entry.url,
        price: non_empty_or(detail.price, entry.price),
        original_price: None,
        description: entry.description,
        category: non_empty_or(detail.category, category.name.to_string()),
        collection: detail.collection,
        tag: optional(entry.tag),
        delivery: rules.delivery_placeholder.to_string(),
        options: detail.options,
        images: detail
            .images
            .into_iter()
            .map(|url| ProductImage { url })
            .collect(),
    }
}

/// Record for a product whose detail page never loaded.
fn degraded(entry: ProductListEntry, category: &Category) -> ProductDetail {
    ProductDetail {
        name: entry.name,
        url: entry.url,
        price: entry.price,
        original_price: None,
        description: entry.description,
        category: category.name.to_string(),
        collection: String::new(),
        tag: optional(entry.tag),
        delivery: String::new(),
        options: Vec::new(),
        images: Vec::new(),
    }
}

fn non_empty_or(preferred: String, fallback: String) -> String {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
