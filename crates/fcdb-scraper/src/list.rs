//! Product list extraction from a rendered category page.
//!
//! Two strategies, in order: product-card-like containers first, then a
//! raw anchor scan that fills any remaining slots. Both walk the document
//! in source order, so extraction is deterministic for a fixed page.

use crate::dom::{Dom, NodeId, Page};
use crate::rules::ExtractionRules;

/// One sampled product from a category listing. Ephemeral: merged into the
/// final record (or used alone for a degraded record) by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListEntry {
    /// 1-based position within the category sample.
    pub index: usize,
    pub name: String,
    /// Always absolute.
    pub url: String,
    /// `"N/A"` when the listing shows no price.
    pub price: String,
    pub description: String,
    pub tag: String,
}

/// Extracts up to `rules.max_list_entries` products from a category page,
/// in document order.
#[must_use]
pub fn extract_list_entries(page: &Page, rules: &ExtractionRules) -> Vec<ProductListEntry> {
    let dom = &page.dom;
    let mut entries: Vec<ProductListEntry> = Vec::new();

    // Strategy 1: card containers holding both a product link and a CDN image.
    for id in dom.ids() {
        if entries.len() >= rules.max_list_entries {
            break;
        }
        if !is_card_like(dom, id) {
            continue;
        }
        let Some(anchor) = first_product_anchor(dom, id, rules) else {
            continue;
        };
        if !has_asset_image(dom, id, rules) {
            continue;
        }
        let Some(href) = dom.attr(anchor, "href") else {
            continue;
        };
        let url = resolve_url(rules.site_root, href);
        // Nested containers (card inside grid) surface the same product twice.
        if entries.iter().any(|e| e.url == url) {
            continue;
        }

        let name = resolve_name(dom, id, anchor, &url, rules);
        let price =
            first_text_by_class(dom, id, &["price"]).unwrap_or_else(|| "N/A".to_string());
        let description =
            first_text_by_class(dom, id, &["description", "feature", "tag"]).unwrap_or_default();
        let tag = first_text_by_class(dom, id, &["badge", "tag", "label"]).unwrap_or_default();

        entries.push(ProductListEntry {
            index: 0,
            name,
            url,
            price,
            description,
            tag,
        });
    }

    // Strategy 2: raw qualifying anchors fill the remaining slots.
    if entries.len() < rules.max_list_entries {
        for id in dom.ids() {
            if entries.len() >= rules.max_list_entries {
                break;
            }
            if dom.tag(id) != "a" {
                continue;
            }
            let Some(href) = dom.attr(id, "href") else {
                continue;
            };
            if !href.contains(rules.product_path) {
                continue;
            }
            let Some(container) = nearest_container(dom, id) else {
                continue;
            };
            if !has_asset_image(dom, container, rules) {
                continue;
            }
            let url = resolve_url(rules.site_root, href);
            if entries.iter().any(|e| e.url == url) {
                continue;
            }
            let name = resolve_name(dom, container, id, &url, rules);
            entries.push(ProductListEntry {
                index: 0,
                name,
                url,
                price: "N/A".to_string(),
                description: String::new(),
                tag: String::new(),
            });
        }
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.index = i + 1;
    }
    entries
}

/// Resolves a product href against the site root. Already-absolute URLs pass
/// through unchanged, so resolution is idempotent.
#[must_use]
pub fn resolve_url(site_root: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{site_root}{href}")
    } else {
        format!("{site_root}/{href}")
    }
}

fn is_card_like(dom: &Dom, id: NodeId) -> bool {
    dom.tag(id) == "article" || dom.class_contains(id, "product") || dom.class_contains(id, "card")
}

fn first_product_anchor(dom: &Dom, scope: NodeId, rules: &ExtractionRules) -> Option<NodeId> {
    dom.descendants(scope).into_iter().find(|&d| {
        dom.tag(d) == "a"
            && dom
                .attr(d, "href")
                .is_some_and(|href| href.contains(rules.product_path))
    })
}

fn has_asset_image(dom: &Dom, scope: NodeId, rules: &ExtractionRules) -> bool {
    dom.descendants(scope).into_iter().any(|d| {
        dom.tag(d) == "img"
            && dom
                .attr(d, "src")
                .is_some_and(|src| src.contains(rules.asset_host))
    })
}

/// First non-empty descendant text under `scope` whose element class
/// contains one of `needles`.
fn first_text_by_class(dom: &Dom, scope: NodeId, needles: &[&str]) -> Option<String> {
    for d in dom.descendants(scope) {
        if needles.iter().any(|needle| dom.class_contains(d, needle)) {
            let text = dom.text_content(d);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Nearest ancestor that looks like a product container: an `article`, a
/// generic `div`, or anything with a product/card class.
fn nearest_container(dom: &Dom, id: NodeId) -> Option<NodeId> {
    let mut cursor = dom.parent(id);
    while let Some(node) = cursor {
        if matches!(dom.tag(node), "article" | "div") || is_card_like(dom, node) {
            return Some(node);
        }
        cursor = dom.parent(node);
    }
    None
}

/// Name resolution chain: heading/title descendant, then the anchor's own
/// text (when plausibly a name, not a raw link), then the URL slug.
fn resolve_name(
    dom: &Dom,
    scope: NodeId,
    anchor: NodeId,
    url: &str,
    rules: &ExtractionRules,
) -> String {
    for d in dom.descendants(scope) {
        if matches!(dom.tag(d), "h2" | "h3")
            || dom.class_contains(d, "title")
            || dom.class_contains(d, "name")
        {
            let text = dom.text_content(d);
            if !text.is_empty() {
                return text;
            }
        }
    }

    let anchor_text = dom.text_content(anchor);
    let len = anchor_text.chars().count();
    if (6..=99).contains(&len) && !anchor_text.contains("http") {
        return anchor_text;
    }

    name_from_slug(url, rules).unwrap_or_else(|| "Unknown".to_string())
}

/// Derives a display name from the detail URL's last path segment:
/// `adams-l-shape-sofa` → `Adams L Shape Sofa`.
fn name_from_slug(url: &str, rules: &ExtractionRules) -> Option<String> {
    let after = url.split(rules.product_path).nth(1)?;
    let slug = after.split('?').next().unwrap_or("");
    let last = slug.split('/').filter(|s| !s.is_empty()).next_back()?;
    let name = last
        .split('-')
        .filter(|s| !s.is_empty())
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn title_case_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
