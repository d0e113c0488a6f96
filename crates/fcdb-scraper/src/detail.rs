//! Product detail page extraction.
//!
//! Extraction is total: every field has a defined empty/default fallback,
//! so this module never returns an error. The walker decides how missing
//! fields merge with the list entry.

use fcdb_core::{category_for_path, match_category_name, ProductOption, CATEGORIES};
use regex::Regex;

use crate::dom::{Dom, NodeId, Page};
use crate::rules::ExtractionRules;

/// Fields recoverable from a detail page. Merged with the originating
/// [`crate::ProductListEntry`] by the walker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub name: String,
    pub price: String,
    /// Canonical category name, or empty when no breadcrumb entry matched.
    pub category: String,
    pub collection: String,
    pub options: Vec<ProductOption>,
    /// Deduped, document order, capped.
    pub images: Vec<String>,
}

/// Extracts all detail fields from a rendered product page.
#[must_use]
pub fn extract_detail(page: &Page, rules: &ExtractionRules) -> DetailFields {
    let dom = &page.dom;

    let name = dom
        .first_by_tag("h1")
        .map(|id| dom.text_content(id))
        .unwrap_or_default();
    let price = dom
        .first_by_tag("h3")
        .map(|id| dom.text_content(id))
        .unwrap_or_default();

    let crumbs = breadcrumbs(page, rules);
    let matched = crumbs
        .iter()
        .enumerate()
        .find_map(|(i, crumb)| match_category_name(crumb).map(|name| (i, name)));
    let category = matched.map(|(_, name)| name.to_string()).unwrap_or_default();
    let collection = if crumbs.len() > 1 {
        match matched {
            // The category itself closing the trail is not a collection.
            Some((i, _)) if i == crumbs.len() - 1 => String::new(),
            _ => crumbs.last().cloned().unwrap_or_default(),
        }
    } else {
        String::new()
    };

    let mut options = Vec::new();
    pattern_pass(dom, rules, &mut options);
    structural_pass(dom, rules, &mut options);

    DetailFields {
        name,
        price,
        category,
        collection,
        options,
        images: extract_images(dom, rules),
    }
}

// ---------------------------------------------------------------------------
// Breadcrumbs
// ---------------------------------------------------------------------------

/// Breadcrumb trail for the product. Walks a bounded number of ancestor
/// levels above the title heading; the first level containing category
/// links wins. Falls back to a single entry derived from the page URL.
fn breadcrumbs(page: &Page, rules: &ExtractionRules) -> Vec<String> {
    let dom = &page.dom;
    let mut crumbs: Vec<String> = Vec::new();

    if let Some(h1) = dom.first_by_tag("h1") {
        let mut level = dom.parent(h1);
        for _ in 0..rules.breadcrumb_ancestor_depth {
            let Some(node) = level else { break };
            let links: Vec<NodeId> = dom
                .descendants(node)
                .into_iter()
                .filter(|&d| {
                    dom.tag(d) == "a" && dom.attr(d, "href").is_some_and(is_category_href)
                })
                .collect();
            if !links.is_empty() {
                for link in links {
                    let text = dom.text_content(link);
                    if !text.is_empty()
                        && text != "Home"
                        && !text.contains('>')
                        && !text.contains("Go to")
                    {
                        push_unique(&mut crumbs, text);
                    }
                }
                break;
            }
            level = dom.parent(node);
        }
    }

    if crumbs.is_empty() {
        if let Some(category) = category_for_path(page.path()) {
            crumbs.push(category.name.to_string());
        }
    }
    crumbs
}

fn is_category_href(href: &str) -> bool {
    CATEGORIES
        .iter()
        .any(|c| href.contains(&format!("/{}/", c.path_segment)))
}

// ---------------------------------------------------------------------------
// Options, pass 1: attribute patterns over the visible text
// ---------------------------------------------------------------------------

/// Searches the body text for `<attribute>: <current value>` lines, one
/// option per matched pattern. The currently selected value always leads
/// the value list.
fn pattern_pass(dom: &Dom, rules: &ExtractionRules, options: &mut Vec<ProductOption>) {
    let body = dom.body_text();
    let all_ids: Vec<NodeId> = dom.ids().collect();

    for pattern in rules.attribute_patterns {
        let kind = pattern.trim_end_matches(':').trim().to_ascii_lowercase();
        if rules.is_excluded_type(&kind) {
            continue;
        }
        let Ok(re) = Regex::new(&format!(r"(?i){}\s*([^\n]+)", regex::escape(pattern))) else {
            continue;
        };
        let Some(caps) = re.captures(&body) else {
            continue;
        };
        let current = caps[1].trim().lines().next().unwrap_or("").trim().to_string();
        let len = current.chars().count();
        if len == 0 || len >= 100 {
            continue;
        }

        let mut values = vec![current.clone()];
        labelled_control_values(dom, &kind, &mut values);
        selectable_item_values(dom, &all_ids, Some(current.as_str()), &mut values);
        options.push(ProductOption { kind, values });
    }
}

/// Buttons with a `Select ...` accessible label whose label names the
/// attribute, e.g. `aria-label="Select leg color Black"` for `leg color`.
fn labelled_control_values(dom: &Dom, kind: &str, values: &mut Vec<String>) {
    for id in dom.ids() {
        if dom.tag(id) != "button" {
            continue;
        }
        let Some(label) = dom.attr(id, "aria-label") else {
            continue;
        };
        if !label.contains("Select") {
            continue;
        }
        if !label.to_ascii_lowercase().contains(kind) {
            continue;
        }
        let value = strip_select_prefix(label);
        if !value.is_empty() {
            push_unique(values, value);
        }
    }
}

/// Generic selectable items within `scope`: radio/option roles,
/// pointer-cursor generics, and `Select`-labelled buttons.
fn selectable_item_values(
    dom: &Dom,
    scope: &[NodeId],
    current: Option<&str>,
    values: &mut Vec<String>,
) {
    for &id in scope {
        let candidate = if matches!(dom.attr(id, "role"), Some("radio" | "option"))
            || dom.attr(id, "cursor") == Some("pointer")
        {
            dom.text_content(id)
        } else if dom.tag(id) == "button" {
            match dom.attr(id, "aria-label") {
                Some(label) if label.contains("Select") => strip_select_prefix(label),
                _ => continue,
            }
        } else {
            continue;
        };
        if candidate.is_empty() || candidate.chars().count() >= 80 {
            continue;
        }
        if current == Some(candidate.as_str()) {
            continue;
        }
        push_unique(values, candidate);
    }
}

// ---------------------------------------------------------------------------
// Options, pass 2: structural option sections
// ---------------------------------------------------------------------------

/// Supplements the pattern pass from option/variant/selector sections.
/// Stricter filtering applies here, and a type already found by the
/// pattern pass is never overridden.
fn structural_pass(dom: &Dom, rules: &ExtractionRules, options: &mut Vec<ProductOption>) {
    for section in dom.ids() {
        if !(dom.class_contains(section, "option")
            || dom.class_contains(section, "variant")
            || dom.class_contains(section, "selector"))
        {
            continue;
        }
        let members = dom.descendants(section);

        let Some(kind) = section_label(dom, &members) else {
            continue;
        };
        let len = kind.chars().count();
        if len < 2 || len > 30 || rules.is_excluded_type(&kind) {
            continue;
        }
        if options.iter().any(|o| o.kind == kind) {
            continue;
        }

        let mut values = Vec::new();
        if let Some(current) = selected_value(dom, &members) {
            if current.chars().count() < 100 {
                values.push(current);
            }
        }
        section_button_values(dom, &members, &mut values);
        selectable_item_values(dom, &members, None, &mut values);

        if !values.is_empty() {
            options.push(ProductOption { kind, values });
        }
    }
}

/// Normalized label of an option section: first label-like descendant's
/// text, else its accessible label. `"Colour:"` → `"colour"`.
fn section_label(dom: &Dom, members: &[NodeId]) -> Option<String> {
    let node = members.iter().copied().find(|&d| {
        dom.tag(d) == "label"
            || dom.class_contains(d, "label")
            || dom.attr(d, "aria-label").is_some()
    })?;
    let mut raw = dom.text_content(node);
    if raw.is_empty() {
        raw = dom.attr(node, "aria-label").unwrap_or("").to_string();
    }
    let kind = raw.replacen(':', "", 1).trim().to_ascii_lowercase();
    if kind.is_empty() {
        None
    } else {
        Some(kind)
    }
}

/// Currently selected value within a section, from the first descendant
/// marked selected.
fn selected_value(dom: &Dom, members: &[NodeId]) -> Option<String> {
    let node = members.iter().copied().find(|&d| {
        dom.class_contains(d, "selected") || dom.attr(d, "aria-selected") == Some("true")
    })?;
    let text = dom.text_content(node);
    if !text.is_empty() {
        return Some(text);
    }
    let label = dom.attr(node, "aria-label")?;
    let stripped = strip_select_prefix(label);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

fn section_button_values(dom: &Dom, members: &[NodeId], values: &mut Vec<String>) {
    for &id in members {
        if dom.tag(id) != "button" {
            continue;
        }
        let labelled = dom
            .attr(id, "aria-label")
            .is_some_and(|l| l.contains("Select"));
        if !labelled && !dom.class_contains(id, "option") {
            continue;
        }
        let value = match dom.attr(id, "aria-label") {
            Some(label) if labelled => strip_select_prefix(label),
            _ => dom.text_content(id),
        };
        if !value.is_empty() && value.chars().count() < 100 {
            push_unique(values, value);
        }
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

fn extract_images(dom: &Dom, rules: &ExtractionRules) -> Vec<String> {
    let mut images = Vec::new();
    for id in dom.ids() {
        if dom.tag(id) != "img" {
            continue;
        }
        let Some(src) = dom.attr(id, "src") else {
            continue;
        };
        if rules.is_variant_image(src) {
            push_unique(&mut images, src.to_string());
        }
    }
    images.truncate(rules.max_images);
    images
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn strip_select_prefix(label: &str) -> String {
    let trimmed = label.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("select ") {
        trimmed[trimmed.len() - rest.len()..].trim_start().to_string()
    } else {
        trimmed.to_string()
    }
}

fn push_unique(values: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !values.iter().any(|v| v == &value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    fn detail_page(url: &str, body: &str) -> DetailFields {
        let html = format!("<html><body>{body}</body></html>");
        extract_detail(&Page::parse(url, &html), &rules())
    }

    const PRODUCT_URL: &str = "https://www.castlery.com/sg/products/seb-dining-table";

    // -----------------------------------------------------------------------
    // Headings
    // -----------------------------------------------------------------------

    #[test]
    fn name_and_price_come_from_headings() {
        let d = detail_page(
            PRODUCT_URL,
            "<h1>Seb Dining Table</h1><h3>$1,299</h3><h3>$999</h3>",
        );
        assert_eq!(d.name, "Seb Dining Table");
        assert_eq!(d.price, "$1,299");
    }

    #[test]
    fn missing_headings_yield_empty_fields() {
        let d = detail_page(PRODUCT_URL, "<div>nothing here</div>");
        assert_eq!(d.name, "");
        assert_eq!(d.price, "");
    }

    // -----------------------------------------------------------------------
    // Breadcrumbs, category, collection
    // -----------------------------------------------------------------------

    #[test]
    fn breadcrumb_trail_resolves_category_and_collection() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div class="pdp">
                 <nav>
                   <a href="/sg/tables/all-tables">Home</a>
                   <a href="/sg/tables/all-tables">Tables</a>
                   <a href="/sg/tables/dining-sets">Dining Sets</a>
                 </nav>
                 <div><h1>Seb Dining Table</h1></div>
               </div>
               <h3>$1,299</h3>"#,
        );
        assert_eq!(d.category, "Tables");
        assert_eq!(d.collection, "Dining Sets");
    }

    #[test]
    fn collection_empty_when_category_closes_the_trail() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>
                 <a href="/sg/tables/dining">Dining</a>
                 <a href="/sg/tables/all-tables">Tables</a>
                 <h1>Seb Dining Table</h1>
               </div>"#,
        );
        assert_eq!(d.category, "Tables");
        assert_eq!(d.collection, "");
    }

    #[test]
    fn collection_is_last_crumb_when_no_entry_matches_a_category() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>
                 <a href="/sg/tables/dining">Dining</a>
                 <a href="/sg/tables/dining-sets">Dining Sets</a>
                 <h1>Seb Dining Table</h1>
               </div>"#,
        );
        assert_eq!(d.category, "");
        assert_eq!(d.collection, "Dining Sets");
    }

    #[test]
    fn url_path_fallback_when_no_breadcrumb_links() {
        let d = detail_page(
            "https://www.castlery.com/sg/chairs/products/joshua-chair",
            "<h1>Joshua Chair</h1>",
        );
        assert_eq!(d.category, "Chairs");
        // Single derived entry, so no collection.
        assert_eq!(d.collection, "");
    }

    #[test]
    fn category_empty_when_nothing_resolves() {
        let d = detail_page(
            "https://www.castlery.com/sg/products/mystery-item",
            "<h1>Mystery Item</h1>",
        );
        assert_eq!(d.category, "");
        assert_eq!(d.collection, "");
    }

    #[test]
    fn breadcrumb_stops_at_first_matching_ancestor_level() {
        // The inner wrapper has the real trail; the outer one holds footer
        // links that must not be reached.
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>
                 <a href="/sg/sofas/all-sofas">Sofas</a>
                 <div>
                   <a href="/sg/tables/all-tables">Tables</a>
                   <a href="/sg/tables/dining-sets">Dining Sets</a>
                   <div><h1>Seb Dining Table</h1></div>
                 </div>
               </div>"#,
        );
        assert_eq!(d.category, "Tables");
    }

    // -----------------------------------------------------------------------
    // Options: pattern pass
    // -----------------------------------------------------------------------

    #[test]
    fn material_option_collects_current_and_alternates() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<h1>Seb Dining Table</h1>
               <div>material: Oak</div>
               <button aria-label="Select Oak">Oak</button>
               <button aria-label="Select Walnut">Walnut</button>
               <button aria-label="Select Teak">Teak</button>"#,
        );
        let material = d.options.iter().find(|o| o.kind == "material").unwrap();
        assert_eq!(material.values, vec!["Oak", "Walnut", "Teak"]);
    }

    #[test]
    fn labelled_controls_naming_the_attribute_are_matched_to_it() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>leg color: Black</div>
               <button aria-label="Select leg color Oak">x</button>"#,
        );
        let option = d.options.iter().find(|o| o.kind == "leg color").unwrap();
        assert_eq!(option.values[0], "Black");
        assert!(option.values.contains(&"leg color Oak".to_string()));
    }

    #[test]
    fn radio_role_items_augment_values() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>size: 3 Seater</div>
               <div role="radio">2 Seater</div>
               <div role="radio">3 Seater</div>"#,
        );
        let size = d.options.iter().find(|o| o.kind == "size").unwrap();
        assert_eq!(size.values, vec!["3 Seater", "2 Seater"]);
    }

    #[test]
    fn pattern_value_longer_than_limit_is_dropped() {
        let long = "x".repeat(120);
        let d = detail_page(PRODUCT_URL, &format!("<div>material: {long}</div>"));
        assert!(d.options.iter().all(|o| o.kind != "material"));
    }

    #[test]
    fn head_title_does_not_seed_options() {
        let html = r#"<html>
            <head><title>Seb Bed Frame | Size: King | Castlery</title></head>
            <body><h1>Seb Bed Frame</h1></body>
        </html>"#;
        let d = extract_detail(&Page::parse(PRODUCT_URL, html), &rules());
        assert!(
            d.options.is_empty(),
            "page title must not feed the pattern pass: {:?}",
            d.options
        );
    }

    #[test]
    fn option_values_are_deduped_in_first_seen_order() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>colour: Walnut</div>
               <button aria-label="Select Walnut">Walnut</button>
               <button aria-label="Select Oak">Oak</button>
               <button aria-label="Select Oak">Oak</button>"#,
        );
        let colour = d.options.iter().find(|o| o.kind == "colour").unwrap();
        assert_eq!(colour.values, vec!["Walnut", "Oak"]);
    }

    // -----------------------------------------------------------------------
    // Options: structural pass
    // -----------------------------------------------------------------------

    #[test]
    fn structural_section_yields_option() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div class="variant-picker">
                 <span class="picker-label">Leg Finish:</span>
                 <span class="swatch selected">Matte Black</span>
                 <button aria-label="Select Brass">Brass</button>
               </div>"#,
        );
        let option = d.options.iter().find(|o| o.kind == "leg finish").unwrap();
        assert_eq!(option.values, vec!["Matte Black", "Brass"]);
    }

    #[test]
    fn pattern_pass_wins_type_conflicts() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div>colour: Walnut</div>
               <div class="colour-option">
                 <label>Colour</label>
                 <span class="selected">Something Else</span>
               </div>"#,
        );
        let colours: Vec<_> = d.options.iter().filter(|o| o.kind == "colour").collect();
        assert_eq!(colours.len(), 1);
        assert_eq!(colours[0].values[0], "Walnut");
    }

    #[test]
    fn structural_pass_rejects_site_chrome_sections() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div class="country-selector">
                 <label>Country selector</label>
                 <span class="selected">Singapore</span>
               </div>"#,
        );
        assert!(d.options.is_empty());
    }

    #[test]
    fn structural_pass_rejects_overlong_labels() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div class="delivery-option">
                 <label>free delivery for orders above two hundred</label>
                 <span class="selected">Yes</span>
               </div>"#,
        );
        assert!(d.options.is_empty());
    }

    #[test]
    fn structural_section_without_values_is_dropped() {
        let d = detail_page(
            PRODUCT_URL,
            r#"<div class="size-option"><label>Size</label></div>"#,
        );
        assert!(d.options.is_empty());
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    fn variant_img(name: &str) -> String {
        format!(
            r#"<img src="https://res.cloudinary.com/castlery/crusader/variants/{name}.jpg">"#
        )
    }

    #[test]
    fn images_keep_variants_and_drop_swatches() {
        let d = detail_page(
            PRODUCT_URL,
            &format!(
                "{}{}{}",
                variant_img("seb-front"),
                variant_img("oak-swatch"),
                r#"<img src="https://res.cloudinary.com/castlery/banners/sale.jpg">"#
            ),
        );
        assert_eq!(
            d.images,
            vec!["https://res.cloudinary.com/castlery/crusader/variants/seb-front.jpg"]
        );
    }

    #[test]
    fn images_are_deduped_in_document_order() {
        let d = detail_page(
            PRODUCT_URL,
            &format!(
                "{}{}{}",
                variant_img("seb-front"),
                variant_img("seb-side"),
                variant_img("seb-front")
            ),
        );
        assert_eq!(d.images.len(), 2);
        assert!(d.images[0].contains("seb-front"));
        assert!(d.images[1].contains("seb-side"));
    }

    #[test]
    fn images_are_capped() {
        let body: String = (0..15).map(|i| variant_img(&format!("seb-{i}"))).collect();
        let d = detail_page(PRODUCT_URL, &body);
        assert_eq!(d.images.len(), 10);
        assert!(d.images[9].contains("seb-9"));
    }
}
