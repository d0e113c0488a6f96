//! Immutable extraction constants.
//!
//! Everything here was observed on the live storefront; the tables are
//! passed into the extraction functions rather than read as globals so that
//! tests can tighten or stub them.

/// Fixed tables and limits driving list/detail extraction.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// Origin that relative hrefs are resolved against.
    pub site_root: &'static str,
    /// Path marker identifying a product detail link.
    pub product_path: &'static str,
    /// Substring identifying images served from the product asset CDN.
    pub asset_host: &'static str,
    /// Substring identifying catalog-eligible variant photos.
    pub variant_image_path: &'static str,
    /// An image whose source contains any of these is not a product photo
    /// (swatches, icons, user-generated content, social embeds, video
    /// posters). Matched case-insensitively.
    pub image_excludes: &'static [&'static str],
    /// Attribute-name patterns for the option pattern pass, in priority
    /// order. Each ends with `:` and is matched case-insensitively against
    /// the page's visible text.
    pub attribute_patterns: &'static [&'static str],
    /// An option type containing any of these is site chrome, not a product
    /// attribute.
    pub excluded_terms: &'static [&'static str],
    /// Product sample size per category.
    pub max_list_entries: usize,
    /// Image cap per product.
    pub max_images: usize,
    /// How many ancestor levels above the title heading to search for
    /// breadcrumb links.
    pub breadcrumb_ancestor_depth: usize,
    /// Delivery estimate recorded when detail extraction succeeds; the
    /// storefront renders this client-side so it is not extractable.
    pub delivery_placeholder: &'static str,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            site_root: "https://www.castlery.com",
            product_path: "/products/",
            asset_host: "cloudinary",
            variant_image_path: "crusader/variants",
            image_excludes: &["swatch", "icon", "ugc", "social", "video"],
            attribute_patterns: &[
                "Model:",
                "material:",
                "colour:",
                "orientation:",
                "table:",
                "frame cover:",
                "variant:",
                "length:",
                "size:",
                "color:",
                "finish:",
                "leg color:",
                "leg:",
                "wood:",
                "power recliner qty:",
                "bench:",
                "chair material:",
                "chairs qty:",
                "height:",
                "width:",
                "depth:",
            ],
            excluded_terms: &[
                "singapore",
                "country selector",
                "go to",
                "pagination",
                "stocked",
                "view",
                "get",
                "add-on",
            ],
            max_list_entries: 5,
            max_images: 10,
            breadcrumb_ancestor_depth: 5,
            delivery_placeholder: "Leaves warehouse by Feb 3",
        }
    }
}

impl ExtractionRules {
    /// True when `kind` (lowercase) names site chrome rather than a product
    /// attribute.
    #[must_use]
    pub fn is_excluded_type(&self, kind: &str) -> bool {
        self.excluded_terms.iter().any(|term| kind.contains(term))
    }

    /// True when an image source is a swatch/icon/UGC/social/video asset.
    #[must_use]
    pub fn is_excluded_image(&self, src: &str) -> bool {
        let lower = src.to_ascii_lowercase();
        self.image_excludes.iter().any(|term| lower.contains(term))
    }

    /// True when an image source is a catalog-eligible variant photo.
    #[must_use]
    pub fn is_variant_image(&self, src: &str) -> bool {
        src.contains(self.asset_host)
            && src.contains(self.variant_image_path)
            && !self.is_excluded_image(src)
    }
}
