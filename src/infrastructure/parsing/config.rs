//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for both catalog sources. Every structural
//! signature lives here so a markup change on either site is a config edit.

use serde::{Deserialize, Serialize};

/// Selectors for the server-rendered catalog (listing and detail pages)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StaticSourceSelectors {
    /// Catalog container; its absence means "no content" rather than an error
    pub catalog_container: String,

    /// One product card inside the container
    pub item: String,

    /// Product image; the `src` attribute is taken verbatim
    pub image: String,

    /// Product title element
    pub title: String,

    /// Link to the product detail page
    pub link: String,

    /// Pagination buttons scanned for a "next" label
    pub pagination_link: String,

    /// Brand microdata element on the detail page
    pub detail_brand: String,

    /// Description microdata element on the detail page
    pub detail_description: String,
}

impl Default for StaticSourceSelectors {
    fn default() -> Self {
        Self {
            catalog_container: "div.grid.grid--uniform.grid--view-items".to_string(),
            item: "div.grid-view-item".to_string(),
            image: "img.grid-view-item__image".to_string(),
            title: "div.h4.grid-view-item__title".to_string(),
            link: "a[href]".to_string(),
            pagination_link: "a.btn.btn--secondary.btn--narrow".to_string(),
            detail_brand: "p[itemprop=\"brand\"]".to_string(),
            detail_description: "div[itemprop=\"description\"]".to_string(),
        }
    }
}

/// Selectors for the client-rendered catalog, applied to the browser's DOM snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserSourceSelectors {
    /// One post entry on a listing page
    pub post: String,

    /// Category/context header of a post
    pub category: String,

    /// Post title
    pub title: String,

    /// Post image (inside the image wrapper)
    pub image: String,

    /// Link to the post's detail page
    pub link: String,

    /// Brand (artist/publisher) subtitle on the detail page
    pub detail_brand: String,

    /// Column holding the description paragraph
    pub detail_description_container: String,

    /// Description paragraph inside that column
    pub detail_description: String,
}

impl Default for BrowserSourceSelectors {
    fn default() -> Self {
        Self {
            post: "div.post-content".to_string(),
            category: "div.post-header".to_string(),
            title: "h2.post-title".to_string(),
            image: "div.post-image img[decoding=\"async\"]".to_string(),
            link: "a[href]".to_string(),
            detail_brand: "h2.hero-subtitle".to_string(),
            detail_description_container: "div.col".to_string(),
            detail_description: "p".to_string(),
        }
    }
}
