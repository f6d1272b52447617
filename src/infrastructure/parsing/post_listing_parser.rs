//! Post listing parser for the browser-driven source
//!
//! Runs against the DOM snapshot taken after client-side rendering. The
//! source exposes no pagination signal, so only entries are extracted.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::config::BrowserSourceSelectors;
use super::{DocumentParser, ParsingResult, compile_selector, first_attr, first_text, resolve_link};
use crate::domain::ItemRecord;

/// One post as shown on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    /// Category/context header; informational only, not part of the record
    pub category: Option<String>,
    pub title: Option<String>,
    pub image_link: Option<String>,
    /// Absolute detail page URL
    pub url: Option<Url>,
}

impl PostEntry {
    /// Listing-stage record for this post
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord::from_listing(
            self.title.clone(),
            self.image_link.clone(),
            self.url.as_ref().map(ToString::to_string),
        )
    }
}

pub struct PostListingParser {
    base_url: Url,
    post: Selector,
    category: Selector,
    title: Selector,
    image: Selector,
    link: Selector,
}

impl PostListingParser {
    pub fn new(base_url: Url, selectors: &BrowserSourceSelectors) -> ParsingResult<Self> {
        Ok(Self {
            base_url,
            post: compile_selector(&selectors.post)?,
            category: compile_selector(&selectors.category)?,
            title: compile_selector(&selectors.title)?,
            image: compile_selector(&selectors.image)?,
            link: compile_selector(&selectors.link)?,
        })
    }

    fn extract_entry(&self, post: ElementRef<'_>) -> PostEntry {
        PostEntry {
            category: first_text(post, &self.category),
            title: first_text(post, &self.title),
            image_link: first_attr(post, &self.image, "src"),
            url: first_attr(post, &self.link, "href")
                .and_then(|href| resolve_link(&self.base_url, &href)),
        }
    }
}

impl DocumentParser for PostListingParser {
    type Output = Vec<PostEntry>;

    fn parse_document(&self, html: &Html) -> Vec<PostEntry> {
        let entries: Vec<PostEntry> = html
            .select(&self.post)
            .map(|post| self.extract_entry(post))
            .collect();
        debug!("Parsed {} post entries", entries.len());
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PostListingParser {
        PostListingParser::new(
            Url::parse("https://books.example").unwrap(),
            &BrowserSourceSelectors::default(),
        )
        .unwrap()
    }

    #[test]
    fn extracts_post_fields() {
        let html = r#"
            <div class="post-content">
              <a href="/shop/moon-atlas/">
                <div class="post-header">Artists' Books</div>
                <div class="post-image"><img decoding="async" src="https://cdn.example/moon.jpg"></div>
                <h2 class="post-title">Moon Atlas</h2>
              </a>
            </div>
            <div class="post-content">
              <a href="https://elsewhere.example/item">
                <h2 class="post-title">Offsite</h2>
              </a>
            </div>
        "#;
        let entries = parser().parse(html).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category.as_deref(), Some("Artists' Books"));
        assert_eq!(entries[0].title.as_deref(), Some("Moon Atlas"));
        assert_eq!(entries[0].image_link.as_deref(), Some("https://cdn.example/moon.jpg"));
        assert_eq!(
            entries[0].url.as_ref().map(Url::as_str),
            Some("https://books.example/shop/moon-atlas/")
        );
        assert_eq!(
            entries[1].url.as_ref().map(Url::as_str),
            Some("https://elsewhere.example/item")
        );
        assert_eq!(entries[1].image_link, None);
    }

    #[test]
    fn lazy_images_without_async_decoding_are_ignored() {
        let html = r#"<div class="post-content"><div class="post-image"><img src="/x.jpg"></div></div>"#;
        let entries = parser().parse(html).unwrap();
        assert_eq!(entries[0].image_link, None);
        assert_eq!(entries[0].url, None);
    }

    #[test]
    fn record_carries_no_category() {
        let entry = PostEntry {
            category: Some("Zines".into()),
            title: Some("T".into()),
            image_link: None,
            url: None,
        };
        let record = entry.to_record();
        assert_eq!(record.title(), Some("T"));
        assert_eq!(record.url(), None);
        assert_eq!(record.brand(), None);
    }
}
