//! HTML parsing infrastructure
//!
//! One parser per page kind and source. Every parser owns its compiled
//! selectors and turns a raw document into owned values, so no `Html`
//! handle ever outlives the call (it is not `Send`).

pub mod catalog_detail_parser;
pub mod catalog_page_parser;
pub mod config;
pub mod error;
pub mod post_detail_parser;
pub mod post_listing_parser;

pub use catalog_detail_parser::CatalogDetailParser;
pub use catalog_page_parser::{CatalogPage, CatalogPageParser};
pub use config::{BrowserSourceSelectors, StaticSourceSelectors};
pub use error::{ParsingError, ParsingResult};
pub use post_detail_parser::PostDetailParser;
pub use post_listing_parser::{PostEntry, PostListingParser};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parser for one kind of page
pub trait DocumentParser {
    type Output;

    /// Extract from an already parsed document
    fn parse_document(&self, html: &Html) -> Self::Output;

    /// Parse raw markup. Blank input is the only structural failure; any
    /// markup html5ever accepts yields a document.
    fn parse(&self, raw: &str) -> ParsingResult<Self::Output> {
        if raw.trim().is_empty() {
            return Err(ParsingError::empty_document(None));
        }
        let html = Html::parse_document(raw);
        Ok(self.parse_document(&html))
    }
}

/// Compile one configured selector
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ParsingError::invalid_selector(selector, &format!("{e:?}")))
}

/// Descendant text with each text node trimmed and blank nodes skipped
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text of the first match of `selector` under `scope`
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(element_text)
}

/// Attribute of the first match of `selector` under `scope`
pub(crate) fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(ToString::to_string)
}

/// Resolve a link against the site root; absolute links pass through
pub(crate) fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    match base.join(href.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Could not resolve link '{}' against {}: {}", href, base, e);
            None
        }
    }
}
