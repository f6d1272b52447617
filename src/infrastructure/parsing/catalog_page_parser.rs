//! Catalog page parser for the statically paginated source
//!
//! Extracts product cards (title, image, detail link) and discovers the next
//! page from the pagination buttons.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::config::StaticSourceSelectors;
use super::{DocumentParser, ParsingResult, compile_selector, element_text, first_attr, first_text, resolve_link};
use crate::domain::ItemRecord;

/// Glyphs that mark a pagination link as "forward"
const FORWARD_GLYPHS: [char; 4] = ['>', '→', '›', '»'];

/// Result of parsing one catalog page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Listing-stage records in page order (brand/description still null)
    pub items: Vec<ItemRecord>,
    /// Absolute URL of the following page; `None` ends pagination
    pub next_page: Option<Url>,
}

/// Parser for listing pages of the static source
pub struct CatalogPageParser {
    base_url: Url,
    container: Selector,
    item: Selector,
    image: Selector,
    title: Selector,
    link: Selector,
    pagination_link: Selector,
}

impl CatalogPageParser {
    pub fn new(base_url: Url, selectors: &StaticSourceSelectors) -> ParsingResult<Self> {
        Ok(Self {
            base_url,
            container: compile_selector(&selectors.catalog_container)?,
            item: compile_selector(&selectors.item)?,
            image: compile_selector(&selectors.image)?,
            title: compile_selector(&selectors.title)?,
            link: compile_selector(&selectors.link)?,
            pagination_link: compile_selector(&selectors.pagination_link)?,
        })
    }

    fn extract_item(&self, card: ElementRef<'_>) -> ItemRecord {
        let image_link = first_attr(card, &self.image, "src");
        let title = first_text(card, &self.title);
        let url = first_attr(card, &self.link, "href")
            .and_then(|href| resolve_link(&self.base_url, &href))
            .map(String::from);

        ItemRecord::from_listing(title, image_link, url)
    }

    /// First pagination link whose label reads "next" or shows a forward arrow
    fn find_next_page(&self, html: &Html) -> Option<Url> {
        html.select(&self.pagination_link)
            .filter(|link| is_next_label(&element_text(*link)))
            .filter_map(|link| link.value().attr("href"))
            .find_map(|href| resolve_link(&self.base_url, href))
    }
}

impl DocumentParser for CatalogPageParser {
    type Output = CatalogPage;

    fn parse_document(&self, html: &Html) -> CatalogPage {
        let Some(container) = html.select(&self.container).next() else {
            debug!("Catalog container not found; treating page as empty");
            return CatalogPage::default();
        };

        let items: Vec<ItemRecord> = container
            .select(&self.item)
            .map(|card| self.extract_item(card))
            .collect();
        let next_page = self.find_next_page(html);

        debug!(
            "Parsed {} catalog items (next page: {})",
            items.len(),
            next_page.as_ref().map_or("none", Url::as_str)
        );

        CatalogPage { items, next_page }
    }
}

/// Whether a pagination label points forward
pub fn is_next_label(label: &str) -> bool {
    label.to_lowercase().contains("next") || label.contains(FORWARD_GLYPHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parser() -> CatalogPageParser {
        CatalogPageParser::new(
            Url::parse("https://shop.example").unwrap(),
            &StaticSourceSelectors::default(),
        )
        .unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
        <div class="grid grid--uniform grid--view-items">
          <div class="grid__item"><div class="grid-view-item">
            <a class="grid-view-item__link" href="/products/a">
              <img class="grid-view-item__image" src="//cdn.example/a.jpg">
              <div class="h4 grid-view-item__title">Book A</div>
            </a>
          </div></div>
          <div class="grid__item"><div class="grid-view-item">
            <a href="/products/b"><div class="h4 grid-view-item__title"> Book B </div></a>
          </div></div>
          <div class="grid__item"><div class="grid-view-item">
            <img class="grid-view-item__image" src="/c.jpg">
          </div></div>
        </div>
        <ul class="pagination">
          <li><a class="btn btn--secondary btn--narrow" href="/collections/publications?page=1">&larr;</a></li>
          <li><a class="btn btn--secondary btn--narrow" href="/collections/publications?page=3"><span>Next</span></a></li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn extracts_every_card_with_nullable_fields() {
        let page = parser().parse(PAGE).unwrap();

        assert_eq!(page.items.len(), 3);

        let first = &page.items[0];
        assert_eq!(first.title(), Some("Book A"));
        assert_eq!(first.image_link(), Some("//cdn.example/a.jpg"));
        assert_eq!(first.url(), Some("https://shop.example/products/a"));
        assert_eq!(first.brand(), None);
        assert_eq!(first.description(), None);

        assert_eq!(page.items[1].title(), Some("Book B"));
        assert_eq!(page.items[1].image_link(), None);

        assert_eq!(page.items[2].title(), None);
        assert_eq!(page.items[2].url(), None);
        assert_eq!(page.items[2].image_link(), Some("/c.jpg"));
    }

    #[test]
    fn discovers_next_page() {
        let page = parser().parse(PAGE).unwrap();
        assert_eq!(
            page.next_page.unwrap().as_str(),
            "https://shop.example/collections/publications?page=3"
        );
    }

    #[test]
    fn missing_container_is_empty_not_error() {
        let page = parser()
            .parse("<html><body><p>Nothing here</p></body></html>")
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn last_page_has_no_next_cursor() {
        let html = r#"
            <div class="grid grid--uniform grid--view-items"></div>
            <a class="btn btn--secondary btn--narrow" href="/collections/publications?page=2">Previous</a>
            <a class="btn btn--secondary btn--narrow" href="/collections/publications?page=1">1</a>
        "#;
        let page = parser().parse(html).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn blank_document_is_a_parse_error() {
        assert!(parser().parse("   \n").is_err());
    }

    #[rstest]
    #[case("Next", true)]
    #[case("next page", true)]
    #[case(">", true)]
    #[case("→", true)]
    #[case("»", true)]
    #[case("Previous", false)]
    #[case("2", false)]
    #[case("<", false)]
    fn next_label_detection(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(is_next_label(label), expected);
    }
}
