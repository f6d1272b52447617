//! Detail page parser for the statically paginated source
//!
//! Brand and description are both tagged with schema.org microdata
//! (`itemprop`), and either may be missing independently.

use scraper::{Html, Selector};

use super::config::StaticSourceSelectors;
use super::{DocumentParser, ParsingResult, compile_selector, element_text};
use crate::domain::DetailFields;

pub struct CatalogDetailParser {
    brand: Selector,
    description: Selector,
}

impl CatalogDetailParser {
    pub fn new(selectors: &StaticSourceSelectors) -> ParsingResult<Self> {
        Ok(Self {
            brand: compile_selector(&selectors.detail_brand)?,
            description: compile_selector(&selectors.detail_description)?,
        })
    }
}

impl DocumentParser for CatalogDetailParser {
    type Output = DetailFields;

    fn parse_document(&self, html: &Html) -> DetailFields {
        let brand = html.select(&self.brand).next().map(element_text);
        let description = html.select(&self.description).next().map(element_text);
        DetailFields::new(brand, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CatalogDetailParser {
        CatalogDetailParser::new(&StaticSourceSelectors::default()).unwrap()
    }

    #[test]
    fn extracts_brand_and_description() {
        let html = r#"
            <p itemprop="brand" class="product-single__vendor">Acme Press</p>
            <div itemprop="description" class="rte"><p>Risograph, 40 pages.</p><p>Edition of 100.</p></div>
        "#;
        let detail = parser().parse(html).unwrap();
        assert_eq!(detail.brand.as_deref(), Some("Acme Press"));
        assert_eq!(
            detail.description.as_deref(),
            Some("Risograph, 40 pages.Edition of 100.")
        );
    }

    #[test]
    fn description_absent_brand_present() {
        let detail = parser().parse(r#"<p itemprop="brand">Acme</p>"#).unwrap();
        assert_eq!(detail.brand.as_deref(), Some("Acme"));
        assert_eq!(detail.description, None);
    }

    #[test]
    fn brand_must_be_a_paragraph() {
        let detail = parser().parse(r#"<span itemprop="brand">Acme</span>"#).unwrap();
        assert!(detail.is_empty());
    }
}
