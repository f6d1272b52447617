//! Detail page parser for the browser-driven source

use scraper::{Html, Selector};

use super::config::BrowserSourceSelectors;
use super::{DocumentParser, ParsingResult, compile_selector, element_text, first_text};
use crate::domain::DetailFields;

pub struct PostDetailParser {
    brand: Selector,
    description_container: Selector,
    description: Selector,
}

impl PostDetailParser {
    pub fn new(selectors: &BrowserSourceSelectors) -> ParsingResult<Self> {
        Ok(Self {
            brand: compile_selector(&selectors.detail_brand)?,
            description_container: compile_selector(&selectors.detail_description_container)?,
            description: compile_selector(&selectors.detail_description)?,
        })
    }
}

impl DocumentParser for PostDetailParser {
    type Output = DetailFields;

    fn parse_document(&self, html: &Html) -> DetailFields {
        let brand = html.select(&self.brand).next().map(element_text);
        // only the first column is considered, as the site puts the blurb there
        let description = html
            .select(&self.description_container)
            .next()
            .and_then(|column| first_text(column, &self.description));
        DetailFields::new(brand, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PostDetailParser {
        PostDetailParser::new(&BrowserSourceSelectors::default()).unwrap()
    }

    #[test]
    fn extracts_subtitle_and_first_paragraph() {
        let html = r#"
            <h1 class="hero-title">Moon Atlas</h1>
            <h2 class="hero-subtitle">Jane Printer</h2>
            <div class="col"><p>Letterpress on cotton paper.</p><p>Signed.</p></div>
            <div class="col"><p>Other column</p></div>
        "#;
        let detail = parser().parse(html).unwrap();
        assert_eq!(detail.brand.as_deref(), Some("Jane Printer"));
        assert_eq!(detail.description.as_deref(), Some("Letterpress on cotton paper."));
    }

    #[test]
    fn first_column_without_paragraph_gives_null_description() {
        let html = r#"
            <div class="col"><span>no paragraph</span></div>
            <div class="col"><p>later paragraph</p></div>
        "#;
        let detail = parser().parse(html).unwrap();
        assert_eq!(detail.brand, None);
        assert_eq!(detail.description, None);
    }
}
