//! Detail page enrichment for the static source
//!
//! Never fails: an unreachable or unparsable detail page is logged and
//! yields empty [`DetailFields`], so one bad product cannot stop a walk.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::DetailFields;
use crate::infrastructure::parsing::{CatalogDetailParser, DocumentParser, StaticSourceSelectors};
use crate::infrastructure::{HtmlFetcher, ParsingResult};

pub struct DetailExtractor<F> {
    fetcher: Arc<F>,
    parser: CatalogDetailParser,
}

impl<F: HtmlFetcher> DetailExtractor<F> {
    pub fn new(fetcher: Arc<F>, selectors: &StaticSourceSelectors) -> ParsingResult<Self> {
        Ok(Self {
            fetcher,
            parser: CatalogDetailParser::new(selectors)?,
        })
    }

    /// Brand and description from the product page at `url`
    pub async fn extract(&self, url: &str) -> DetailFields {
        let body = match self.fetcher.fetch_html(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Error scraping detail page {}: {}", url, e);
                return DetailFields::empty();
            }
        };

        match self.parser.parse(&body) {
            Ok(detail) => {
                debug!(
                    "Detail {}: brand={:?}, description={} chars",
                    url,
                    detail.brand,
                    detail.description.as_ref().map_or(0, String::len)
                );
                detail
            }
            Err(e) => {
                warn!("Error parsing detail page {}: {}", url, e.with_url(url));
                DetailFields::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawling::test_support::FakeFetcher;

    const PRODUCT_URL: &str = "https://shop.example.com/products/book-a";

    fn extractor(fetcher: FakeFetcher) -> DetailExtractor<FakeFetcher> {
        DetailExtractor::new(Arc::new(fetcher), &StaticSourceSelectors::default()).unwrap()
    }

    #[tokio::test]
    async fn brand_and_description_are_extracted() {
        let fetcher = FakeFetcher::new().with_page(
            PRODUCT_URL,
            r#"<p itemprop="brand">Acme</p><div itemprop="description">Nice</div>"#,
        );

        let detail = extractor(fetcher).extract(PRODUCT_URL).await;

        assert_eq!(detail.brand.as_deref(), Some("Acme"));
        assert_eq!(detail.description.as_deref(), Some("Nice"));
    }

    #[tokio::test]
    async fn missing_description_stays_null() {
        let fetcher =
            FakeFetcher::new().with_page(PRODUCT_URL, r#"<p itemprop="brand">Acme</p>"#);

        let detail = extractor(fetcher).extract(PRODUCT_URL).await;

        assert_eq!(detail.brand.as_deref(), Some("Acme"));
        assert_eq!(detail.description, None);
    }

    #[tokio::test]
    async fn unreachable_page_yields_empty_fields() {
        let detail = extractor(FakeFetcher::new()).extract(PRODUCT_URL).await;
        assert!(detail.is_empty());
    }

    #[tokio::test]
    async fn blank_page_yields_empty_fields() {
        let fetcher = FakeFetcher::new().with_page(PRODUCT_URL, "   ");
        let detail = extractor(fetcher).extract(PRODUCT_URL).await;
        assert!(detail.is_empty());
    }
}
