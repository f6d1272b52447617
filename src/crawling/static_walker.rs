//! Walker for the server-rendered catalog
//!
//! Follows "next" links from the start page until a page has none, visiting
//! every product's detail page on the way. Output order is page order, then
//! card order within a page.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::{CrawlError, DetailExtractor, SourceWalker, WalkAborted, WalkResult};
use crate::domain::{ItemRecord, SourceKind};
use crate::infrastructure::config::{AppConfig, PacingConfig, StaticSourceConfig, utils};
use crate::infrastructure::parsing::{CatalogPage, CatalogPageParser, DocumentParser};
use crate::infrastructure::{HtmlFetcher, HttpClient, HttpClientConfig};

pub struct StaticWalker<F> {
    fetcher: Arc<F>,
    page_parser: CatalogPageParser,
    details: DetailExtractor<F>,
    start_url: Url,
    pacing: PacingConfig,
}

impl StaticWalker<HttpClient> {
    /// Walker over the live site using a `reqwest` client
    pub fn from_config(config: &AppConfig) -> Result<Self, CrawlError> {
        let client = HttpClient::with_config(HttpClientConfig::from_app_config(
            &config.static_source,
            &config.http,
        ))
        .map_err(|e| CrawlError::Configuration(e.to_string()))?;

        Self::new(Arc::new(client), &config.static_source, config.pacing.clone())
    }
}

impl<F: HtmlFetcher> StaticWalker<F> {
    pub fn new(
        fetcher: Arc<F>,
        source: &StaticSourceConfig,
        pacing: PacingConfig,
    ) -> Result<Self, CrawlError> {
        let site_root = utils::site_root(&source.base_url).map_err(CrawlError::InvalidUrl)?;
        let start_url = source.start_url().map_err(CrawlError::InvalidUrl)?;
        // hrefs on every listing page resolve against the site root
        let page_parser = CatalogPageParser::new(site_root, &source.selectors)?;
        let details = DetailExtractor::new(Arc::clone(&fetcher), &source.selectors)?;

        Ok(Self {
            fetcher,
            page_parser,
            details,
            start_url,
            pacing,
        })
    }

    async fn fetch_listing(&self, page_url: &Url) -> Result<CatalogPage, CrawlError> {
        let body = self.fetcher.fetch_html(page_url.as_str()).await?;
        self.page_parser
            .parse(&body)
            .map_err(|e| CrawlError::ListingParse(e.with_url(page_url.as_str())))
    }

    /// Attach detail fields; items without a detail link keep them null
    async fn enrich(&self, item: ItemRecord) -> ItemRecord {
        let Some(url) = item.url().map(ToString::to_string) else {
            debug!("Item {:?} has no detail link", item.title());
            return item;
        };

        let detail = self.details.extract(&url).await;
        sleep(self.pacing.item_delay()).await;
        item.with_detail(detail)
    }
}

#[async_trait]
impl<F: HtmlFetcher> SourceWalker for StaticWalker<F> {
    fn kind(&self) -> SourceKind {
        SourceKind::Static
    }

    async fn walk(&self) -> WalkResult {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut pages_completed = 0;
        let mut cursor = Some(self.start_url.clone());

        while let Some(page_url) = cursor.take() {
            if !visited.insert(page_url.clone()) {
                warn!("Pagination returned to {}; stopping", page_url);
                break;
            }

            info!("Scraping: {}", page_url);
            let page = match self.fetch_listing(&page_url).await {
                Ok(page) => page,
                Err(error) => {
                    return Err(WalkAborted {
                        kind: SourceKind::Static,
                        partial: records,
                        pages_completed,
                        error,
                    });
                }
            };

            let item_count = page.items.len();
            for item in page.items {
                records.push(self.enrich(item).await);
            }
            pages_completed += 1;
            debug!("Page {} done: {} items", pages_completed, item_count);

            cursor = page.next_page;
            if cursor.is_some() {
                sleep(self.pacing.page_delay()).await;
            }
        }

        info!(
            "✅ Static source: {} items from {} pages",
            records.len(),
            pages_completed
        );
        Ok(records)
    }
}
