//! Walker for the client-rendered catalog
//!
//! The catalog has no usable pagination signal, so a fixed range of listing
//! pages is visited through one browser session. Pages past the end of the
//! catalog simply render no posts.

use async_trait::async_trait;
use std::ops::RangeInclusive;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::{CrawlError, SourceWalker, WalkAborted, WalkResult};
use crate::domain::{DetailFields, ItemRecord, SourceKind};
use crate::infrastructure::config::{AppConfig, BrowserSourceConfig, PacingConfig, utils};
use crate::infrastructure::parsing::{DocumentParser, PostDetailParser, PostEntry, PostListingParser};
use crate::infrastructure::{BrowserSession, ChromiumLauncher, SessionLauncher};

pub struct BrowserWalker<L> {
    launcher: L,
    listing_parser: PostListingParser,
    detail_parser: PostDetailParser,
    base_url: String,
    category: String,
    pages: RangeInclusive<u32>,
    pacing: PacingConfig,
}

impl BrowserWalker<ChromiumLauncher> {
    /// Walker driving a local Chrome
    pub fn from_config(config: &AppConfig) -> Result<Self, CrawlError> {
        Self::new(
            ChromiumLauncher::from_config(&config.browser_source),
            &config.browser_source,
            config.pacing.clone(),
        )
    }
}

impl<L: SessionLauncher> BrowserWalker<L> {
    pub fn new(
        launcher: L,
        source: &BrowserSourceConfig,
        pacing: PacingConfig,
    ) -> Result<Self, CrawlError> {
        let site_root = utils::site_root(&source.base_url).map_err(CrawlError::InvalidUrl)?;

        Ok(Self {
            launcher,
            listing_parser: PostListingParser::new(site_root, &source.selectors)?,
            detail_parser: PostDetailParser::new(&source.selectors)?,
            base_url: source.base_url.clone(),
            category: source.category.clone(),
            pages: source.pages(),
            pacing,
        })
    }

    fn listing_url(&self, page: u32) -> Result<Url, CrawlError> {
        utils::browser_listing_url(&self.base_url, &self.category, page)
            .map_err(CrawlError::InvalidUrl)
    }

    /// Render one listing page and read its posts
    async fn load_listing(
        &self,
        session: &mut L::Session,
        listing_url: &Url,
    ) -> Result<Vec<PostEntry>, CrawlError> {
        session
            .navigate(listing_url.as_str())
            .await
            .map_err(CrawlError::Navigation)?;
        sleep(self.pacing.listing_settle()).await;

        let source = session.page_source().await.map_err(CrawlError::Navigation)?;
        self.listing_parser
            .parse(&source)
            .map_err(|e| CrawlError::ListingParse(e.with_url(listing_url.as_str())))
    }

    async fn try_extract_detail(
        &self,
        session: &mut L::Session,
        url: &Url,
    ) -> Result<DetailFields, CrawlError> {
        session.navigate(url.as_str()).await.map_err(CrawlError::Navigation)?;
        sleep(self.pacing.detail_settle()).await;

        let source = session.page_source().await.map_err(CrawlError::Navigation)?;
        Ok(self.detail_parser.parse(&source)?)
    }

    /// Detail fields for one post; failures leave them null
    async fn extract_detail(&self, session: &mut L::Session, url: &Url) -> DetailFields {
        match self.try_extract_detail(session, url).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Error scraping detail page {}: {}", url, e);
                DetailFields::empty()
            }
        }
    }

    async fn walk_pages(
        &self,
        session: &mut L::Session,
        records: &mut Vec<ItemRecord>,
        pages_completed: &mut u32,
    ) -> Result<(), CrawlError> {
        for page in self.pages.clone() {
            let listing_url = self.listing_url(page)?;
            info!("Scraping: {}", listing_url);

            let entries = self.load_listing(session, &listing_url).await?;
            if entries.is_empty() {
                debug!("Listing page {} has no posts", page);
            }

            for entry in entries {
                debug!("Post {:?} (category: {:?})", entry.title, entry.category);
                let detail = match &entry.url {
                    Some(url) => self.extract_detail(session, url).await,
                    None => DetailFields::empty(),
                };
                records.push(entry.to_record().with_detail(detail));
            }
            *pages_completed += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl<L: SessionLauncher> SourceWalker for BrowserWalker<L> {
    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    async fn walk(&self) -> WalkResult {
        let mut session = self.launcher.launch().await.map_err(|e| WalkAborted {
            kind: SourceKind::Browser,
            partial: Vec::new(),
            pages_completed: 0,
            error: CrawlError::SessionUnavailable(e),
        })?;

        let mut records = Vec::new();
        let mut pages_completed = 0;
        let outcome = self
            .walk_pages(&mut session, &mut records, &mut pages_completed)
            .await;

        // released on success and on abort alike
        if let Err(e) = session.shutdown().await {
            warn!("Browser session did not close cleanly: {}", e);
        }

        match outcome {
            Ok(()) => {
                info!(
                    "✅ Browser source: {} items from {} pages",
                    records.len(),
                    pages_completed
                );
                Ok(records)
            }
            Err(error) => Err(WalkAborted {
                kind: SourceKind::Browser,
                partial: records,
                pages_completed,
                error,
            }),
        }
    }
}
