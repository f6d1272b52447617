//! # Crawling
//!
//! Source walkers, detail enrichment and the pipeline that merges both
//! sources into one table.
//!
//! Failure policy:
//! - a listing page that cannot be fetched ends that walker's traversal
//! - a detail page that cannot be fetched or parsed leaves brand and
//!   description null and the walk goes on

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ItemRecord, SourceKind};
use crate::infrastructure::{BrowserError, FetchError, ParsingError};

pub mod browser_walker;
pub mod consolidator;
pub mod detail_extractor;
pub mod pipeline;
pub mod static_walker;

#[cfg(test)]
mod test_support;

pub use browser_walker::BrowserWalker;
pub use consolidator::consolidate;
pub use detail_extractor::DetailExtractor;
pub use pipeline::{HarvestReport, Pipeline, SourceOutcome};
pub use static_walker::StaticWalker;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Listing page fetch failed: {0}")]
    PageFetch(#[from] FetchError),

    #[error("Listing page could not be parsed: {0}")]
    ListingParse(#[from] ParsingError),

    #[error("Browser session unavailable: {0}")]
    SessionUnavailable(#[source] BrowserError),

    #[error("Listing page could not be loaded: {0}")]
    Navigation(#[source] BrowserError),

    #[error("Source URL could not be resolved: {0}")]
    InvalidUrl(#[source] ParsingError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A traversal that stopped before reaching its end
#[derive(Error, Debug)]
#[error("{kind} walk aborted after {pages_completed} page(s): {error}")]
pub struct WalkAborted {
    pub kind: SourceKind,
    /// Records completed before the failure
    pub partial: Vec<ItemRecord>,
    pub pages_completed: u32,
    #[source]
    pub error: CrawlError,
}

pub type WalkResult = Result<Vec<ItemRecord>, WalkAborted>;

/// One catalog source, walked from its first listing page to its last
#[async_trait]
pub trait SourceWalker: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn walk(&self) -> WalkResult;
}
