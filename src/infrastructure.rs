//! Infrastructure layer: page fetching, browser sessions, HTML parsing,
//! configuration, logging and the CSV and publishing adapters.

pub mod browser;
pub mod config;
pub mod export;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod publisher;

pub use browser::{BrowserError, BrowserSession, ChromiumLauncher, ChromiumSession, SessionLauncher};
pub use config::{AppConfig, ConfigManager};
pub use export::{ExportError, read_table, write_table};
pub use http_client::{FetchError, HtmlFetcher, HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    CatalogDetailParser, CatalogPageParser, DocumentParser, ParsingError, ParsingResult,
    PostDetailParser, PostListingParser,
};
pub use publisher::{GraphPublisher, PublishError, PublishedPost};
