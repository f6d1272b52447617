//! Configuration infrastructure
//!
//! Contains configuration loading and management for both catalog sources,
//! the pacing policy, logging, and the downstream publisher.
//!
//! Configuration is resolved in three layers:
//! 1. Built-in defaults (`defaults` module)
//! 2. Optional config file (TOML or JSON)
//! 3. Environment variables prefixed with `HARVEST__` (credentials live here)

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::info;
use url::Url;

use crate::infrastructure::parsing::config::{BrowserSourceSelectors, StaticSourceSelectors};
use crate::infrastructure::parsing_error::ParsingResult;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server-rendered catalog (source A)
    pub static_source: StaticSourceConfig,

    /// Client-rendered catalog (source B)
    pub browser_source: BrowserSourceConfig,

    /// Fixed politeness delays
    pub pacing: PacingConfig,

    /// Plain HTTP client settings
    pub http: HttpConfig,

    /// Consolidation and output settings
    pub pipeline: PipelineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Downstream social publishing
    pub publishing: PublishingConfig,
}

/// Settings for the statically paginated catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSourceConfig {
    /// Site root, used to resolve relative links
    pub base_url: String,

    /// Path of the first listing page
    pub start_path: String,

    /// User agent sent with every request; the site rejects the default agent
    pub user_agent: String,

    pub selectors: StaticSourceSelectors,
}

/// Settings for the browser-driven catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSourceConfig {
    /// Site root, used to build listing URLs and resolve relative links
    pub base_url: String,

    /// Value of the `cats` query parameter
    pub category: String,

    /// First listing page (inclusive)
    pub first_page: u32,

    /// Last listing page (inclusive)
    pub last_page: u32,

    /// Run Chrome without a window
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,

    /// Additional command-line switches passed to the browser
    pub extra_args: Vec<String>,

    pub selectors: BrowserSourceSelectors,
}

/// Fixed delays between requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each detail fetch of the static source
    pub item_delay_ms: u64,

    /// Pause after each static listing page
    pub page_delay_ms: u64,

    /// Settle time after navigating to a browser listing page
    pub listing_settle_ms: u64,

    /// Settle time after navigating to a browser detail page
    pub detail_settle_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Whether to follow redirects
    pub follow_redirects: bool,
}

/// Which source's rows come first in the consolidated table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationOrder {
    #[default]
    StaticFirst,
    BrowserFirst,
}

/// Consolidation and persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub order: ConsolidationOrder,

    /// Keep rows collected before a walk aborted on a fatal error
    pub keep_partial_on_abort: bool,

    /// CSV file written by the `harvest` command
    pub output_path: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,

    /// Log file name inside the directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

/// How the publisher picks a row from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RowSelection {
    #[default]
    First,
    Random,
    Index(usize),
}

/// Downstream "create container, then publish" API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Versioned Graph API root
    pub api_base_url: String,

    /// Account the media is published to
    pub account_id: String,

    /// API access token; supply through `HARVEST__PUBLISHING__ACCESS_TOKEN`
    pub access_token: String,

    /// Wait between container creation and publishing
    pub publish_delay_ms: u64,

    pub row_selection: RowSelection,

    /// CSV file the `post` command reads
    pub input_path: PathBuf,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for StaticSourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::STATIC_BASE_URL.to_string(),
            start_path: defaults::STATIC_START_PATH.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            selectors: StaticSourceSelectors::default(),
        }
    }
}

impl Default for BrowserSourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BROWSER_BASE_URL.to_string(),
            category: defaults::BROWSER_CATEGORY.to_string(),
            first_page: defaults::BROWSER_FIRST_PAGE,
            last_page: defaults::BROWSER_LAST_PAGE,
            headless: true,
            chrome_executable: None,
            extra_args: Vec::new(),
            selectors: BrowserSourceSelectors::default(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            item_delay_ms: defaults::ITEM_DELAY_MS,
            page_delay_ms: defaults::PAGE_DELAY_MS,
            listing_settle_ms: defaults::LISTING_SETTLE_MS,
            detail_settle_ms: defaults::DETAIL_SETTLE_MS,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            order: ConsolidationOrder::default(),
            keep_partial_on_abort: true,
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            directory: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("chromiumoxide".to_string(), "warn".to_string());
                filters.insert("tungstenite".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::GRAPH_API_BASE_URL.to_string(),
            account_id: String::new(),
            access_token: String::new(),
            publish_delay_ms: defaults::PUBLISH_DELAY_MS,
            row_selection: RowSelection::default(),
            input_path: PathBuf::from(defaults::OUTPUT_PATH),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl StaticSourceConfig {
    /// Absolute URL of the first listing page
    pub fn start_url(&self) -> ParsingResult<Url> {
        utils::site_url(&self.base_url, &self.start_path)
    }
}

impl BrowserSourceConfig {
    /// Inclusive page range walked by the browser source
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.first_page..=self.last_page
    }
}

impl PacingConfig {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn listing_settle(&self) -> Duration {
        Duration::from_millis(self.listing_settle_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    /// No waiting at all; for tests and dry runs against local fixtures
    pub fn immediate() -> Self {
        Self {
            item_delay_ms: 0,
            page_delay_ms: 0,
            listing_settle_ms: 0,
            detail_settle_ms: 0,
        }
    }
}

impl AppConfig {
    /// Reject configurations that cannot produce a meaningful walk
    pub fn validate(&self) -> Result<()> {
        self.static_source
            .start_url()
            .context("Invalid static source URL")?;
        utils::site_root(&self.browser_source.base_url).context("Invalid browser source URL")?;
        ensure!(
            self.browser_source.first_page <= self.browser_source.last_page,
            "Browser source page range is empty: {}..={}",
            self.browser_source.first_page,
            self.browser_source.last_page
        );
        if self.static_source.user_agent.trim().is_empty() {
            bail!("Static source user agent must not be empty");
        }
        Ok(())
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config_path: PathBuf,
    /// An explicitly requested file must exist; the per-user default may not
    required: bool,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Manager for the per-user config file (optional on disk)
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self {
            config_path,
            required: false,
        })
    }

    /// Manager for an explicitly chosen config file (must exist)
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            required: true,
        }
    }

    /// Resolve defaults, file and environment into one validated config
    pub fn load_config(&self) -> Result<AppConfig> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .context("Failed to serialize default configuration")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(self.config_path.as_path()).required(self.required))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {:?}", self.config_path))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Configuration has an invalid shape")?;
        config.validate()?;

        info!("Loaded configuration (file: {:?})", self.config_path);
        Ok(config)
    }

    /// Save configuration to file as pretty JSON
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "catalog-harvester";
    pub const CONFIG_FILE_NAME: &str = "catalog_harvester.json";
    pub const ENV_PREFIX: &str = "HARVEST";

    pub const STATIC_BASE_URL: &str = "https://3ssstudios.com";
    pub const STATIC_START_PATH: &str = "/collections/publications";
    pub const USER_AGENT: &str = "Mozilla/5.0";

    pub const BROWSER_BASE_URL: &str = "https://centerforbookarts.org";
    pub const BROWSER_CATEGORY: &str = "artists-books";
    pub const BROWSER_FIRST_PAGE: u32 = 1;
    pub const BROWSER_LAST_PAGE: u32 = 5;

    pub const ITEM_DELAY_MS: u64 = 500;
    pub const PAGE_DELAY_MS: u64 = 1000;
    pub const LISTING_SETTLE_MS: u64 = 2000;
    pub const DETAIL_SETTLE_MS: u64 = 1500;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const OUTPUT_PATH: &str = "output.csv";

    pub const GRAPH_API_BASE_URL: &str = "https://graph.facebook.com/v19.0";
    pub const PUBLISH_DELAY_MS: u64 = 3000;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "catalog-harvester.log";
}

/// URL building helper functions
pub mod utils {
    use url::Url;

    use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

    /// The site root used for link resolution. A base with a path prefix
    /// (`https://host/shop`) is treated as a directory (`/shop/`).
    pub fn site_root(base_url: &str) -> ParsingResult<Url> {
        let mut root =
            Url::parse(base_url).map_err(|e| ParsingError::url_resolution(base_url, e, None))?;
        if !root.path().ends_with('/') {
            let directory = format!("{}/", root.path());
            root.set_path(&directory);
        }
        Ok(root)
    }

    /// A site path below `base_url`; a leading `/` does not escape the
    /// base's own path
    pub fn site_url(base_url: &str, path: &str) -> ParsingResult<Url> {
        site_root(base_url)?
            .join(path.trim_start_matches('/'))
            .map_err(|e| ParsingError::url_resolution(path, e, Some(base_url)))
    }

    /// Build the browser source listing URL for one page number:
    /// `{base}/book-shop?cats={category}&pg={page}`
    pub fn browser_listing_url(base_url: &str, category: &str, page: u32) -> ParsingResult<Url> {
        let mut url = site_url(base_url, "book-shop")?;
        url.query_pairs_mut()
            .append_pair("cats", category)
            .append_pair("pg", &page.to_string());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.browser_source.pages().count(), 5);
        assert_eq!(config.pipeline.order, ConsolidationOrder::StaticFirst);
    }

    #[test]
    fn start_url_joins_base_and_path() {
        let config = StaticSourceConfig::default();
        assert_eq!(
            config.start_url().unwrap().as_str(),
            "https://3ssstudios.com/collections/publications"
        );
    }

    #[test]
    fn browser_listing_url_matches_site_layout() {
        let url = utils::browser_listing_url("https://centerforbookarts.org", "artists-books", 3)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://centerforbookarts.org/book-shop?cats=artists-books&pg=3"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = utils::browser_listing_url("https://example.org/mirror", "zines", 1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/mirror/book-shop?cats=zines&pg=1"
        );

        let config = StaticSourceConfig {
            base_url: "https://example.org/mirror/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.start_url().unwrap().as_str(),
            "https://example.org/mirror/collections/publications"
        );
    }

    #[test]
    fn unparsable_base_is_a_url_resolution_error() {
        let err = utils::site_root("not a url").unwrap_err();
        assert!(matches!(
            err,
            crate::infrastructure::parsing_error::ParsingError::UrlResolutionFailed {
                base_url: None,
                ..
            }
        ));
    }

    #[test]
    fn empty_page_range_is_rejected() {
        let mut config = AppConfig::default();
        config.browser_source.first_page = 4;
        config.browser_source.last_page = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[browser_source]\nlast_page = 3\n\n[pipeline]\norder = \"browser_first\""
        )
        .unwrap();

        let config = ConfigManager::with_path(file.path()).load_config().unwrap();
        assert_eq!(config.browser_source.last_page, 3);
        assert_eq!(config.browser_source.first_page, 1);
        assert_eq!(config.pipeline.order, ConsolidationOrder::BrowserFirst);
        assert_eq!(config.static_source.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let manager = ConfigManager::with_path("/definitely/not/here/harvest.toml");
        assert!(manager.load_config().is_err());
    }

    #[tokio::test]
    async fn saved_defaults_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("harvest.json"));
        manager.save_config(&AppConfig::default()).await.unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.pacing.item_delay_ms, defaults::ITEM_DELAY_MS);
        assert_eq!(loaded.publishing.row_selection, RowSelection::First);
    }
}
