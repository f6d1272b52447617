//! In-memory fetcher and browser used by the walker tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::infrastructure::{BrowserError, BrowserSession, FetchError, HtmlFetcher, SessionLauncher};

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

/// Serves canned HTML by URL; anything else is a 404
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HtmlFetcher for FakeFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

/// What happened to the sessions a [`FakeLauncher`] handed out
#[derive(Debug, Default)]
pub struct SessionLog {
    pub launches: usize,
    pub navigations: Vec<String>,
    pub shutdowns: usize,
}

#[derive(Default)]
pub struct FakeLauncher {
    pages: Arc<HashMap<String, String>>,
    broken_urls: Arc<HashSet<String>>,
    fail_launch: bool,
    log: Arc<Mutex<SessionLog>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), html.to_string());
        self
    }

    /// Navigating to `url` fails
    pub fn with_broken_url(mut self, url: &str) -> Self {
        Arc::make_mut(&mut self.broken_urls).insert(url.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch("no browser binary".into()));
        }
        self.log.lock().unwrap().launches += 1;
        Ok(FakeSession {
            pages: Arc::clone(&self.pages),
            broken_urls: Arc::clone(&self.broken_urls),
            current: None,
            closed: false,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct FakeSession {
    pages: Arc<HashMap<String, String>>,
    broken_urls: Arc<HashSet<String>>,
    current: Option<String>,
    closed: bool,
    log: Arc<Mutex<SessionLog>>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::Closed);
        }
        self.log.lock().unwrap().navigations.push(url.to_string());
        if self.broken_urls.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".into(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        if self.closed {
            return Err(BrowserError::Closed);
        }
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .map_or_else(|| BLANK_PAGE.to_string(), Clone::clone))
    }

    async fn shutdown(&mut self) -> Result<(), BrowserError> {
        if !self.closed {
            self.closed = true;
            self.log.lock().unwrap().shutdowns += 1;
        }
        Ok(())
    }
}
