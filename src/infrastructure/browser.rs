//! Controlled browser sessions for client-rendered catalogs
//!
//! A session is acquired once per walk through a [`SessionLauncher`] and must
//! be released with [`BrowserSession::shutdown`]. `ChromiumSession` also
//! tears itself down on drop, so a panic or a cancelled future cannot leak
//! the Chrome process.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::infrastructure::config::BrowserSourceConfig;

/// Chrome switch required for headless runs on hosts without a GPU
const DISABLE_GPU_ARG: &str = "--disable-gpu";

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser configuration error: {0}")]
    Config(String),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Failed to read rendered document: {0}")]
    Content(String),

    #[error("Failed to close browser: {0}")]
    Shutdown(String),

    #[error("Browser session already closed")]
    Closed,
}

/// One open browser tab that can be pointed at URLs
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` in the session's tab
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Serialized DOM of the current document, after script execution
    async fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Release the browser. Safe to call more than once.
    async fn shutdown(&mut self) -> Result<(), BrowserError>;
}

/// Acquires browser sessions
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, BrowserError>;
}

/// Launch options for a local Chrome/Chromium
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headless: bool,
    executable: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl ChromiumLauncher {
    pub fn new(headless: bool) -> Self {
        Self {
            headless,
            executable: None,
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &BrowserSourceConfig) -> Self {
        Self {
            headless: config.headless,
            executable: config.chrome_executable.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Switches passed to the browser process
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![DISABLE_GPU_ARG.to_string()];
        args.extend(
            self.extra_args
                .iter()
                .filter(|arg| arg.as_str() != DISABLE_GPU_ARG)
                .cloned(),
        );
        args
    }

    fn browser_config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder().args(self.args());
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(BrowserError::Config)
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, BrowserError> {
        let config = self.browser_config()?;

        debug!("Launching browser (headless: {})", self.headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // the CDP connection only makes progress while its handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        let mut session = ChromiumSession {
            browser: Some(browser),
            page: None,
            handler_task: Some(handler_task),
        };

        let page = match session.browser_ref()?.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = session.shutdown().await {
                    warn!("Failed to close browser after setup error: {}", close_err);
                }
                return Err(BrowserError::Launch(format!("could not open a tab: {e}")));
            }
        };
        session.page = Some(page);

        info!("🧭 Browser session started");
        Ok(session)
    }
}

/// A running Chrome process with one tab
pub struct ChromiumSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
}

impl ChromiumSession {
    fn browser_ref(&self) -> Result<&Browser, BrowserError> {
        self.browser.as_ref().ok_or(BrowserError::Closed)
    }

    fn page_ref(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::Closed)
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page_ref()?
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.page_ref()?
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn shutdown(&mut self) -> Result<(), BrowserError> {
        self.page = None;
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        let closed = stop_process(&mut browser).await;
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        info!("🧭 Browser session closed");
        closed
    }
}

/// Process-level control over a launched browser
#[async_trait]
trait BrowserProcess: Send {
    /// Ask the browser to close over CDP
    async fn request_close(&mut self) -> Result<(), String>;

    /// `None` when the process was already reaped
    async fn force_kill(&mut self) -> Option<std::io::Result<()>>;

    async fn wait_exit(&mut self) -> std::io::Result<()>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn request_close(&mut self) -> Result<(), String> {
        self.close().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn force_kill(&mut self) -> Option<std::io::Result<()>> {
        self.kill().await
    }

    async fn wait_exit(&mut self) -> std::io::Result<()> {
        self.wait().await.map(|_| ())
    }
}

/// Close the browser and reap its process. A failed close means the CDP
/// link is gone, so the process is killed before waiting on it.
async fn stop_process<P: BrowserProcess>(process: &mut P) -> Result<(), BrowserError> {
    let closed = process
        .request_close()
        .await
        .map_err(BrowserError::Shutdown);

    if let Err(e) = &closed {
        warn!("{}; killing browser process", e);
        if let Some(Err(kill_err)) = process.force_kill().await {
            warn!("Failed to kill browser process: {}", kill_err);
        }
    }
    if let Err(e) = process.wait_exit().await {
        warn!("Browser process did not exit cleanly: {}", e);
    }
    closed
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if self.browser.is_some() {
            // dropping `Browser` kills the child process
            warn!("Browser session dropped without shutdown; killing browser");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_is_always_disabled() {
        let launcher = ChromiumLauncher::new(true);
        assert_eq!(launcher.args(), vec!["--disable-gpu".to_string()]);
    }

    #[test]
    fn extra_args_are_appended_once() {
        let config = BrowserSourceConfig {
            extra_args: vec!["--disable-gpu".into(), "--no-sandbox".into()],
            ..Default::default()
        };
        let launcher = ChromiumLauncher::from_config(&config);
        assert_eq!(
            launcher.args(),
            vec!["--disable-gpu".to_string(), "--no-sandbox".to_string()]
        );
    }

    #[derive(Default)]
    struct ScriptedProcess {
        close_fails: bool,
        calls: Vec<&'static str>,
    }

    #[async_trait]
    impl BrowserProcess for ScriptedProcess {
        async fn request_close(&mut self) -> Result<(), String> {
            self.calls.push("close");
            if self.close_fails {
                Err("connection closed".into())
            } else {
                Ok(())
            }
        }

        async fn force_kill(&mut self) -> Option<std::io::Result<()>> {
            self.calls.push("kill");
            Some(Ok(()))
        }

        async fn wait_exit(&mut self) -> std::io::Result<()> {
            self.calls.push("wait");
            Ok(())
        }
    }

    #[tokio::test]
    async fn clean_close_waits_without_killing() {
        let mut process = ScriptedProcess::default();
        stop_process(&mut process).await.unwrap();
        assert_eq!(process.calls, ["close", "wait"]);
    }

    #[tokio::test]
    async fn failed_close_kills_before_waiting() {
        let mut process = ScriptedProcess {
            close_fails: true,
            ..Default::default()
        };

        let result = stop_process(&mut process).await;

        assert!(matches!(result, Err(BrowserError::Shutdown(_))));
        assert_eq!(process.calls, ["close", "kill", "wait"]);
    }

    #[tokio::test]
    async fn missing_executable_fails_to_launch() {
        let config = BrowserSourceConfig {
            chrome_executable: Some(PathBuf::from("/nonexistent/chrome-binary")),
            ..Default::default()
        };
        let result = ChromiumLauncher::from_config(&config).launch().await;
        assert!(matches!(
            result,
            Err(BrowserError::Launch(_) | BrowserError::Config(_))
        ));
    }
}
