//! Runs both walkers in turn and consolidates what they collected

use std::fmt;
use tracing::{error, info};

use super::{BrowserWalker, CrawlError, SourceWalker, StaticWalker, WalkAborted, consolidate};
use crate::domain::{ConsolidatedTable, ItemRecord, SourceKind};
use crate::infrastructure::config::{AppConfig, ConsolidationOrder, PipelineConfig};

/// How one source's walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Completed { rows: usize },
    Aborted { rows_kept: usize, error: String },
    Skipped,
}

impl SourceOutcome {
    pub fn rows(&self) -> usize {
        match self {
            Self::Completed { rows } => *rows,
            Self::Aborted { rows_kept, .. } => *rows_kept,
            Self::Skipped => 0,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed { rows } => write!(f, "completed, {rows} rows"),
            Self::Aborted { rows_kept, error } => {
                write!(f, "aborted ({error}), {rows_kept} rows kept")
            }
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug)]
pub struct HarvestReport {
    pub table: ConsolidatedTable,
    pub static_source: SourceOutcome,
    pub browser_source: SourceOutcome,
}

impl HarvestReport {
    /// No source aborted
    pub fn is_complete(&self) -> bool {
        !self.static_source.is_aborted() && !self.browser_source.is_aborted()
    }
}

pub struct Pipeline {
    static_walker: Option<Box<dyn SourceWalker>>,
    browser_walker: Option<Box<dyn SourceWalker>>,
    order: ConsolidationOrder,
    keep_partial_on_abort: bool,
}

impl Pipeline {
    /// A pipeline with no sources; add them with the `with_*` methods
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            static_walker: None,
            browser_walker: None,
            order: config.order,
            keep_partial_on_abort: config.keep_partial_on_abort,
        }
    }

    #[must_use]
    pub fn with_static_walker(mut self, walker: impl SourceWalker + 'static) -> Self {
        self.static_walker = Some(Box::new(walker));
        self
    }

    #[must_use]
    pub fn with_browser_walker(mut self, walker: impl SourceWalker + 'static) -> Self {
        self.browser_walker = Some(Box::new(walker));
        self
    }

    /// Pipeline over the live sites
    pub fn from_config(
        config: &AppConfig,
        skip_static: bool,
        skip_browser: bool,
    ) -> Result<Self, CrawlError> {
        let mut pipeline = Self::new(&config.pipeline);
        if !skip_static {
            pipeline = pipeline.with_static_walker(StaticWalker::from_config(config)?);
        }
        if !skip_browser {
            pipeline = pipeline.with_browser_walker(BrowserWalker::from_config(config)?);
        }
        Ok(pipeline)
    }

    pub async fn run(&self) -> HarvestReport {
        let (static_rows, static_source) = self.run_source(self.static_walker.as_deref()).await;
        let (browser_rows, browser_source) =
            self.run_source(self.browser_walker.as_deref()).await;

        let table = consolidate(static_rows, browser_rows, self.order);
        info!(
            "🏁 Harvest finished: {} rows (static: {}; browser: {})",
            table.len(),
            static_source,
            browser_source
        );

        HarvestReport {
            table,
            static_source,
            browser_source,
        }
    }

    async fn run_source(
        &self,
        walker: Option<&dyn SourceWalker>,
    ) -> (Vec<ItemRecord>, SourceOutcome) {
        let Some(walker) = walker else {
            return (Vec::new(), SourceOutcome::Skipped);
        };

        info!("🚀 Walking {} source", walker.kind());
        match walker.walk().await {
            Ok(rows) => {
                let outcome = SourceOutcome::Completed { rows: rows.len() };
                (rows, outcome)
            }
            Err(aborted) => self.handle_abort(aborted),
        }
    }

    fn handle_abort(&self, aborted: WalkAborted) -> (Vec<ItemRecord>, SourceOutcome) {
        error!("❌ {}", aborted);

        let WalkAborted {
            kind,
            partial,
            error,
            ..
        } = aborted;
        let rows = if self.keep_partial_on_abort {
            partial
        } else {
            if !partial.is_empty() {
                info!("Discarding {} partial {} rows", partial.len(), kind);
            }
            Vec::new()
        };

        let outcome = SourceOutcome::Aborted {
            rows_kept: rows.len(),
            error: error.to_string(),
        };
        (rows, outcome)
    }

    pub fn has_source(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Static => self.static_walker.is_some(),
            SourceKind::Browser => self.browser_walker.is_some(),
        }
    }
}
