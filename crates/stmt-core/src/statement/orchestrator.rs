//! Per-page extraction orchestration.
//!
//! A document is split into single-page units which are submitted to the
//! oracle one at a time, in page order. Each page's outcome is folded into
//! the aggregate: rows from successful pages are normalized and appended,
//! failed pages are logged and skipped. Only a document that cannot be
//! split at all is fatal.

use std::time::Instant;

use serde::Serialize;
use stmt_oracle::{ExtractionOracle, ExtractionOutcome, PageSubmission, RawTransaction};
use tracing::{debug, info, warn};

use crate::error::{RecordError, StmtError};
use crate::models::config::{ExtractionConfig, StmtConfig, WorkspaceConfig};
use crate::models::transaction::TransactionRecord;
use crate::pdf::{LopdfSplitter, PageSplitter, PageUnit, Workspace};
use crate::Result;

/// Callback invoked before each page submission with `(page, page_count)`.
pub type ProgressFn = Box<dyn Fn(u32, u32) + Send + Sync>;

/// Ordered transactions extracted from one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedResult {
    /// Records in page order, then in the order the oracle returned them.
    pub transactions: Vec<TransactionRecord>,
    /// Number of pages the document split into.
    pub page_count: u32,
    /// Pages whose oracle call or reply parsing failed.
    pub failed_pages: Vec<u32>,
    /// Pages not submitted because of the page limit.
    pub skipped_pages: Vec<u32>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl AggregatedResult {
    /// Number of extracted transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Drives split, per-page extraction, normalization and aggregation.
pub struct PageExtractionOrchestrator<O, S = LopdfSplitter> {
    oracle: O,
    splitter: S,
    workspace: WorkspaceConfig,
    extraction: ExtractionConfig,
    progress: Option<ProgressFn>,
}

impl<O: ExtractionOracle> PageExtractionOrchestrator<O, LopdfSplitter> {
    /// Create an orchestrator with the lopdf splitter and default settings.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            splitter: LopdfSplitter::new(),
            workspace: WorkspaceConfig::default(),
            extraction: ExtractionConfig::default(),
            progress: None,
        }
    }

    /// Create an orchestrator using the workspace and extraction settings of `config`.
    pub fn from_config(oracle: O, config: &StmtConfig) -> Self {
        Self::new(oracle)
            .with_workspace(config.workspace.clone())
            .with_extraction(config.extraction.clone())
    }
}

impl<O: ExtractionOracle, S: PageSplitter> PageExtractionOrchestrator<O, S> {
    /// Replace the page splitter.
    pub fn with_splitter<T: PageSplitter>(self, splitter: T) -> PageExtractionOrchestrator<O, T> {
        PageExtractionOrchestrator {
            oracle: self.oracle,
            splitter,
            workspace: self.workspace,
            extraction: self.extraction,
            progress: self.progress,
        }
    }

    /// Set the workspace policy.
    pub fn with_workspace(mut self, workspace: WorkspaceConfig) -> Self {
        self.workspace = workspace;
        self
    }

    /// Set orchestration limits and logging policy.
    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    /// Set a progress callback.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(u32, u32) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// The oracle in use.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Extract every transaction from a document.
    ///
    /// Returns `StmtError::Document` if the document cannot be split; per-page
    /// failures never surface as errors. An empty result is a valid outcome.
    pub async fn extract_document(&self, document: &[u8]) -> Result<AggregatedResult> {
        let start = Instant::now();
        let workspace = Workspace::acquire(&self.workspace).map_err(StmtError::Workspace)?;

        let result = self.process(document, &workspace).await;

        // A panic inside `process` still removes the directory through Drop.
        if let Err(e) = workspace.close() {
            warn!("Failed to remove page workspace: {}", e);
        }

        let mut result = result?;
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extracted {} transactions from {} pages ({} failed) in {}ms",
            result.len(),
            result.page_count,
            result.failed_pages.len(),
            result.processing_time_ms
        );

        Ok(result)
    }

    async fn process(&self, document: &[u8], workspace: &Workspace) -> Result<AggregatedResult> {
        let pages = self.splitter.split(document, workspace)?;
        let page_count = pages.len() as u32;

        let mut result = AggregatedResult {
            page_count,
            ..AggregatedResult::default()
        };

        if pages.is_empty() {
            warn!("Document has no pages, nothing to extract");
            return Ok(result);
        }

        debug!("Submitting {} pages to {}", page_count, self.oracle.name());

        let limit = match self.extraction.max_pages {
            0 => usize::MAX,
            n => n,
        };

        for (index, page) in pages.into_iter().enumerate() {
            let number = page.number();

            if index >= limit {
                debug!("Page {}: over the {} page limit, not submitted", number, limit);
                result.skipped_pages.push(number);
                continue;
            }

            if let Some(progress) = &self.progress {
                progress(number, page_count);
            }

            let outcome = self.submit(&page, page_count).await;
            // The page's temp file goes away as soon as its call is done.
            drop(page);

            self.absorb(&mut result, number, outcome);
        }

        if !result.skipped_pages.is_empty() {
            warn!(
                "Page limit {} reached, {} pages not submitted",
                limit,
                result.skipped_pages.len()
            );
        }

        Ok(result)
    }

    async fn submit(&self, page: &PageUnit, page_count: u32) -> PageOutcome {
        let data = match page.read() {
            Ok(data) => data,
            Err(e) => return PageOutcome::Unreadable(e),
        };

        let submission = PageSubmission::pdf(page.number(), page_count, &data);
        PageOutcome::Oracle(self.oracle.extract(&submission).await)
    }

    fn absorb(&self, result: &mut AggregatedResult, page: u32, outcome: PageOutcome) {
        let outcome = match outcome {
            PageOutcome::Oracle(outcome) => outcome,
            PageOutcome::Unreadable(e) => {
                warn!("Page {}: failed to read materialized page: {}", page, e);
                result.failed_pages.push(page);
                return;
            }
        };

        match outcome {
            ExtractionOutcome::Success(rows) => match build_records(&rows) {
                Ok(records) => {
                    debug!("Page {}: {} transactions", page, records.len());
                    result.transactions.extend(records);
                }
                Err(e) => {
                    let raw_text = serde_json::to_string(&rows).unwrap_or_default();
                    self.log_parse_failure(page, &raw_text, &e.to_string());
                    result.failed_pages.push(page);
                }
            },
            ExtractionOutcome::ParseFailure { raw_text, reason } => {
                self.log_parse_failure(page, &raw_text, &reason);
                result.failed_pages.push(page);
            }
            ExtractionOutcome::OracleFailure(e) => {
                warn!("Page {}: oracle call failed: {}", page, e);
                result.failed_pages.push(page);
            }
        }
    }

    fn log_parse_failure(&self, page: u32, raw_text: &str, reason: &str) {
        warn!(
            "Page {}: unusable oracle reply ({}); payload: {}",
            page,
            reason,
            truncate(raw_text, self.extraction.log_payload_chars)
        );
    }
}

/// What happened to one page, before folding.
enum PageOutcome {
    Oracle(ExtractionOutcome),
    Unreadable(std::io::Error),
}

fn build_records(rows: &[RawTransaction]) -> std::result::Result<Vec<TransactionRecord>, RecordError> {
    rows.iter().map(TransactionRecord::from_raw).collect()
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
