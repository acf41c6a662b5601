//! Extraction oracle backends.

#[cfg(feature = "gemini")]
pub mod gemini;

use std::future::Future;

use crate::ExtractionOutcome;

/// One page handed to the oracle.
#[derive(Debug, Clone, Copy)]
pub struct PageSubmission<'a> {
    /// Page number (1-indexed) within the source document.
    pub number: u32,
    /// Total number of pages in the source document.
    pub page_count: u32,
    /// MIME type of `data`.
    pub mime_type: &'a str,
    /// Self-contained page content.
    pub data: &'a [u8],
}

impl<'a> PageSubmission<'a> {
    /// A single-page PDF submission.
    pub fn pdf(number: u32, page_count: u32, data: &'a [u8]) -> Self {
        Self {
            number,
            page_count,
            mime_type: "application/pdf",
            data,
        }
    }
}

/// Trait for extraction oracles.
///
/// An oracle turns one page into candidate transaction rows. Calls may be
/// slow and may fail; a failure is reported through the returned outcome,
/// never by panicking, and is not retried by callers. Timeouts are the
/// backend's concern and surface as `ExtractionOutcome::OracleFailure`.
pub trait ExtractionOracle: Send + Sync {
    /// Submit one page and wait for its outcome.
    fn extract(
        &self,
        page: &PageSubmission<'_>,
    ) -> impl Future<Output = ExtractionOutcome> + Send;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
