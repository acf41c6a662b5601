//! Extraction oracle abstraction layer for stmt.
//!
//! This crate provides a unified interface for submitting one statement page
//! to an external document-understanding service:
//! - `ExtractionOracle`, the per-page capability the orchestrator drives
//! - the wire shape of candidate transaction rows and reply parsing
//! - `GeminiBackend`, the Google Gemini implementation (feature `gemini`)

mod backend;
mod error;
mod outcome;
mod prompt;
mod record;

pub use backend::{ExtractionOracle, PageSubmission};
pub use error::OracleError;
pub use outcome::{ExtractionOutcome, parse_reply};
pub use prompt::{EXTRACTION_INSTRUCTION, page_prompt, response_schema};
pub use record::{RawAmount, RawTransaction};

#[cfg(feature = "gemini")]
pub use backend::gemini::GeminiBackend;

/// Result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
