//! Core library for bank statement transaction extraction.
//!
//! This crate provides:
//! - PDF page splitting into self-contained single-page documents
//! - Scoped temp workspaces for materialized pages
//! - Per-page oracle orchestration with failure isolation
//! - Locale-agnostic amount normalization
//! - CSV, JSON and text record sinks

pub mod error;
pub mod export;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{DocumentError, ExportError, RecordError, Result, StmtError};
pub use models::config::StmtConfig;
pub use models::transaction::TransactionRecord;
pub use pdf::{LopdfSplitter, PageSplitter, PageUnit, Workspace};
pub use statement::{AggregatedResult, PageExtractionOrchestrator, normalize_amount};

/// Re-export oracle types.
pub use stmt_oracle::{ExtractionOracle, ExtractionOutcome, OracleError, PageSubmission, RawTransaction};
