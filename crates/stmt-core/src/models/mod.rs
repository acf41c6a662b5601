//! Data models and configuration.

pub mod config;
pub mod transaction;

pub use config::{ExtractionConfig, OracleConfig, OutputConfig, PageStorage, StmtConfig, WorkspaceConfig};
pub use transaction::TransactionRecord;
