//! Error types for the stmt-core library.

use thiserror::Error;

/// Main error type for the stmt library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// The source document could not be split into pages.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Writing extracted records failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// The temporary page workspace could not be created.
    #[error("workspace error: {0}")]
    Workspace(std::io::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Fatal, document-level errors raised before any page exists.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// A page could not be written out as a standalone document.
    #[error("failed to materialize page {page}: {reason}")]
    Materialize { page: u32, reason: String },
}

/// Errors building a transaction record from an oracle row.
///
/// Any of these turns the whole page into a parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An amount is not a decimal number after normalization.
    #[error("failed to parse {field}: {value:?}")]
    Amount { field: &'static str, value: String },
}

/// Errors raised by record sinks.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to write.
    #[error("no transactions to write")]
    Empty,

    /// CSV delimiters must be a single ASCII character.
    #[error("invalid CSV delimiter: {0:?}")]
    Delimiter(char),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX workbook error.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the stmt library.
pub type Result<T> = std::result::Result<T, StmtError>;
