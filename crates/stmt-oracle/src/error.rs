//! Error types for the oracle layer.

use thiserror::Error;

/// Errors that can occur while calling the extraction oracle.
///
/// Every variant is recoverable at document level: the page that produced
/// it contributes no transactions and processing moves on.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The backend is not usable (missing key, bad endpoint).
    #[error("oracle not configured: {0}")]
    Config(String),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service envelope could not be decoded.
    #[error("malformed service response: {0}")]
    Decode(String),

    /// The service answered without any candidate content.
    #[error("service returned no content")]
    EmptyResponse,
}
