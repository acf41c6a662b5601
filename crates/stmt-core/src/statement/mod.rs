//! Statement extraction: per-page orchestration and field normalization.

pub mod amounts;
pub mod dates;
mod orchestrator;

pub use amounts::{format_amount, normalize_amount, parse_amount};
pub use dates::{is_canonical_date, parse_statement_date};
pub use orchestrator::{AggregatedResult, PageExtractionOrchestrator, ProgressFn};
