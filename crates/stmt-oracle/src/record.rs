//! Candidate transaction rows as returned by the oracle.

use serde::{Deserialize, Serialize};

/// One candidate transaction row, before normalization.
///
/// Field aliases accept the Spanish names (`fecha`, `descripcion`, ...) that
/// Spanish-language prompts ask for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction date, requested as `dd-mm-yyyy`.
    #[serde(alias = "fecha")]
    pub date: String,

    /// Description or label as printed on the statement.
    #[serde(alias = "descripcion")]
    pub description: String,

    /// Debit amount (money out), if any.
    #[serde(default, alias = "debito")]
    pub debit: Option<RawAmount>,

    /// Credit amount (money in), if any.
    #[serde(default, alias = "credito")]
    pub credit: Option<RawAmount>,
}

impl RawTransaction {
    /// Create a row with textual amounts.
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        debit: Option<&str>,
        credit: Option<&str>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            debit: debit.map(RawAmount::from),
            credit: credit.map(RawAmount::from),
        }
    }
}

/// An amount exactly as the oracle wrote it.
///
/// Models return amounts either as JSON numbers or as formatted strings
/// such as `"1.234,56"`; only the latter go through separator inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}
