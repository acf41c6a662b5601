//! Transaction ledger data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stmt_oracle::{RawAmount, RawTransaction};

use crate::error::RecordError;
use crate::statement::amounts::parse_amount;
use crate::statement::dates::{is_canonical_date, parse_statement_date};

/// One normalized statement transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date, expected as `dd-mm-yyyy` (not enforced).
    pub date: String,

    /// Description or label as printed on the statement.
    pub description: String,

    /// Money out.
    pub debit: Option<Decimal>,

    /// Money in.
    pub credit: Option<Decimal>,
}

impl TransactionRecord {
    /// Create a record from already-typed values.
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        debit: Option<Decimal>,
        credit: Option<Decimal>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            debit,
            credit,
        }
    }

    /// Build a record from an oracle row.
    ///
    /// Date and description must be non-blank. Textual amounts are
    /// normalized before decimal coercion; blank amounts count as absent.
    pub fn from_raw(raw: &RawTransaction) -> Result<Self, RecordError> {
        let date = raw.date.trim();
        if date.is_empty() {
            return Err(RecordError::MissingField("date"));
        }

        let description = raw.description.trim();
        if description.is_empty() {
            return Err(RecordError::MissingField("description"));
        }

        Ok(Self {
            date: date.to_string(),
            description: description.to_string(),
            debit: coerce_amount("debit", raw.debit.as_ref())?,
            credit: coerce_amount("credit", raw.credit.as_ref())?,
        })
    }

    /// Signed movement: credit minus debit.
    pub fn net_amount(&self) -> Decimal {
        self.credit.unwrap_or_default() - self.debit.unwrap_or_default()
    }

    /// Check the record against what downstream consumers expect.
    ///
    /// Returns human-readable issues; an empty list means the record looks
    /// well-formed.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !is_canonical_date(&self.date) {
            issues.push(format!("date {:?} is not in dd-mm-yyyy form", self.date));
        } else if parse_statement_date(&self.date).is_none() {
            issues.push(format!("date {:?} is not a calendar date", self.date));
        }

        match (self.debit, self.credit) {
            (Some(_), Some(_)) => issues.push("both debit and credit are set".to_string()),
            (None, None) => issues.push("neither debit nor credit is set".to_string()),
            _ => {}
        }

        for (field, value) in [("debit", self.debit), ("credit", self.credit)] {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                issues.push(format!("{} is negative", field));
            }
        }

        issues
    }
}

fn coerce_amount(
    field: &'static str,
    raw: Option<&RawAmount>,
) -> Result<Option<Decimal>, RecordError> {
    let (text, parsed) = match raw {
        None => return Ok(None),
        Some(RawAmount::Text(s)) if s.trim().is_empty() => return Ok(None),
        // Numbers are already canonical; only text goes through separator inference.
        Some(RawAmount::Number(n)) => {
            let text = n.to_string();
            let parsed = text.parse::<Decimal>().ok();
            (text, parsed)
        }
        Some(RawAmount::Text(s)) => (s.clone(), parse_amount(s)),
    };

    parsed
        .map(Some)
        .ok_or(RecordError::Amount { field, value: text })
}
