//! Per-page extraction outcome and raw-text reply parsing.

use serde_json::Value;

use crate::error::OracleError;
use crate::record::RawTransaction;

/// What one oracle call produced for one page.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The page yielded zero or more candidate rows.
    Success(Vec<RawTransaction>),

    /// The oracle answered, but its payload is not a valid list of rows.
    ParseFailure { raw_text: String, reason: String },

    /// The call itself failed.
    OracleFailure(OracleError),
}

impl ExtractionOutcome {
    /// Build a parse failure keeping the offending payload for diagnosis.
    pub fn parse_failure(raw_text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            raw_text: raw_text.into(),
            reason: reason.into(),
        }
    }

    /// Whether the page produced rows.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<OracleError> for ExtractionOutcome {
    fn from(err: OracleError) -> Self {
        Self::OracleFailure(err)
    }
}

/// Keys under which the row list may be wrapped.
const ENVELOPE_KEYS: [&str; 2] = ["transactions", "transacciones"];

/// Parse and validate a raw-text JSON reply.
///
/// Accepts `{"transactions": [...]}` or a bare array, optionally wrapped in
/// a Markdown code fence. Anything else becomes a `ParseFailure`.
pub fn parse_reply(text: &str) -> ExtractionOutcome {
    let body = strip_code_fence(text);

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return ExtractionOutcome::parse_failure(text, format!("invalid JSON: {}", e)),
    };

    let rows = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => {
            match ENVELOPE_KEYS.iter().find_map(|key| map.remove(*key)) {
                Some(rows) => rows,
                None => {
                    return ExtractionOutcome::parse_failure(
                        text,
                        "object has no `transactions` list",
                    );
                }
            }
        }
        other => {
            return ExtractionOutcome::parse_failure(
                text,
                format!("expected an object or array, found {}", json_kind(&other)),
            );
        }
    };

    match serde_json::from_value::<Vec<RawTransaction>>(rows) {
        Ok(rows) => ExtractionOutcome::Success(rows),
        Err(e) => ExtractionOutcome::parse_failure(text, format!("invalid transaction rows: {}", e)),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (```json) up to the first newline.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawAmount;
    use pretty_assertions::assert_eq;

    fn rows(outcome: ExtractionOutcome) -> Vec<RawTransaction> {
        match outcome {
            ExtractionOutcome::Success(rows) => rows,
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_envelope() {
        let text = r#"{"transactions": [
            {"date": "01-03-2025", "description": "Salary", "debit": null, "credit": "2.500,00"},
            {"date": "02-03-2025", "description": "Groceries", "debit": "45,5", "credit": null}
        ]}"#;

        let rows = rows(parse_reply(text));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "Salary");
        assert_eq!(rows[1].debit, Some(RawAmount::from("45,5")));
    }

    #[test]
    fn test_parse_bare_array_in_code_fence() {
        let text = "```json\n[{\"date\": \"01-03-2025\", \"description\": \"Fee\", \"debit\": \"3,00\"}]\n```";

        let rows = rows(parse_reply(text));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Fee");
    }

    #[test]
    fn test_parse_spanish_envelope() {
        let text = r#"{"transacciones": [{"fecha": "01-03-2025", "descripcion": "Cuota", "debito": "12,00", "credito": null}]}"#;
        assert_eq!(rows(parse_reply(text)).len(), 1);
    }

    #[test]
    fn test_empty_list_is_success() {
        assert!(rows(parse_reply(r#"{"transactions": []}"#)).is_empty());
    }

    #[test]
    fn test_invalid_json_keeps_payload() {
        let text = "Sorry, I cannot read this page.";
        match parse_reply(text) {
            ExtractionOutcome::ParseFailure { raw_text, reason } => {
                assert_eq!(raw_text, text);
                assert!(reason.starts_with("invalid JSON"));
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_parse_failure() {
        assert!(matches!(
            parse_reply(r#"{"rows": []}"#),
            ExtractionOutcome::ParseFailure { .. }
        ));
        assert!(matches!(parse_reply("42"), ExtractionOutcome::ParseFailure { .. }));
        assert!(matches!(
            parse_reply(r#"[{"description": "no date"}]"#),
            ExtractionOutcome::ParseFailure { .. }
        ));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  []  "), "[]");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("```json\n{}\n```\n"), "{}");
    }
}
