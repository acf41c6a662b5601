//! Amount normalization for statement figures of unknown locale.
//!
//! Statements print amounts as `1.234,56`, `1,234.56`, `1 234,56` or plain
//! `741.00`. Which separator is the decimal point is inferred from the
//! formatting alone; there is no locale setting.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Normalize a numeric-looking string to a plain decimal string.
///
/// The result has at most one `.` and no grouping separators:
/// - both `.` and `,` present: the later one is the decimal point, the
///   other is grouping and is removed
/// - a separator appearing more than once is grouping and is removed
/// - a single `,` is grouping when exactly three digits follow it, and the
///   decimal point otherwise
/// - a single `.` is the decimal point unless exactly three digits follow
///   it and something precedes it
///
/// A lone separator followed by three digits is always read as grouping, so
/// `1.234` becomes `1234` even if the statement meant 1.234 units.
///
/// Text without any digit is returned unchanged.
pub fn normalize_amount(raw: &str) -> String {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return raw.to_string();
    }

    let s = raw.trim();

    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(comma)) => {
            if s.matches(',').count() > 1 || is_digit_group(&s[comma + 1..]) {
                s.replace(',', "")
            } else {
                s.replace(',', ".")
            }
        }
        (Some(dot), None) => {
            if s.matches('.').count() > 1 {
                return s.replace('.', "");
            }

            let integer_part = &s[..dot];
            if integer_part.is_empty() || !is_digit_group(&s[dot + 1..]) {
                s.to_string()
            } else {
                s.replace('.', "")
            }
        }
        (None, None) => s.to_string(),
    }
}

fn is_digit_group(s: &str) -> bool {
    s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a statement amount (e.g., "1.234,56 €", "-45,5" or "(12,00)") into a decimal.
///
/// Currency symbols, spaces and other decoration are dropped before the
/// separators are interpreted, so `1.234 €` reads the same as `1.234`.
/// Parentheses around the whole amount mark an accounting-style negative.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = Decimal::from_str(&normalize_amount(&cleaned)).ok()?;
    Some(if negative { -value } else { value })
}

/// Format an amount with exactly two decimal places (e.g., "1234.50").
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_both_separators() {
        assert_eq!(normalize_amount("1.234,56"), "1234.56");
        assert_eq!(normalize_amount("1,234.56"), "1234.56");
        assert_eq!(normalize_amount("12.345.678,90"), "12345678.90");
        assert_eq!(normalize_amount("12,345,678.90"), "12345678.90");
    }

    #[test]
    fn test_normalize_single_dot() {
        assert_eq!(normalize_amount("741.00"), "741.00");
        assert_eq!(normalize_amount("1.234"), "1234");
        assert_eq!(normalize_amount(".125"), ".125");
        assert_eq!(normalize_amount("3.5"), "3.5");
    }

    #[test]
    fn test_normalize_single_comma() {
        assert_eq!(normalize_amount("45,5"), "45.5");
        assert_eq!(normalize_amount("1234,56"), "1234.56");
        assert_eq!(normalize_amount("1,234"), "1234");
    }

    #[test]
    fn test_normalize_repeated_separator() {
        assert_eq!(normalize_amount("1.234.567"), "1234567");
        assert_eq!(normalize_amount("1,234,567"), "1234567");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_amount("  1234 "), "1234");
        assert_eq!(normalize_amount("N/A"), "N/A");
        assert_eq!(normalize_amount("n.a."), "n.a.");
        assert_eq!(normalize_amount(""), "");
    }

    #[test]
    fn test_normalize_idempotent_on_canonical() {
        for canonical in ["1234.56", "741.00", "0.5", "-12.30", "1234", ".125", "45.5"] {
            let once = normalize_amount(canonical);
            assert_eq!(once, canonical);
            assert_eq!(normalize_amount(&once), once);
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("1 234,56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("-45,5 €"), Some(Decimal::from_str("-45.5").unwrap()));
        assert_eq!(parse_amount("$1,234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_amount_currency_does_not_change_grouping() {
        assert_eq!(parse_amount("1.234 €"), parse_amount("1.234"));
        assert_eq!(parse_amount("1.234 €"), Some(Decimal::from(1234)));
        assert_eq!(parse_amount("1,234 $"), Some(Decimal::from(1234)));
        assert_eq!(parse_amount("EUR 12.345"), Some(Decimal::from(12345)));
        assert_eq!(parse_amount("1.234,56 EUR"), Some(Decimal::from_str("1234.56").unwrap()));
    }

    #[test]
    fn test_parse_amount_parenthesized_negative() {
        assert_eq!(parse_amount("(45,50)"), Some(Decimal::from_str("-45.50").unwrap()));
        assert_eq!(parse_amount(" (1.234,00 €) "), Some(Decimal::from_str("-1234.00").unwrap()));
        assert_eq!(parse_amount("()"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from_str("1234.5").unwrap()), "1234.50");
        assert_eq!(format_amount(Decimal::from_str("741").unwrap()), "741.00");
        assert_eq!(format_amount(Decimal::from_str("0.125").unwrap()), "0.13");
    }
}
