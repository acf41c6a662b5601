//! Statement date checks.
//!
//! The oracle is asked for `dd-mm-yyyy` dates. The pipeline never rejects a
//! row over its date; these helpers only back record validation reports.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Canonical statement date: DD-MM-YYYY.
    pub static ref DATE_CANONICAL: Regex = Regex::new(
        r"^(\d{2})-(\d{2})-(\d{4})$"
    ).unwrap();

    /// Day-first date with any common separator and 2- or 4-digit year.
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})$"
    ).unwrap();
}

/// Whether a date string is in the canonical `dd-mm-yyyy` form.
pub fn is_canonical_date(s: &str) -> bool {
    DATE_CANONICAL.is_match(s.trim())
}

/// Parse a day-first statement date (`15-01-2024`, `15.01.24`, `5/1/2024`).
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(s.trim())?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit years on statements are always recent.
        Some(2000 + year)
    } else {
        Some(year)
    }
}
