//! Input predicate checks (email, phone, date)
//!
//! These are independent of [`crate::format`]: a number accepted by
//! `format_phone_number` is not guaranteed to pass `validate_phone_number`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Email: something@something.something, no whitespace or extra '@'
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

// Dashed mobile number, ASCII digits only
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-[0-9]{4}-[0-9]{4}$").expect("phone regex is valid"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Validate email format
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a dashed phone number (`010-1234-5678`)
pub fn validate_phone_number(phone_number: &str) -> bool {
    PHONE_REGEX.is_match(phone_number)
}

/// Check that the string names a real calendar date.
///
/// Accepts RFC 3339, RFC 2822, bare years (`2024`), year-months (`2024-05`),
/// dates separated by `-`, `/` or `.`, and local date-times. Components out of
/// range (month 13, 30 February) are rejected.
pub fn validate_date(date_string: &str) -> bool {
    let s = date_string.trim();
    if s.is_empty() {
        return false;
    }

    if DateTime::parse_from_rfc3339(s).is_ok() || DateTime::parse_from_rfc2822(s).is_ok() {
        return true;
    }

    if DATE_FORMATS.iter().any(|f| NaiveDate::parse_from_str(s, f).is_ok()) {
        return true;
    }

    if DATE_TIME_FORMATS
        .iter()
        .any(|f| NaiveDateTime::parse_from_str(s, f).is_ok())
    {
        return true;
    }

    is_year_or_year_month(s)
}

/// `YYYY` or `YYYY-MM`
fn is_year_or_year_month(s: &str) -> bool {
    let mut parts = s.split('-');
    let year = parts.next().unwrap_or("");
    let month = parts.next();

    if parts.next().is_some() || year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match month {
        None => true,
        Some(m) => {
            m.len() == 2 && matches!(m.parse::<u32>(), Ok(month) if (1..=12).contains(&month))
        }
    }
}
