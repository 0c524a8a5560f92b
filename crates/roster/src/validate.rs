//! Input format checks.
//!
//! Pure, total predicates over operator input. None of them fail; each
//! returns a verdict that the form layer turns into a field error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Five digits, an optional hyphen, three digits.
const POSTAL_CODE_PATTERN: &str = r"^[0-9]{5}-?[0-9]{3}$";

/// Minimum number of digits a phone number must carry.
pub const MIN_PHONE_DIGITS: usize = 10;

fn postal_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(POSTAL_CODE_PATTERN).expect("postal code pattern is valid"))
}

/// Check a postal code such as `12345-678` or `12345678`.
#[must_use]
pub fn is_valid_postal_code(s: &str) -> bool {
    postal_code_regex().is_match(s)
}

/// Check that a phone number carries at least [`MIN_PHONE_DIGITS`] digits.
///
/// Every non-digit character is ignored, so `(11) 99999-9999` counts 11.
#[must_use]
pub fn is_valid_phone(s: &str) -> bool {
    s.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// Earliest accepted birth date.
#[must_use]
pub fn min_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Check that a birth date lies between 1900-01-01 and `today`, inclusive.
#[must_use]
pub fn is_valid_birth_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= min_birth_date() && date <= today
}
