//! Century pivot and month-length rules for the embedded birth date.

use chrono::{Datelike, NaiveDate};

/// Today's date in the local time zone.
///
/// This is the only place the wall clock is read.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Resolves a two digit year to a full year relative to `reference`.
///
/// Years up to and including the reference year's last two digits belong to
/// the 2000s; anything larger belongs to the 1900s. With a reference date in
/// 2026, `26` resolves to 2026 and `27` to 1927.
///
/// The result drifts as the reference date moves forward, so callers that
/// need stable results should pin the reference date.
#[must_use]
pub fn resolve_year(two_digit: u8, reference: NaiveDate) -> i32 {
    let pivot = reference.year().rem_euclid(100);
    let two_digit = i32::from(two_digit);
    if two_digit <= pivot {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Gregorian leap year rule.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, or `None` for an invalid
/// month.
#[must_use]
pub const fn days_in_month(year: i32, month: u8) -> Option<u8> {
    const DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    if month < 1 || month > 12 {
        return None;
    }
    if month == 2 && is_leap_year(year) {
        return Some(29);
    }
    Some(DAYS[month as usize - 1])
}
