use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    calendar,
    checksum::{self, DoublingParity},
};

/// Number of digits in a normalised identity number.
pub const LEN: usize = 13;

/// Gender codes at or above this value denote male.
pub const MALE_THRESHOLD: u16 = 5000;

// ASCII only: `\d` would also accept digits from other scripts.
static THIRTEEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("pattern is a valid regex"));

/// Strips all whitespace and hyphen characters from `input`.
///
/// No other punctuation is touched and the order of the remaining characters
/// is preserved.
///
/// ```
/// assert_eq!(said::normalize(" 890918-5800 088 "), "8909185800088");
/// assert_eq!(said::normalize("8909.18"), "8909.18");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Gender encoded in digits 7 to 10 of an identity number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Gender code 0000-4999.
    Female,
    /// Gender code 5000-9999.
    Male,
}

impl Gender {
    /// Classifies a four digit gender code.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        if code >= MALE_THRESHOLD {
            Self::Male
        } else {
            Self::Female
        }
    }

    /// Returns `"male"` or `"female"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Citizenship status encoded in digit 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Citizenship {
    /// Digit `0`.
    Citizen,
    /// Digit `1`.
    PermanentResident,
}

impl Citizenship {
    /// Maps the citizenship digit, returning `None` for anything but 0 or 1.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Self::Citizen),
            1 => Some(Self::PermanentResident),
            _ => None,
        }
    }
}

impl fmt::Display for Citizenship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Citizen => f.write_str("citizen"),
            Self::PermanentResident => f.write_str("permanent resident"),
        }
    }
}

/// Reasons an identity number is rejected.
///
/// Variants are listed in the order the checks run; parsing stops at the
/// first failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input was empty.
    #[error("Identity number is empty")]
    Empty,

    /// The normalised input is not thirteen characters long.
    #[error("Invalid length: expected {LEN} digits, got {0} characters")]
    Length(usize),

    /// The normalised input contains something other than ASCII digits.
    #[error("Invalid identity number '{0}': only the digits 0-9 are allowed")]
    NonDigit(String),

    /// Digits 3-4 are not a month.
    #[error("Invalid birth month {0:02}: expected 01-12")]
    Month(u8),

    /// Digits 5-6 are outside 1-31.
    #[error("Invalid birth day {0:02}: expected 01-31")]
    Day(u8),

    /// The day does not exist in the resolved month and year.
    #[error("Invalid birth date: {year:04}-{month:02} has no day {day:02}")]
    DayOutOfMonth {
        /// Resolved four digit year.
        year: i32,
        /// Birth month.
        month: u8,
        /// Birth day.
        day: u8,
    },

    /// Digit 11 is neither 0 nor 1.
    #[error("Invalid citizenship digit {0}: expected 0 or 1")]
    Citizenship(u8),

    /// The final digit does not match the computed check digit.
    #[error("Checksum mismatch: expected check digit {expected}, found {found}")]
    Checksum {
        /// The computed check digit.
        expected: u8,
        /// The digit present in the number.
        found: u8,
    },
}

/// A validated South African national identity number.
///
/// Layout of the thirteen digits:
///
/// ```text
/// YYMMDD SSSS C A Z
/// │      │    │ │ └ check digit
/// │      │    │ └── historical race digit (unconstrained)
/// │      │    └──── citizenship: 0 citizen, 1 permanent resident
/// │      └───────── gender code: 0000-4999 female, 5000-9999 male
/// └──────────────── date of birth
/// ```
///
/// The two digit year is expanded with a century pivot relative to a
/// reference date, so parsing always takes one. [`FromStr`] uses today's
/// local date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdNumber {
    digits: String,
    birth_date: NaiveDate,
    gender_code: u16,
    citizenship: Citizenship,
}

impl IdNumber {
    /// Parses and validates `input` using the canonical checksum rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error`] encountered.
    pub fn parse(input: &str, reference: NaiveDate) -> Result<Self, Error> {
        Self::parse_with_parity(input, reference, DoublingParity::default())
    }

    /// Parses and validates `input` using the given checksum rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error`] encountered.
    pub fn parse_with_parity(
        input: &str,
        reference: NaiveDate,
        parity: DoublingParity,
    ) -> Result<Self, Error> {
        if input.is_empty() {
            return Err(Error::Empty);
        }

        let digits = normalize(input);
        let len = digits.chars().count();
        if len != LEN {
            return Err(Error::Length(len));
        }
        if !THIRTEEN_DIGITS.is_match(&digits) {
            return Err(Error::NonDigit(digits));
        }

        // Every byte is now an ASCII digit.
        let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
        let pair = |at: usize| values[at] * 10 + values[at + 1];

        let month = pair(2);
        if !(1..=12).contains(&month) {
            return Err(Error::Month(month));
        }

        let day = pair(4);
        if !(1..=31).contains(&day) {
            return Err(Error::Day(day));
        }

        let year = calendar::resolve_year(pair(0), reference);
        let max_day = calendar::days_in_month(year, month).ok_or(Error::Month(month))?;
        if day > max_day {
            return Err(Error::DayOutOfMonth { year, month, day });
        }
        let birth_date = NaiveDate::from_ymd_opt(year, month.into(), day.into())
            .ok_or(Error::DayOutOfMonth { year, month, day })?;

        let gender_code = values[6..10]
            .iter()
            .fold(0u16, |code, &digit| code * 10 + u16::from(digit));

        let citizenship =
            Citizenship::from_digit(values[10]).ok_or(Error::Citizenship(values[10]))?;

        let mut payload = [0u8; checksum::PAYLOAD_LEN];
        payload.copy_from_slice(&values[..checksum::PAYLOAD_LEN]);
        let expected = checksum::compute(&payload, parity);
        let found = values[12];
        if expected != found {
            return Err(Error::Checksum { expected, found });
        }

        Ok(Self {
            digits,
            birth_date,
            gender_code,
            citizenship,
        })
    }

    /// The normalised thirteen digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Encoded date of birth with the century resolved at parse time.
    ///
    /// This may lie after the reference date; see
    /// [`crate::Validator::date_of_birth`] for the variant that rejects that.
    #[must_use]
    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// The raw four digit gender code.
    #[must_use]
    pub const fn gender_code(&self) -> u16 {
        self.gender_code
    }

    /// Gender derived from the gender code.
    #[must_use]
    pub const fn gender(&self) -> Gender {
        Gender::from_code(self.gender_code)
    }

    /// Citizenship status.
    #[must_use]
    pub const fn citizenship(&self) -> Citizenship {
        self.citizenship
    }

    /// The historical race digit. No rule applies to it.
    #[must_use]
    pub fn race_digit(&self) -> u8 {
        self.digit(11)
    }

    /// The final digit.
    #[must_use]
    pub fn check_digit(&self) -> u8 {
        self.digit(12)
    }

    fn digit(&self, index: usize) -> u8 {
        self.digits.as_bytes()[index] - b'0'
    }

    /// Returns a wrapper that displays the number in its grouped form,
    /// `YYMMDD SSSS C A Z`.
    #[must_use]
    pub const fn grouped(&self) -> Grouped<'_> {
        Grouped(self)
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl AsRef<str> for IdNumber {
    fn as_ref(&self) -> &str {
        &self.digits
    }
}

impl FromStr for IdNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, calendar::today())
    }
}

/// Grouped display form of an [`IdNumber`], returned by
/// [`IdNumber::grouped`].
#[derive(Debug, Clone, Copy)]
pub struct Grouped<'a>(&'a IdNumber);

impl fmt::Display for Grouped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0.digits;
        write!(
            f,
            "{} {} {} {} {}",
            &d[0..6],
            &d[6..10],
            &d[10..11],
            &d[11..12],
            &d[12..13]
        )
    }
}
