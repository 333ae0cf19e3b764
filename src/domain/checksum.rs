//! Luhn-family check digit used by the national identity number.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::id_number::normalize;

/// Number of digits covered by the check digit.
pub const PAYLOAD_LEN: usize = 12;

/// Which 0-indexed positions (counted from the left) are doubled.
///
/// [`DoublingParity::Even`] doubles positions 0, 2, 4, 6, 8 and 10. This is
/// the canonical rule and the default.
///
/// [`DoublingParity::Odd`] doubles positions 1, 3, 5, 7, 9 and 11. It exists
/// so that numbers produced against the older rule can be diagnosed, and is
/// only ever used when explicitly configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoublingParity {
    /// Double the digits at even 0-indexed positions.
    #[default]
    Even,
    /// Double the digits at odd 0-indexed positions.
    Odd,
}

impl DoublingParity {
    const fn doubles(self, index: usize) -> bool {
        match self {
            Self::Even => index % 2 == 0,
            Self::Odd => index % 2 == 1,
        }
    }
}

impl fmt::Display for DoublingParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => f.write_str("even"),
            Self::Odd => f.write_str("odd"),
        }
    }
}

impl FromStr for DoublingParity {
    type Err = UnknownParityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "even" => Ok(Self::Even),
            "odd" => Ok(Self::Odd),
            _ => Err(UnknownParityError(s.to_string())),
        }
    }
}

/// Error returned when a parity name is neither `even` nor `odd`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown doubling parity '{0}': expected 'even' or 'odd'")]
pub struct UnknownParityError(String);

/// Errors that can occur when computing a check digit from text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The prefix does not contain exactly twelve characters.
    #[error("Invalid prefix length: expected {PAYLOAD_LEN} digits, got {0}")]
    Length(usize),

    /// The prefix contains something other than ASCII digits.
    #[error("Invalid prefix '{0}': only the digits 0-9 are allowed")]
    NonDigit(String),
}

/// Computes the check digit over twelve digit values (each `0..=9`).
///
/// Doubled digits greater than nine have nine subtracted, which is the same
/// as summing their two decimal digits. The result is
/// `(10 - sum % 10) % 10`.
///
/// # Examples
///
/// ```
/// use said::domain::checksum::{compute, DoublingParity};
///
/// let payload = [8, 9, 0, 9, 1, 8, 5, 8, 0, 0, 0, 8];
/// assert_eq!(compute(&payload, DoublingParity::Even), 8);
/// ```
#[must_use]
pub fn compute(digits: &[u8; PAYLOAD_LEN], parity: DoublingParity) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, &digit)| {
            let digit = u32::from(digit);
            if parity.doubles(index) {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    // Always below ten.
    u8::try_from((10 - sum % 10) % 10).unwrap_or_default()
}

/// Computes the check digit for a twelve digit prefix given as text.
///
/// Whitespace and hyphens are stripped first, exactly as for full numbers.
///
/// # Errors
///
/// Returns [`Error::Length`] if the normalised prefix is not twelve
/// characters long, or [`Error::NonDigit`] if it contains anything other
/// than ASCII digits.
pub fn check_digit(prefix: &str, parity: DoublingParity) -> Result<u8, Error> {
    let digits = parse_payload(prefix)?;
    Ok(compute(&digits, parity))
}

/// Appends the check digit to a twelve digit prefix, producing a full
/// thirteen digit number.
///
/// # Errors
///
/// See [`check_digit`].
pub fn complete(prefix: &str, parity: DoublingParity) -> Result<String, Error> {
    let normalized = normalize(prefix);
    let digit = check_digit(&normalized, parity)?;
    Ok(format!("{normalized}{digit}"))
}

fn parse_payload(prefix: &str) -> Result<[u8; PAYLOAD_LEN], Error> {
    let normalized = normalize(prefix);
    let len = normalized.chars().count();
    if len != PAYLOAD_LEN {
        return Err(Error::Length(len));
    }

    let mut digits = [0u8; PAYLOAD_LEN];
    for (slot, byte) in digits.iter_mut().zip(normalized.bytes()) {
        if !byte.is_ascii_digit() {
            return Err(Error::NonDigit(normalized));
        }
        *slot = byte - b'0';
    }
    Ok(digits)
}
