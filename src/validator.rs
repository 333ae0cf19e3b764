use chrono::NaiveDate;

use crate::domain::{
    Config, Gender, IdNumber, IdNumberError, calendar,
    checksum::{self, DoublingParity},
};

/// Validates identity numbers and extracts their embedded fields.
///
/// A `Validator` holds no per-call state. The reference date (used for the
/// century pivot and for rejecting birth dates in the future) is either
/// pinned or read from the local clock once per call.
///
/// ```
/// use chrono::NaiveDate;
/// use said::{Gender, Validator};
///
/// let validator = Validator::default()
///     .with_reference_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
///
/// assert!(validator.is_valid("890918 5800 08 8"));
/// assert_eq!(validator.gender("8909185800088"), Some(Gender::Male));
/// assert_eq!(
///     validator.date_of_birth("8909185800088"),
///     NaiveDate::from_ymd_opt(1989, 9, 18)
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    parity: DoublingParity,
    reference_date: Option<NaiveDate>,
}

impl Validator {
    /// Creates a validator from a [`Config`].
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            parity: config.parity,
            reference_date: config.reference_date,
        }
    }

    /// Pins the reference date instead of reading the clock.
    #[must_use]
    pub const fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Selects the checksum doubling rule.
    #[must_use]
    pub const fn with_parity(mut self, parity: DoublingParity) -> Self {
        self.parity = parity;
        self
    }

    /// The checksum doubling rule in use.
    #[must_use]
    pub const fn parity(&self) -> DoublingParity {
        self.parity
    }

    /// The reference date for this call: the pinned date or today.
    #[must_use]
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(calendar::today)
    }

    /// Parses `input`, reporting which check failed.
    ///
    /// # Errors
    ///
    /// Returns the first [`IdNumberError`] encountered.
    pub fn parse(&self, input: &str) -> Result<IdNumber, IdNumberError> {
        self.parse_at(input, self.reference_date())
    }

    fn parse_at(&self, input: &str, reference: NaiveDate) -> Result<IdNumber, IdNumberError> {
        let result = IdNumber::parse_with_parity(input, reference, self.parity);
        match &result {
            Ok(_) => tracing::trace!(parity = %self.parity, %reference, "identity number accepted"),
            Err(e) => tracing::debug!(parity = %self.parity, %reference, "identity number rejected: {e}"),
        }
        result
    }

    /// Returns `true` if `input` is a structurally and arithmetically valid
    /// identity number.
    ///
    /// Never panics, whatever the input.
    #[must_use]
    pub fn is_valid(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// Returns the encoded birth date, or `None` if `input` is invalid or the
    /// date lies after the reference date.
    #[must_use]
    pub fn date_of_birth(&self, input: &str) -> Option<NaiveDate> {
        let reference = self.reference_date();
        let birth_date = self.parse_at(input, reference).ok()?.birth_date();
        if birth_date > reference {
            tracing::debug!(%birth_date, %reference, "birth date lies in the future");
            return None;
        }
        Some(birth_date)
    }

    /// Returns the encoded gender, or `None` if `input` is invalid.
    #[must_use]
    pub fn gender(&self, input: &str) -> Option<Gender> {
        self.parse(input).ok().map(|id| id.gender())
    }

    /// Computes the check digit for a twelve digit prefix.
    ///
    /// # Errors
    ///
    /// See [`checksum::check_digit`].
    pub fn check_digit(&self, prefix: &str) -> Result<u8, checksum::Error> {
        checksum::check_digit(prefix, self.parity)
    }
}

/// Returns `true` if `input` is a valid identity number, using the canonical
/// checksum rule and today's date.
///
/// ```
/// assert!(said::is_valid("8909185800088"));
/// assert!(!said::is_valid("8909185800087"));
/// assert!(!said::is_valid(""));
/// ```
#[must_use]
pub fn is_valid(input: &str) -> bool {
    Validator::default().is_valid(input)
}

/// Returns the encoded birth date of a valid identity number, or `None` if
/// the number is invalid or the date is later than today.
#[must_use]
pub fn extract_date_of_birth(input: &str) -> Option<NaiveDate> {
    Validator::default().date_of_birth(input)
}

/// Returns the encoded gender of a valid identity number, or `None` if the
/// number is invalid.
///
/// ```
/// use said::Gender;
///
/// assert_eq!(said::extract_gender("8909185800088"), Some(Gender::Male));
/// assert_eq!(said::extract_gender("not an id"), None);
/// ```
#[must_use]
pub fn extract_gender(input: &str) -> Option<Gender> {
    Validator::default().gender(input)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn validator() -> Validator {
        Validator::default().with_reference_date(date(2026, 10, 15))
    }

    #[test_case("8909185800088", true; "reference number")]
    #[test_case("890108 5800 08 8", true; "embedded spaces")]
    #[test_case("890108-5800-08-8", true; "embedded hyphens")]
    #[test_case("12345", false; "too short")]
    #[test_case("123456789012a", false; "trailing letter")]
    #[test_case("9213204720082", false; "month thirteen")]
    #[test_case("9200324720082", false; "month zero day thirty two")]
    #[test_case("", false; "empty")]
    #[test_case("9602295000081", true; "leap day 1996")]
    #[test_case("9902295000088", false; "leap day 1999")]
    #[test_case("8001015000288", false; "citizenship two")]
    fn is_valid_cases(input: &str, expected: bool) {
        assert_eq!(validator().is_valid(input), expected);
    }

    #[test]
    fn every_other_final_digit_is_rejected() {
        let validator = validator();
        for last in b'0'..=b'9' {
            let candidate = format!("890918580008{}", char::from(last));
            assert_eq!(validator.is_valid(&candidate), last == b'8', "{candidate}");
        }
    }

    #[test]
    fn date_of_birth_of_valid_number() {
        assert_eq!(
            validator().date_of_birth("8909185800088"),
            Some(date(1989, 9, 18))
        );
    }

    #[test]
    fn date_of_birth_of_invalid_number_is_none() {
        assert_eq!(validator().date_of_birth("8909185800087"), None);
    }

    #[test]
    fn future_birth_date_is_valid_but_not_extracted() {
        // 2026-12-31 against a reference of 2026-10-15.
        let validator = validator();
        assert!(validator.is_valid("2612315000080"));
        assert_eq!(validator.date_of_birth("2612315000080"), None);
    }

    #[test]
    fn birth_date_on_reference_date_is_extracted() {
        let validator = validator();
        assert_eq!(
            validator.date_of_birth("2610155000082"),
            Some(date(2026, 10, 15))
        );
        assert_eq!(validator.date_of_birth("2610145000083"), Some(date(2026, 10, 14)));
    }

    #[test]
    fn reference_date_moves_the_century() {
        let early = Validator::default().with_reference_date(date(2004, 1, 1));
        let late = Validator::default().with_reference_date(date(2026, 1, 1));

        // "05": 1905 before the pivot passes it, 2005 after.
        assert_eq!(early.date_of_birth("0506010000080"), Some(date(1905, 6, 1)));
        assert_eq!(late.date_of_birth("0506010000080"), Some(date(2005, 6, 1)));
    }

    #[test_case("9612314999081", Some(Gender::Female); "4999")]
    #[test_case("9612315000085", Some(Gender::Male); "5000")]
    #[test_case("9612315000086", None; "bad checksum")]
    fn gender(input: &str, expected: Option<Gender>) {
        assert_eq!(validator().gender(input), expected);
    }

    #[test]
    fn odd_parity_is_opt_in() {
        let odd = validator().with_parity(DoublingParity::Odd);
        assert!(!validator().is_valid("8909185800087"));
        assert!(odd.is_valid("8909185800087"));
        assert!(!odd.is_valid("8909185800088"));
    }

    #[test]
    fn validator_from_config() {
        let config = Config {
            parity: DoublingParity::Odd,
            reference_date: Some(date(2000, 1, 1)),
        };
        let validator = Validator::new(&config);
        assert_eq!(validator.parity(), DoublingParity::Odd);
        assert_eq!(validator.reference_date(), date(2000, 1, 1));
    }

    #[test]
    fn repeated_calls_agree() {
        let validator = validator();
        let first = validator.parse("8909185800088");
        for _ in 0..10 {
            assert_eq!(validator.parse("8909185800088"), first);
        }
    }

    #[test]
    fn check_digit_uses_configured_parity() {
        assert_eq!(validator().check_digit("890918580008"), Ok(8));
        assert_eq!(
            validator()
                .with_parity(DoublingParity::Odd)
                .check_digit("890918580008"),
            Ok(7)
        );
    }

    #[test]
    fn free_functions_use_wall_clock() {
        // 1989 resolves to the 1900s for any reference year up to 2088.
        assert!(is_valid("8909185800088"));
        assert_eq!(extract_date_of_birth("8909185800088"), Some(date(1989, 9, 18)));
        assert_eq!(extract_gender("8909185800088"), Some(Gender::Male));
        assert_eq!(extract_gender(""), None);
        assert_eq!(extract_date_of_birth("abc"), None);
    }
}
