//! South African national identity number validation
//!
//! Identity numbers are thirteen digits encoding a date of birth, a gender
//! code, a citizenship digit and a Luhn-family check digit.

pub mod domain;
pub use domain::{
    Citizenship, Config, ConfigError, DoublingParity, Gender, IdNumber, IdNumberError, normalize,
};

/// Validation with a configurable reference date and checksum rule.
pub mod validator;
pub use validator::{Validator, extract_date_of_birth, extract_gender, is_valid};
