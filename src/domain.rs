//! Domain model for South African national identity numbers.
//!
//! This module contains the identity number type and the rules it is built
//! from: the check digit, the century pivot and month lengths, and the
//! validation configuration.

/// Identity number parsing and field extraction.
pub mod id_number;
pub use id_number::{Citizenship, Error as IdNumberError, Gender, IdNumber, normalize};

/// Check digit computation.
pub mod checksum;
pub use checksum::DoublingParity;

/// Century pivot, leap years and month lengths.
pub mod calendar;

mod config;
pub use config::{Config, Error as ConfigError};
