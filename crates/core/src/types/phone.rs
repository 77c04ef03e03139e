//! Brazilian phone numbers split into area code and subscriber number.
//!
//! The marketing API expects phones as `{ ddd, numero }` pairs. User input
//! arrives free-form (`"(81) 99999-9999"`), so parsing strips everything but
//! digits and validates the total length before splitting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a phone number from free-form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    /// Too few or too many digits after stripping formatting.
    #[error("phone number must have 8 to 13 digits, got {0}")]
    InvalidLength(usize),
}

/// A phone number as the marketing API expects it: area code + number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Two-digit area code (DDD).
    pub ddd: u32,
    /// Subscriber number, digits only.
    pub numero: u64,
}

impl Phone {
    /// Parse a free-form phone string (`"(81) 99999-9999"`, `"8199999999"`).
    ///
    /// Non-digit characters are stripped; the first two digits become the
    /// area code and the remainder the subscriber number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::InvalidLength`] when fewer than 8 or more than
    /// 13 digits remain after stripping.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < 8 || digits.len() > 13 {
            return Err(PhoneError::InvalidLength(digits.len()));
        }

        let (ddd, numero) = digits.split_at(2);
        Ok(Self {
            // Both parts are all-digit and length-bounded, parse cannot fail.
            ddd: ddd.parse().map_err(|_| PhoneError::InvalidLength(0))?,
            numero: numero.parse().map_err(|_| PhoneError::InvalidLength(0))?,
        })
    }
}

/// Strip everything but ASCII digits from a string.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
