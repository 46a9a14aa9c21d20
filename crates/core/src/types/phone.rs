//! Canonical Israeli mobile phone numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Country calling code prepended to every canonical number.
pub const COUNTRY_CODE: &str = "+972";

/// Digits of [`COUNTRY_CODE`] as they appear in digits-only input.
const COUNTRY_DIGITS: &str = "972";

/// Length of the subscriber part of a canonical number.
const SUBSCRIBER_LEN: usize = 9;

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// No digits left after stripping formatting.
    #[error("phone number cannot be empty")]
    Empty,
    /// The subscriber part does not have exactly nine digits.
    #[error("phone number must have {expected} digits after the country code (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digit count found.
        actual: usize,
    },
    /// The subscriber part does not start with `5` (not a mobile number).
    #[error("phone number must start with 5 after the country code")]
    NotMobile,
}

/// A canonical mobile phone number: `+972` followed by nine digits, the first
/// of which is `5`.
///
/// This is the uniqueness key for users.
///
/// ## Normalization
///
/// 1. All non-digit characters are dropped.
/// 2. A leading `972` country prefix is stripped.
/// 3. At most one leading `0` (trunk prefix) is stripped.
/// 4. What remains must be nine digits starting with `5`.
///
/// ## Examples
///
/// ```
/// use tandaro_core::Phone;
///
/// assert_eq!(Phone::parse("050-123-4567").unwrap().as_str(), "+972501234567");
/// assert_eq!(Phone::parse("+972-50-123-4567").unwrap().as_str(), "+972501234567");
/// assert!(Phone::parse("03-123-4567").is_err()); // landline
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Normalize raw user input into a canonical phone number.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] when the normalized digits are not a nine-digit
    /// number starting with `5`.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        let local = digits.strip_prefix(COUNTRY_DIGITS).unwrap_or(&digits);
        let subscriber = local.strip_prefix('0').unwrap_or(local);

        if subscriber.len() != SUBSCRIBER_LEN {
            return Err(PhoneError::WrongLength {
                expected: SUBSCRIBER_LEN,
                actual: subscriber.len(),
            });
        }

        if !subscriber.starts_with('5') {
            return Err(PhoneError::NotMobile);
        }

        Ok(Self(format!("{COUNTRY_CODE}{subscriber}")))
    }

    /// The canonical form, e.g. `+972501234567`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical form without the leading `+`, as used by `wa.me` links.
    #[must_use]
    pub fn digits(&self) -> &str {
        self.0.trim_start_matches('+')
    }

    /// The nine-digit subscriber part.
    #[must_use]
    pub fn subscriber(&self) -> &str {
        self.0.get(COUNTRY_CODE.len()..).unwrap_or_default()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn local_format_with_dashes() {
        assert_eq!(
            Phone::parse("050-123-4567").unwrap().as_str(),
            "+972501234567"
        );
    }

    #[test]
    fn international_format_converges_with_local() {
        let local = Phone::parse("050-123-4567").unwrap();
        let international = Phone::parse("+972-50-123-4567").unwrap();
        assert_eq!(local, international);
    }

    #[test]
    fn country_prefix_with_trunk_zero() {
        // Users sometimes keep the trunk zero after the country code.
        assert_eq!(
            Phone::parse("+972 050 123 4567").unwrap().as_str(),
            "+972501234567"
        );
    }

    #[test]
    fn bare_subscriber_digits() {
        assert_eq!(Phone::parse("501234567").unwrap().as_str(), "+972501234567");
    }

    #[test]
    fn only_one_leading_zero_is_stripped() {
        assert_eq!(
            Phone::parse("0050-123-4567"),
            Err(PhoneError::WrongLength {
                expected: 9,
                actual: 10
            })
        );
    }

    #[test]
    fn landline_is_rejected() {
        assert_eq!(Phone::parse("03-123-4567"), Err(PhoneError::WrongLength {
            expected: 9,
            actual: 8
        }));
        assert_eq!(Phone::parse("02-1234567-8"), Err(PhoneError::NotMobile));
    }

    #[test]
    fn empty_and_garbage_are_rejected() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("phone"), Err(PhoneError::Empty));
        assert!(Phone::parse("050-123-456").is_err());
        assert!(Phone::parse("050-123-45678").is_err());
    }

    #[test]
    fn accessors() {
        let phone = Phone::parse("0521112222").unwrap();
        assert_eq!(phone.digits(), "972521112222");
        assert_eq!(phone.subscriber(), "521112222");
        assert_eq!(phone.to_string(), "+972521112222");
    }

    #[test]
    fn serde_round_trip_validates() {
        let phone: Phone = serde_json::from_str("\"+972501234567\"").unwrap();
        assert_eq!(phone.as_str(), "+972501234567");
        assert!(serde_json::from_str::<Phone>("\"12\"").is_err());
    }
}
