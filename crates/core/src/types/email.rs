//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted address shape: at least five local characters from a restricted
/// set, a dotted domain, and a 2-4 letter top-level domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^[a-zA-Z0-9._]{5,}@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}$").unwrap()
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not match the accepted address shape.
    #[error("email is not a valid address")]
    Invalid,
}

/// An email address accepted at checkout.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Local part: at least 5 of `a-z A-Z 0-9 . _`
/// - Domain: letters, digits, `.` and `-`, ending in a 2-4 letter TLD
///
/// ## Examples
///
/// ```
/// use corner_shop_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("buyer@example.com").is_ok());
/// assert!(Email::parse("first.last@shop.co.uk").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());              // empty
/// assert!(Email::parse("abc@example.com").is_err()); // local part too short
/// assert!(Email::parse("buyer@example").is_err());   // no TLD
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 254 characters,
    /// or does not match the accepted address shape.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !EMAIL_PATTERN.is_match(s) {
            return Err(EmailError::Invalid);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("buyer@example.com").is_ok());
        assert!(Email::parse("buyer.name@example.com").is_ok());
        assert!(Email::parse("buyer_01@example.com").is_ok());
        assert!(Email::parse("buyer@sub.example-shop.com").is_ok());
        assert!(Email::parse("buyer@example.co.uk").is_ok());
        assert!(Email::parse("abcde@b.io").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_short_local_part() {
        assert_eq!(Email::parse("abcd@example.com"), Err(EmailError::Invalid));
    }

    #[test]
    fn test_parse_rejects_plus_tag() {
        // `+` is outside the accepted local-part character set
        assert_eq!(
            Email::parse("buyer+tag@example.com"),
            Err(EmailError::Invalid)
        );
    }

    #[test]
    fn test_parse_rejects_bad_tld() {
        assert_eq!(Email::parse("buyer@example"), Err(EmailError::Invalid));
        assert_eq!(Email::parse("buyer@example.c"), Err(EmailError::Invalid));
        assert_eq!(
            Email::parse("buyer@example.museum"),
            Err(EmailError::Invalid)
        );
        assert_eq!(Email::parse("buyer@example.c0m"), Err(EmailError::Invalid));
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let email = Email::parse("buyer@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"buyer@example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}
