//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input contains more than one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MultipleAtSymbols,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain has no dot with text on both sides.
    #[error("email domain must contain a dot between two labels")]
    InvalidDomain,
}

/// An email address accepted for the discount list.
///
/// ## Constraints
///
/// The check is deliberately shallow (no DNS, no RFC 5322 grammar):
///
/// - No whitespace anywhere (a byte order mark counts as whitespace)
/// - Exactly one @ symbol, with a non-empty local part before it
/// - The domain contains a `.` with at least one character on each side
///
/// ## Examples
///
/// ```
/// use shopfront_core::Email;
///
/// assert!(Email::parse("a@b.co").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// assert!(Email::parse("a@b").is_err());       // no dot in domain
/// assert!(Email::parse("ab.com").is_err());    // missing @
/// assert!(Email::parse("a @b.com").is_err());  // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// The input is not trimmed; callers reading form input should trim first.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.chars().any(is_space) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;

        if domain.contains('@') {
            return Err(EmailError::MultipleAtSymbols);
        }

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        if !has_inner_dot(domain) {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Strip the whitespace [`Email::parse`] refuses from both ends of form
    /// input, including a leading byte order mark.
    #[must_use]
    pub fn trim_input(raw: &str) -> &str {
        raw.trim_matches(is_space)
    }

    /// Returns true if `s` would be accepted by [`Email::parse`].
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// A dot that is neither the first nor the last character.
fn has_inner_dot(domain: &str) -> bool {
    let len = domain.len();
    domain
        .char_indices()
        .any(|(pos, c)| c == '.' && pos > 0 && pos + 1 < len)
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
    fn test_valid_emails() {
        assert!(Email::parse("a@b.co").is_ok());
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
        assert!(Email::parse("x@sub..domain").is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_missing_at_symbol() {
        assert_eq!(Email::parse("ab.com"), Err(EmailError::MissingAtSymbol));
    }

    #[test]
    fn test_whitespace_rejected() {
        assert_eq!(
            Email::parse("a @b.com"),
            Err(EmailError::ContainsWhitespace)
        );
        assert_eq!(
            Email::parse(" a@b.com"),
            Err(EmailError::ContainsWhitespace)
        );
        assert_eq!(
            Email::parse("a@b.com\t"),
            Err(EmailError::ContainsWhitespace)
        );
        assert_eq!(
            Email::parse("a\u{FEFF}@b.co"),
            Err(EmailError::ContainsWhitespace)
        );
        assert_eq!(
            Email::parse("\u{FEFF}a@b.co"),
            Err(EmailError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_trim_input() {
        assert_eq!(Email::trim_input("  a@b.co\n"), "a@b.co");
        assert_eq!(Email::trim_input("\u{FEFF}a@b.co\u{FEFF} "), "a@b.co");
        assert_eq!(Email::trim_input("a\u{FEFF}@b.co"), "a\u{FEFF}@b.co");
        assert_eq!(Email::trim_input("\u{FEFF}"), "");
    }

    #[test]
    fn test_domain_without_dot() {
        assert_eq!(Email::parse("a@b"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_domain_dot_at_edges() {
        assert_eq!(Email::parse("a@.com"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("a@com."), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("a@."), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_empty_local_part() {
        assert_eq!(Email::parse("@b.com"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn test_multiple_at_symbols() {
        assert_eq!(
            Email::parse("a@b@c.com"),
            Err(EmailError::MultipleAtSymbols)
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(Email::is_valid("a@b.co"));
        assert!(!Email::is_valid("a@b"));
    }

    #[test]
    fn test_parts() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(email.local_part(), "user");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_serde_roundtrip() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<Email, _> = serde_json::from_str("\"not-an-email\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str() {
        let email: Email = "user@example.com".parse().unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }
}
