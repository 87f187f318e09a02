//! Email address value object.

use serde::{Deserialize, Serialize};

use gk_shared::validation::{is_valid_email, mask_email};

/// A validated email address
///
/// Construction enforces shape validation and lowercases the address, so an
/// `Email` in hand is always comparable and safe to persist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address
    ///
    /// Returns `None` when the address does not have a valid shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if is_valid_email(&normalized) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    /// The normalized address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logs (e.g. ma***@example.com)
    pub fn masked(&self) -> String {
        mask_email(&self.0)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Mara@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "mara@example.com");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Email::parse("not-an-email").is_none());
        assert!(Email::parse("missing@dot").is_none());
        assert!(Email::parse("").is_none());
    }

    #[test]
    fn test_masked() {
        let email = Email::parse("mara@example.com").unwrap();
        assert_eq!(email.masked(), "ma***@example.com");
    }
}
