//! Account field validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Basic email shape: one `@`, no whitespace, a dot in the domain
pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Usernames are 3-30 characters: letters, digits, underscores
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,30}$").unwrap());

/// Minimum password length in characters
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length in characters (bcrypt truncates past 72 bytes)
pub const PASSWORD_MAX_LENGTH: usize = 72;

/// Check if an email address has a valid shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check if a username is acceptable
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Check if a password length is within bounds
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len)
}

/// Mask an email address for logs (e.g. ma***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => {
            format!("{}***@{}", &local[..2], domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("mara"));
        assert!(is_valid_username("user_42"));
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username("a".repeat(31).as_str())); // too long
        assert!(!is_valid_username("bad name")); // whitespace
    }

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("longenough"));
        assert!(!is_valid_password("short"));
        assert!(!is_valid_password("p".repeat(73).as_str()));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("mara@example.com"), "ma***@example.com");
        assert_eq!(mask_email("ab@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
