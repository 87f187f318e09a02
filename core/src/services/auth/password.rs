//! Explicit password hashing step
//!
//! The auth flows call these right before any write that changes a
//! password. Nothing hashes implicitly on persistence, so the cost of the
//! operation is visible in the call path.

use crate::errors::{DomainError, DomainResult};

/// Hashes a plain password with the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(password, cost).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash password: {}", e),
    })
}

/// Checks a plain password against a stored bcrypt hash
///
/// A malformed stored hash is an internal error, not a failed match.
pub fn verify_password(password: &str, password_hash: &str) -> DomainResult<bool> {
    bcrypt::verify(password, password_hash).map_err(|e| DomainError::Internal {
        message: format!("Failed to verify password: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the hashing tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("correct horse", TEST_COST).unwrap();

        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_hash_embeds_the_cost() {
        let hash = hash_password("secret123", TEST_COST).unwrap();

        assert!(hash.starts_with("$2"));
        assert!(hash.contains("$04$"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("secret123", TEST_COST).unwrap();
        let b = hash_password("secret123", TEST_COST).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = verify_password("secret123", "not-a-bcrypt-hash");

        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }
}
