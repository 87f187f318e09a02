//! Generation and hashing of single-use secret tokens

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// A freshly generated secret token in both of its forms
///
/// `plain` goes out in the email link, `hash` goes into the database. Only
/// the hash survives past the request that created the token.
#[derive(Debug, Clone)]
pub struct SecretToken {
    pub plain: String,
    pub hash: String,
}

/// Generates and verifies the secret tokens used in email links
///
/// Tokens are 32 random bytes rendered as 64 lowercase hex characters.
/// Storage and lookup always go through the SHA-256 digest of the plain
/// token.
pub struct SecretTokenCodec;

impl SecretTokenCodec {
    /// Generates a cryptographically secure random token
    ///
    /// Uses OsRng (OS-provided CSPRNG) for secure random number generation.
    pub fn generate() -> SecretToken {
        let mut rng = OsRng;
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let plain = hex::encode(bytes);
        let hash = Self::hash(&plain);
        SecretToken { plain, hash }
    }

    /// Computes the storage form of a plain token
    pub fn hash(plain: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plain.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Compares a plain token against a stored hash in constant time
    pub fn matches(plain: &str, stored_hash: &str) -> bool {
        let computed = Self::hash(plain);
        if computed.len() != stored_hash.len() {
            return false;
        }
        constant_time_eq(computed.as_bytes(), stored_hash.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_is_64_hex_chars() {
        let token = SecretTokenCodec::generate();

        assert_eq!(token.plain.len(), 64);
        assert!(token.plain.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.hash.len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let token = SecretTokenCodec::generate();

        assert_eq!(SecretTokenCodec::hash(&token.plain), token.hash);
    }

    #[test]
    fn test_successive_tokens_differ() {
        let a = SecretTokenCodec::generate();
        let b = SecretTokenCodec::generate();

        assert_ne!(a.plain, b.plain);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_matches_accepts_correct_token() {
        let token = SecretTokenCodec::generate();

        assert!(SecretTokenCodec::matches(&token.plain, &token.hash));
    }

    #[test]
    fn test_matches_rejects_wrong_token() {
        let token = SecretTokenCodec::generate();
        let other = SecretTokenCodec::generate();

        assert!(!SecretTokenCodec::matches(&other.plain, &token.hash));
        assert!(!SecretTokenCodec::matches("tampered", &token.hash));
    }

    #[test]
    fn test_known_sha256_vector() {
        // sha256("abc")
        assert_eq!(
            SecretTokenCodec::hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
