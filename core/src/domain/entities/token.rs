//! Token types for JWT-based session handling.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of JWT issued by the token service
///
/// Access and refresh tokens are signed with different secrets, so the kind
/// decides which key pair is used for signing and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token presented on API requests
    Access,
    /// Long-lived token exchanged for new access tokens
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an account, valid for `ttl_seconds`
    pub fn new(account_id: Uuid, issuer: impl Into<String>, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks if the claims are currently valid (after nbf, before exp)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the account ID from the claims
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Token pair returned to the client when a session is issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,
}

impl SessionTokens {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "gatekey", 900);

        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.iss, "gatekey");
        assert!(claims.is_valid());
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_claims_account_id_parsing() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "gatekey", 60);

        assert_eq!(claims.account_id().unwrap(), account_id);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new(Uuid::new_v4(), "gatekey", 60);
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_not_before() {
        let mut claims = Claims::new(Uuid::new_v4(), "gatekey", 60);
        claims.nbf = Utc::now().timestamp() + 3600;

        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_have_unique_jti() {
        let account_id = Uuid::new_v4();
        let a = Claims::new(account_id, "gatekey", 60);
        let b = Claims::new(account_id, "gatekey", 60);

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_session_tokens() {
        let pair = SessionTokens::new("access".to_string(), "refresh".to_string());

        assert_eq!(pair.access_token, "access");
        assert_eq!(pair.refresh_token, "refresh");
    }
}
