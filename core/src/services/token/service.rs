//! JWT issuing and verification

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use gk_shared::config::JwtConfig;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};

/// Service for issuing and verifying the two session JWTs
///
/// Access and refresh tokens are signed with independent HS256 secrets.
/// Verification checks signature, expiry, not-before, and issuer only; for
/// refresh tokens the caller must additionally check membership in the
/// account's session list, which is what revocation means here.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl TokenService {
    /// Creates a new token service from JWT configuration
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Issues a short-lived access token for an account
    pub fn issue_access_token(&self, account_id: Uuid) -> Result<String, DomainError> {
        let claims = Claims::new(
            account_id,
            self.config.issuer.clone(),
            self.config.access_token_expiry,
        );
        self.encode_jwt(&claims, TokenKind::Access)
    }

    /// Issues a long-lived refresh token for an account
    pub fn issue_refresh_token(&self, account_id: Uuid) -> Result<String, DomainError> {
        let claims = Claims::new(
            account_id,
            self.config.issuer.clone(),
            self.config.refresh_token_expiry,
        );
        self.encode_jwt(&claims, TokenKind::Refresh)
    }

    /// Verifies a token of the given kind and returns its claims
    ///
    /// # Returns
    /// * `Ok(Claims)` - Signature, expiry, nbf, and issuer all check out
    /// * `Err(TokenError)` - Expired, not yet valid, bad signature, or malformed
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, DomainError> {
        let decoding_key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let token_data =
            decode::<Claims>(token, decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        DomainError::Token(TokenError::TokenExpired)
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        DomainError::Token(TokenError::TokenNotYetValid)
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verifies a token and extracts the account ID from its subject
    pub fn verify_account_id(&self, token: &str, kind: TokenKind) -> Result<Uuid, DomainError> {
        let claims = self.verify(token, kind)?;
        claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))
    }

    /// Encodes claims into a JWT signed with the kind's secret
    fn encode_jwt(&self, claims: &Claims, kind: TokenKind) -> Result<String, DomainError> {
        let encoding_key = match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        };
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
