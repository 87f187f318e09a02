//! Configuration for the authentication service

use gk_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether login requires a verified email address
    pub verification_required: bool,

    /// Lifetime of verification and reset tokens in minutes
    pub token_ttl_minutes: i64,

    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            verification_required: true,
            token_ttl_minutes: 10,
            bcrypt_cost: 10,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            verification_required: config.verification.required,
            token_ttl_minutes: config.verification.token_ttl_minutes,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
