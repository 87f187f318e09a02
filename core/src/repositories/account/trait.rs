//! Account repository trait defining the interface for account persistence.
//!
//! This module defines the repository pattern interface for Account entities.
//! The trait is async-first and uses Result types for error handling. Every
//! lookup excludes soft-deleted accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Repository trait for Account entity persistence operations
///
/// Implementations handle the actual storage while maintaining the
/// abstraction boundary between domain and infrastructure layers.
///
/// The refresh-token operations (`push`, `pull`, `clear`, `has`) must be
/// atomic in the implementation: concurrent logins and logouts on the same
/// account may not lose each other's writes, so implementations may never
/// read the token list, modify it in memory, and write it back.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError::Validation)` - Email or username already taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account by its email address
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Find the account holding an unexpired email verification token
    ///
    /// # Arguments
    /// * `token_hash` - SHA-256 hex digest of the presented token
    /// * `now` - Instant the expiry is checked against
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Hash matches and the token has not expired
    /// * `Ok(None)` - No match, or the token expired
    async fn find_by_verification_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError>;

    /// Find the account holding an unexpired password reset token
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, DomainError>;

    /// Store an email verification token hash and its expiry
    async fn set_verification_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Clear any outstanding email verification token
    ///
    /// Used both on successful verification and to roll back a registration
    /// whose verification email could not be dispatched.
    async fn clear_verification_token(&self, id: Uuid) -> Result<(), DomainError>;

    /// Mark the email verified and clear the verification token fields
    ///
    /// Both changes happen in a single statement so a crash cannot leave a
    /// verified account with a live verification token.
    async fn mark_email_verified(&self, id: Uuid) -> Result<(), DomainError>;

    /// Store a password reset token hash and its expiry
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Clear any outstanding password reset token
    async fn clear_reset_token(&self, id: Uuid) -> Result<(), DomainError>;

    /// Replace the password hash after a reset
    ///
    /// Clears the reset token fields and revokes every refresh token in the
    /// same operation, so all prior sessions die with the old password.
    async fn reset_credentials(
        &self,
        id: Uuid,
        new_password_hash: &str,
    ) -> Result<(), DomainError>;

    /// Append a refresh token to the account's session list
    async fn push_refresh_token(&self, id: Uuid, token: &str) -> Result<(), DomainError>;

    /// Remove a refresh token from the account's session list
    ///
    /// # Returns
    /// * `Ok(true)` - The token was present and has been removed
    /// * `Ok(false)` - The token was not in the list
    async fn pull_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError>;

    /// Check whether a refresh token is in the account's session list
    async fn has_refresh_token(&self, id: Uuid, token: &str) -> Result<bool, DomainError>;

    /// Remove every refresh token from the account's session list
    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<(), DomainError>;

    /// Update the last-login timestamp
    async fn touch_last_login(&self, id: Uuid) -> Result<(), DomainError>;

    /// Soft-delete the account
    ///
    /// # Returns
    /// * `Ok(true)` - Account was marked deleted
    /// * `Ok(false)` - Account not found
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
