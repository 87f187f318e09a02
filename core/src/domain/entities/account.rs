//! Account entity representing a registered account in the Gatekey system.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    User,
    /// Administrative account
    Admin,
}

/// Display profile attached to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional avatar URL
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar: None,
        }
    }
}

/// Account entity holding credentials, verification state, and sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// bcrypt hash of the password; never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display profile
    pub profile: Profile,

    /// Granted roles
    pub roles: Vec<Role>,

    /// Whether the email address has been verified
    pub is_email_verified: bool,

    /// SHA-256 hash of the outstanding email verification token
    #[serde(skip_serializing)]
    pub email_verification_token_hash: Option<String>,

    /// Expiry of the outstanding email verification token
    pub email_verification_expires_at: Option<DateTime<Utc>>,

    /// SHA-256 hash of the outstanding password reset token
    #[serde(skip_serializing)]
    pub password_reset_token_hash: Option<String>,

    /// Expiry of the outstanding password reset token
    pub password_reset_expires_at: Option<DateTime<Utc>>,

    /// Refresh tokens recognized for this account; membership is the
    /// revocation check, so removal invalidates a session
    #[serde(skip_serializing)]
    pub active_refresh_tokens: Vec<String>,

    /// Timestamp of the last successful login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Soft-delete flag; deleted accounts are excluded from every lookup
    pub deleted: bool,

    /// When the account was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new unverified Account with the default role
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        profile: Profile,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            profile,
            roles: vec![Role::User],
            is_email_verified: false,
            email_verification_token_hash: None,
            email_verification_expires_at: None,
            password_reset_token_hash: None,
            password_reset_expires_at: None,
            active_refresh_tokens: Vec::new(),
            last_login_at: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stores a verification token hash valid for `ttl_minutes`
    ///
    /// Returns the computed expiry so callers persist the same instant.
    pub fn set_verification_token(&mut self, token_hash: String, ttl_minutes: i64) -> DateTime<Utc> {
        let expires_at = Utc::now() + Duration::minutes(ttl_minutes);
        self.email_verification_token_hash = Some(token_hash);
        self.email_verification_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
        expires_at
    }

    /// Clears any outstanding verification token
    pub fn clear_verification_token(&mut self) {
        self.email_verification_token_hash = None;
        self.email_verification_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Marks the email as verified and clears the verification token
    pub fn mark_email_verified(&mut self) {
        self.is_email_verified = true;
        self.clear_verification_token();
    }

    /// Stores a password reset token hash valid for `ttl_minutes`
    ///
    /// Returns the computed expiry so callers persist the same instant.
    pub fn set_reset_token(&mut self, token_hash: String, ttl_minutes: i64) -> DateTime<Utc> {
        let expires_at = Utc::now() + Duration::minutes(ttl_minutes);
        self.password_reset_token_hash = Some(token_hash);
        self.password_reset_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
        expires_at
    }

    /// Clears any outstanding password reset token
    pub fn clear_reset_token(&mut self) {
        self.password_reset_token_hash = None;
        self.password_reset_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Soft-deletes the account
    pub fn soft_delete(&mut self) {
        self.deleted = true;
        self.deleted_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Checks whether the account holds the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the outstanding verification token is still usable
    pub fn verification_token_valid(&self, now: DateTime<Utc>) -> bool {
        self.email_verification_token_hash.is_some()
            && self
                .email_verification_expires_at
                .map(|at| now < at)
                .unwrap_or(false)
    }

    /// Whether the outstanding reset token is still usable
    pub fn reset_token_valid(&self, now: DateTime<Utc>) -> bool {
        self.password_reset_token_hash.is_some()
            && self
                .password_reset_expires_at
                .map(|at| now < at)
                .unwrap_or(false)
    }
}
