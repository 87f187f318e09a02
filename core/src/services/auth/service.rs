//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;

use gk_shared::validation::{
    is_valid_password, is_valid_username, mask_email, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};

use crate::domain::entities::{Account, Profile, SessionTokens, TokenKind};
use crate::domain::value_objects::Email;
use crate::errors::{
    AuthError, DeliveryError, DomainError, DomainResult, TokenError, ValidationError,
};
use crate::repositories::AccountRepository;
use crate::services::mailer::Mailer;
use crate::services::secret_token::SecretTokenCodec;
use crate::services::token::TokenService;

use super::cache_invalidator::{CacheInvalidator, ACCOUNT_VIEWS_PATTERN};
use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};
use super::types::{NewAccount, RegisterOutcome};

/// Authentication service for managing the account credential lifecycle
///
/// Owns every transition between unregistered, pending verification, and
/// active, plus session issuance and revocation. All collaborators are
/// passed in at construction so tests can substitute any of them.
pub struct AuthService<R>
where
    R: AccountRepository,
{
    /// Account repository for credential persistence
    account_repository: Arc<R>,
    /// Token service for JWT issuance and verification
    token_service: Arc<TokenService>,
    /// Mailer for queueing verification and reset emails
    mailer: Arc<Mailer>,
    /// Optional invalidator for cached account list views
    cache_invalidator: Option<Arc<dyn CacheInvalidator>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<R> AuthService<R>
where
    R: AccountRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `account_repository` - Repository for account persistence
    /// * `token_service` - Service for JWT management
    /// * `mailer` - Service for queueing outbound email
    /// * `config` - Service configuration
    pub fn new(
        account_repository: Arc<R>,
        token_service: Arc<TokenService>,
        mailer: Arc<Mailer>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            account_repository,
            token_service,
            mailer,
            cache_invalidator: None,
            config,
        }
    }

    /// Attach a cache invalidator for account list views
    pub fn with_cache_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.cache_invalidator = Some(invalidator);
        self
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Validates username, email, and password
    /// 2. Rejects an email that already has an account
    /// 3. Hashes the password and persists the account
    /// 4. With verification required: stores a verification token and queues
    ///    the verification email, rolling the token back if queueing fails
    /// 5. Without verification: opens the first session immediately
    ///
    /// # Arguments
    ///
    /// * `new_account` - Registration input with the plain password
    ///
    /// # Returns
    ///
    /// * `Ok(RegisterOutcome)` - Pending verification or a live session
    /// * `Err(DomainError)` - Validation failure, duplicate email, or a
    ///   failure queueing the verification email
    pub async fn register(&self, new_account: NewAccount) -> DomainResult<RegisterOutcome> {
        // Step 1: Validate and normalize input
        let email = Email::parse(&new_account.email)
            .ok_or(DomainError::Validation(ValidationError::InvalidEmail))?;
        if !is_valid_username(&new_account.username) {
            return Err(DomainError::Validation(ValidationError::InvalidFormat {
                field: "username".to_string(),
            }));
        }
        if !is_valid_password(&new_account.password) {
            return Err(DomainError::Validation(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: PASSWORD_MIN_LENGTH,
                max: PASSWORD_MAX_LENGTH,
            }));
        }

        // Step 2: Reject a duplicate email before paying for the hash
        if self
            .account_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(DomainError::Auth(AuthError::DuplicateEmail));
        }

        // Step 3: Hash the password and persist the account; the unique
        // index backstops a concurrent registration racing past Step 2
        let password_hash = hash_password(&new_account.password, self.config.bcrypt_cost)?;
        let account = Account::new(
            new_account.username,
            email.as_str(),
            password_hash,
            Profile::new(new_account.first_name, new_account.last_name),
        );
        let mut account = self.account_repository.create(account).await?;
        self.invalidate_account_views().await;

        tracing::info!(
            account_id = %account.id,
            email = %email.masked(),
            "account registered"
        );

        if !self.config.verification_required {
            // Step 5: Verification disabled, open the first session now
            let tokens = self.open_session(&account).await?;
            return Ok(RegisterOutcome::SessionIssued { account, tokens });
        }

        // Step 4: Store the verification token, then queue the email
        let token = SecretTokenCodec::generate();
        let expires_at =
            account.set_verification_token(token.hash.clone(), self.config.token_ttl_minutes);
        self.account_repository
            .set_verification_token(account.id, &token.hash, expires_at)
            .await?;

        if let Err(e) = self
            .mailer
            .send_verification_email(&account.email, &token.plain)
            .await
        {
            // Roll the token back so the account is not left pointing at an
            // email that never went out
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "failed to queue verification email, rolling back token"
            );
            account.clear_verification_token();
            self.account_repository
                .clear_verification_token(account.id)
                .await?;
            return Err(DomainError::Delivery(DeliveryError::VerificationEmailFailed));
        }

        Ok(RegisterOutcome::VerificationPending { account })
    }

    /// Authenticate with email and password
    ///
    /// Unknown email and wrong password fail identically so the response
    /// does not reveal which part was wrong.
    ///
    /// # Arguments
    ///
    /// * `email` - The account email address
    /// * `password` - The plain password
    ///
    /// # Returns
    ///
    /// * `Ok((Account, SessionTokens))` - The account and its new session
    /// * `Err(DomainError)` - Bad credentials or unverified email
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<(Account, SessionTokens)> {
        // Step 1: Normalize the email; a malformed one can never match
        let email = match Email::parse(email) {
            Some(email) => email,
            None => return Err(DomainError::Auth(AuthError::InvalidCredentials)),
        };

        // Step 2: Look up the account and check the password
        let mut account = match self.account_repository.find_by_email(email.as_str()).await? {
            Some(account) => account,
            None => return Err(DomainError::Auth(AuthError::InvalidCredentials)),
        };
        if !verify_password(password, &account.password_hash)? {
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        // Step 3: Pending accounts cannot log in while verification is on
        if self.config.verification_required && !account.is_email_verified {
            return Err(DomainError::Auth(AuthError::EmailNotVerified));
        }

        // Step 4: Open a new session alongside any existing ones
        let tokens = self.open_session(&account).await?;
        account.record_login();
        self.account_repository.touch_last_login(account.id).await?;

        tracing::info!(
            account_id = %account.id,
            email = %email.masked(),
            "login succeeded"
        );
        Ok((account, tokens))
    }

    /// Confirm an email address with a verification token
    ///
    /// This method:
    /// 1. Hashes the presented token and looks up an account holding that
    ///    hash with an unexpired window
    /// 2. Marks the email verified and clears the token
    /// 3. Opens the account's first session
    ///
    /// # Arguments
    ///
    /// * `plain_token` - The token from the emailed link
    ///
    /// # Returns
    ///
    /// * `Ok((Account, SessionTokens))` - The verified account and session
    /// * `Err(DomainError)` - Unknown or expired token
    pub async fn verify_email(&self, plain_token: &str) -> DomainResult<(Account, SessionTokens)> {
        // Step 1: Only the hash ever touches the repository
        let token_hash = SecretTokenCodec::hash(plain_token);
        let mut account = self
            .account_repository
            .find_by_verification_token(&token_hash, Utc::now())
            .await?
            .ok_or(DomainError::Auth(AuthError::TokenInvalidOrExpired))?;

        // Step 2: Flip the account to verified
        account.mark_email_verified();
        self.account_repository
            .mark_email_verified(account.id)
            .await?;
        self.invalidate_account_views().await;

        // Step 3: First session for the now-active account
        let tokens = self.open_session(&account).await?;

        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            "email verified"
        );
        Ok((account, tokens))
    }

    /// Mint a new access token from a refresh token
    ///
    /// The refresh token must verify structurally and still be a member of
    /// the account's session list; every failure mode collapses into the
    /// same error. The refresh token itself is not rotated.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token presented by the client
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - A fresh access token
    /// * `Err(DomainError)` - Invalid, expired, or revoked refresh token
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<String> {
        // Step 1: Structural check of signature, expiry, and claims
        let account_id = self
            .token_service
            .verify_account_id(refresh_token, TokenKind::Refresh)
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?;

        // Step 2: Revocation check; membership in the session list is what
        // makes a structurally valid token actually honored
        let account = self
            .account_repository
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;
        if !self
            .account_repository
            .has_refresh_token(account.id, refresh_token)
            .await?
        {
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        // Step 3: New access token only; the refresh token stays as-is
        self.token_service.issue_access_token(account.id)
    }

    /// Close the session a refresh token belongs to
    ///
    /// Logout never fails for the caller: an unparseable token is treated
    /// as already logged out rather than revealing whether it was ever a
    /// session.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token to revoke
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The token was structurally valid and any matching
    ///   session was removed
    /// * `Ok(false)` - The token did not parse; nothing to do
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<bool> {
        // Step 1: An unparseable token is already as logged out as it gets
        let account_id = match self
            .token_service
            .verify_account_id(refresh_token, TokenKind::Refresh)
        {
            Ok(account_id) => account_id,
            Err(_) => return Ok(false),
        };

        // Step 2: Remove just this session; other sessions stay live
        if let Some(account) = self.account_repository.find_by_id(account_id).await? {
            let removed = self
                .account_repository
                .pull_refresh_token(account.id, refresh_token)
                .await?;
            if removed {
                tracing::info!(account_id = %account.id, "session revoked");
            }
        }
        Ok(true)
    }

    /// Send a fresh verification email to an unverified account
    ///
    /// This method:
    /// 1. Finds the account and rejects already-verified ones
    /// 2. Replaces any outstanding verification token with a new one
    /// 3. Queues the resend email, rolling the token back on failure
    ///
    /// # Arguments
    ///
    /// * `email` - The account email address
    pub async fn resend_verification(&self, email: &str) -> DomainResult<()> {
        // Step 1: Locate the account
        let mut account = self
            .find_account_by_raw_email(email)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;
        if account.is_email_verified {
            return Err(DomainError::Auth(AuthError::AlreadyVerified));
        }

        // Step 2: The new token fully replaces the old one
        let token = SecretTokenCodec::generate();
        let expires_at =
            account.set_verification_token(token.hash.clone(), self.config.token_ttl_minutes);
        self.account_repository
            .set_verification_token(account.id, &token.hash, expires_at)
            .await?;

        // Step 3: Queue the email
        if let Err(e) = self
            .mailer
            .resend_verification_email(&account.email, &token.plain)
            .await
        {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "failed to queue verification resend, rolling back token"
            );
            self.account_repository
                .clear_verification_token(account.id)
                .await?;
            return Err(DomainError::Delivery(DeliveryError::VerificationEmailFailed));
        }

        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            "verification email resent"
        );
        Ok(())
    }

    /// Start a password reset for an account
    ///
    /// Stores a short-lived reset token and queues the reset email.
    /// Existing sessions stay valid until the reset actually completes.
    ///
    /// # Arguments
    ///
    /// * `email` - The account email address
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        // Step 1: Locate the account
        let mut account = self
            .find_account_by_raw_email(email)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        // Step 2: Store the reset token
        let token = SecretTokenCodec::generate();
        let expires_at = account.set_reset_token(token.hash.clone(), self.config.token_ttl_minutes);
        self.account_repository
            .set_reset_token(account.id, &token.hash, expires_at)
            .await?;

        // Step 3: Queue the email, rolling the token back on failure
        if let Err(e) = self
            .mailer
            .send_reset_email(&account.email, &token.plain)
            .await
        {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "failed to queue reset email, rolling back token"
            );
            self.account_repository.clear_reset_token(account.id).await?;
            return Err(DomainError::Delivery(DeliveryError::ResetEmailFailed));
        }

        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            "password reset email queued"
        );
        Ok(())
    }

    /// Complete a password reset with the emailed token
    ///
    /// This method:
    /// 1. Validates the new password
    /// 2. Resolves the reset token to an account
    /// 3. Replaces the password and revokes every existing session
    /// 4. Opens one fresh session and returns it
    ///
    /// # Arguments
    ///
    /// * `plain_token` - The token from the emailed link
    /// * `new_password` - The replacement password in plain form
    ///
    /// # Returns
    ///
    /// * `Ok((Account, SessionTokens))` - The account and its only session
    /// * `Err(DomainError)` - Invalid password, unknown or expired token
    pub async fn reset_password(
        &self,
        plain_token: &str,
        new_password: &str,
    ) -> DomainResult<(Account, SessionTokens)> {
        // Step 1: Validate the replacement password
        if !is_valid_password(new_password) {
            return Err(DomainError::Validation(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: PASSWORD_MIN_LENGTH,
                max: PASSWORD_MAX_LENGTH,
            }));
        }

        // Step 2: Resolve the token
        let token_hash = SecretTokenCodec::hash(plain_token);
        let mut account = self
            .account_repository
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or(DomainError::Auth(AuthError::TokenInvalidOrExpired))?;

        // Step 3: Replace the credential and drop every live session; a
        // stolen refresh token dies here
        let password_hash = hash_password(new_password, self.config.bcrypt_cost)?;
        self.account_repository
            .reset_credentials(account.id, &password_hash)
            .await?;
        account.password_hash = password_hash;
        account.clear_reset_token();
        account.active_refresh_tokens.clear();
        self.invalidate_account_views().await;

        // Step 4: The reset response carries the one surviving session
        let tokens = self.open_session(&account).await?;

        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            "password reset completed, prior sessions revoked"
        );
        Ok((account, tokens))
    }

    /// Issues a token pair and registers the refresh half as a session
    async fn open_session(&self, account: &Account) -> DomainResult<SessionTokens> {
        let access_token = self.token_service.issue_access_token(account.id)?;
        let refresh_token = self.token_service.issue_refresh_token(account.id)?;
        self.account_repository
            .push_refresh_token(account.id, &refresh_token)
            .await?;
        Ok(SessionTokens::new(access_token, refresh_token))
    }

    /// Looks up an account by an unnormalized email
    ///
    /// A malformed address simply finds nothing.
    async fn find_account_by_raw_email(&self, email: &str) -> DomainResult<Option<Account>> {
        match Email::parse(email) {
            Some(email) => self.account_repository.find_by_email(email.as_str()).await,
            None => Ok(None),
        }
    }

    /// Best-effort invalidation of cached account list views
    async fn invalidate_account_views(&self) {
        if let Some(ref invalidator) = self.cache_invalidator {
            if let Err(e) = invalidator.invalidate_pattern(ACCOUNT_VIEWS_PATTERN).await {
                tracing::warn!(error = %e, "failed to invalidate account list cache");
            }
        }
    }
}
