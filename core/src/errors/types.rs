//! Domain-specific error types for authentication and related operations
//!
//! Variants carry the messages that may be surfaced to API clients; anything
//! operational beyond these messages is logged, never returned.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("An account with this email already exists.")]
    DuplicateEmail,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Please verify your email address before logging in.")]
    EmailNotVerified,

    #[error("This email is already verified.")]
    AlreadyVerified,

    #[error("No account found with that email address.")]
    AccountNotFound,

    #[error("Token is invalid or has expired.")]
    TokenInvalidOrExpired,
}

/// JWT-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length for field: {field} (min: {min}, max: {max})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
    },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Duplicate value for field: {field}")]
    DuplicateValue { field: String },
}

/// Failures in the synchronous part of email delivery
///
/// Rendering the template and enqueuing the job happen on the request path;
/// when either fails the triggering operation is rolled back and one of
/// these is returned. Failures inside the background worker never surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("There was an error sending the verification email. Please try again later.")]
    VerificationEmailFailed,

    #[error("There was an error sending the password reset email. Please try again later.")]
    ResetEmailFailed,
}
