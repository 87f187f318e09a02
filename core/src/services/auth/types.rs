//! Input and outcome types for the authentication flows

use crate::domain::entities::{Account, SessionTokens};

/// Input for registering a new account
///
/// The password arrives in plain form and is hashed inside the register
/// flow, never stored or logged as-is.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of a successful registration
///
/// Which variant comes back depends on whether email verification is
/// required: a pending account has no session until it verifies.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// Account created and a verification email queued; no session yet
    VerificationPending { account: Account },

    /// Verification disabled; the account is live with its first session
    SessionIssued {
        account: Account,
        tokens: SessionTokens,
    },
}
