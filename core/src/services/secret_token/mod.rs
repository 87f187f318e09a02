//! Single-use secret tokens for email verification and password reset
//!
//! The plain token travels to the user by email; only its SHA-256 digest is
//! persisted, so a database leak never exposes a usable token.

mod codec;

pub use codec::{SecretToken, SecretTokenCodec};
