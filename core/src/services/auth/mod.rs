//! Authentication service module
//!
//! This module provides the complete account credential lifecycle:
//! - Registration with email verification
//! - Login, refresh, and logout over JWT session pairs
//! - Password reset with logout-everywhere semantics
//! - Cache invalidation hooks for account list views

mod cache_invalidator;
mod config;
mod password;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use cache_invalidator::{CacheInvalidator, ACCOUNT_VIEWS_PATTERN};
pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use types::{NewAccount, RegisterOutcome};
