//! Token service module for JWT management
//!
//! Issues and verifies the HS256 access/refresh token pair. The two kinds
//! are signed with independent secrets so one can never stand in for the
//! other.

mod service;

pub use service::TokenService;
