//! Shared utilities and common types for the Gatekey server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - API response envelopes
//! - Validation utilities (email, username, password)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment,
    JwtConfig, QueueConfig, ServerConfig, VerificationConfig,
};
pub use types::{ApiResponse, HealthResponse, HealthStatus, MessageResponse, ResponseStatus};
pub use utils::validation;
