//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Gatekey backend,
//! following Clean Architecture principles. It provides concrete
//! implementations for the ports defined in `gk_core`:
//!
//! - **Database**: MySQL account repository using SQLx
//! - **Cache**: Redis client and the accounts-view cache invalidator
//! - **Queue**: Redis-backed job queue for background email delivery
//! - **Email**: SMTP mail sender over lettre

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and cache invalidation
pub mod cache;

/// Queue module - Redis-backed job queue broker
pub mod queue;

/// Email module - SMTP delivery of queued email jobs
pub mod email;

// Re-export commonly used types
pub use cache::{RedisCacheInvalidator, RedisClient};
pub use database::{DatabasePool, MySqlAccountRepository, PoolStatistics};
pub use email::SmtpMailSender;
pub use queue::RedisJobQueue;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache or queue error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
