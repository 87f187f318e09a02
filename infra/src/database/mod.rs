//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer including:
//! - Connection pool management
//! - The MySQL account repository
//! - Embedded migrations

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlAccountRepository;
