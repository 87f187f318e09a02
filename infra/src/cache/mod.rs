//! Cache module for Redis-based operations
//!
//! This module provides the Redis client shared by the cache invalidation
//! hooks and the delivery job queue, including connection pooling and
//! retry logic.

pub mod invalidation;
pub mod redis_client;

pub use invalidation::RedisCacheInvalidator;
pub use redis_client::RedisClient;
