//! Redis-backed cache invalidation
//!
//! Bridges the domain-level `CacheInvalidator` seam to the Redis keyspace.
//! Account mutations hand over a route pattern; this module scopes it with
//! the configured key prefix and sweeps the matching entries.

use async_trait::async_trait;
use tracing::debug;

use gk_core::errors::{DomainError, DomainResult};
use gk_core::services::CacheInvalidator;

use crate::cache::RedisClient;

/// Cache invalidator backed by the shared Redis client
pub struct RedisCacheInvalidator {
    client: RedisClient,
}

impl RedisCacheInvalidator {
    /// Create a new invalidator over an existing Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for RedisCacheInvalidator {
    async fn invalidate_pattern(&self, pattern: &str) -> DomainResult<u64> {
        let scoped = self.client.config().make_key(pattern);
        debug!("Invalidating cache entries matching '{}'", scoped);

        let dropped = self
            .client
            .delete_pattern(&scoped)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Cache invalidation failed: {}", e),
            })?;

        Ok(dropped)
    }
}
