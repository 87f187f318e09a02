//! Cache invalidation seam for account mutations

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Key-pattern scoped pattern matching every cached account list view
///
/// The cache layer prepends its own key prefix before matching.
pub const ACCOUNT_VIEWS_PATTERN: &str = "/api/v1/accounts*";

/// Drops cached read views after a write invalidates them
///
/// Invalidation is best effort: callers log failures and continue, since a
/// stale cache entry expires on its own TTL anyway.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Removes every cached entry whose key matches `pattern`
    ///
    /// Returns the number of entries dropped.
    async fn invalidate_pattern(&self, pattern: &str) -> DomainResult<u64>;
}
