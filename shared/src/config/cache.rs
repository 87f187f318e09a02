//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Response timeout in seconds
    pub response_timeout: u64,

    /// Default TTL for cache entries in seconds
    #[serde(default = "default_ttl")]
    pub default_ttl: u64,

    /// Prefix applied to every cache key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            response_timeout: 5,
            default_ttl: default_ttl(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix =
            std::env::var("CACHE_KEY_PREFIX").unwrap_or_else(|_| default_key_prefix());
        let default_ttl = std::env::var("CACHE_DEFAULT_TTL")
            .unwrap_or_else(|_| default_ttl().to_string())
            .parse()
            .unwrap_or_else(|_| default_ttl());

        Self {
            url,
            key_prefix,
            default_ttl,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Generate a cache key with the configured prefix
    pub fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_key_prefix() -> String {
    String::from("cache:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.key_prefix, "cache:");
    }

    #[test]
    fn test_make_key_applies_prefix() {
        let config = CacheConfig::default();
        assert_eq!(
            config.make_key("/api/v1/accounts"),
            "cache:/api/v1/accounts"
        );
    }

    #[test]
    fn test_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379").with_prefix("gk:");
        assert_eq!(config.make_key("x"), "gk:x");
    }
}
