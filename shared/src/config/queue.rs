//! Job queue configuration module

use serde::{Deserialize, Serialize};

/// Background job queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Redis connection URL backing the queue
    pub url: String,

    /// Worker concurrency for the email queue
    #[serde(default = "default_email_concurrency")]
    pub email_concurrency: usize,

    /// Worker concurrency for every other queue
    #[serde(default = "default_concurrency")]
    pub default_concurrency: usize,

    /// Maximum delivery attempts before a job is dropped
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay in milliseconds before each retry, indexed by failure count
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: Vec<u64>,

    /// How long a worker blocks waiting for a job, in seconds
    #[serde(default = "default_reserve_timeout")]
    pub reserve_timeout: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            email_concurrency: default_email_concurrency(),
            default_concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            reserve_timeout: default_reserve_timeout(),
        }
    }
}

impl QueueConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("QUEUE_REDIS_URL")
            .or_else(|_| std::env::var("REDIS_URL"))
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let email_concurrency = std::env::var("QUEUE_EMAIL_CONCURRENCY")
            .unwrap_or_else(|_| default_email_concurrency().to_string())
            .parse()
            .unwrap_or_else(|_| default_email_concurrency());
        let max_attempts = std::env::var("QUEUE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| default_max_attempts().to_string())
            .parse()
            .unwrap_or_else(|_| default_max_attempts());

        Self {
            url,
            email_concurrency,
            max_attempts,
            ..Default::default()
        }
    }

    /// Create a new queue configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of delivery attempts
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Worker count for the named queue
    ///
    /// The email queue gets its own knob; every other queue shares the
    /// default.
    pub fn concurrency_for(&self, queue: &str) -> usize {
        match queue {
            "email" => self.email_concurrency,
            _ => self.default_concurrency,
        }
    }
}

fn default_email_concurrency() -> usize {
    5
}

fn default_concurrency() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> Vec<u64> {
    vec![1000, 2000, 4000]
}

fn default_reserve_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_config_default() {
        let config = QueueConfig::default();
        assert_eq!(config.email_concurrency, 5);
        assert_eq!(config.default_concurrency, 2);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_ms, vec![1000, 2000, 4000]);
    }

    #[test]
    fn test_queue_config_builder() {
        let config = QueueConfig::new("redis://queue:6379").with_max_attempts(5);
        assert_eq!(config.url, "redis://queue:6379");
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_concurrency_lookup() {
        let config = QueueConfig::default();
        assert_eq!(config.concurrency_for("email"), 5);
        assert_eq!(config.concurrency_for("reports"), 2);
    }
}
