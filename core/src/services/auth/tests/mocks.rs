//! Mock implementations for testing the authentication service

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainResult;
use crate::queue::{DeliveryJob, JobQueue, QueueError};
use crate::services::auth::CacheInvalidator;

/// Queue broker that rejects every operation
///
/// Forces the mailer's enqueue step to fail so rollback paths can be
/// exercised.
pub struct FailingJobQueue;

#[async_trait]
impl JobQueue for FailingJobQueue {
    async fn enqueue(
        &self,
        _queue: &str,
        _payload: serde_json::Value,
    ) -> Result<DeliveryJob, QueueError> {
        Err(QueueError::Broker("connection refused".to_string()))
    }

    async fn reserve(
        &self,
        _queue: &str,
        _timeout: Duration,
    ) -> Result<Option<DeliveryJob>, QueueError> {
        Err(QueueError::Broker("connection refused".to_string()))
    }

    async fn complete(&self, _job: &DeliveryJob) -> Result<(), QueueError> {
        Err(QueueError::Broker("connection refused".to_string()))
    }

    async fn retry_later(&self, _job: &DeliveryJob, _delay: Duration) -> Result<(), QueueError> {
        Err(QueueError::Broker("connection refused".to_string()))
    }

    async fn discard(&self, _job: &DeliveryJob) -> Result<(), QueueError> {
        Err(QueueError::Broker("connection refused".to_string()))
    }
}

/// Cache invalidator that records the patterns it was asked to drop
pub struct CountingCacheInvalidator {
    pub patterns: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl CountingCacheInvalidator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            patterns: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
        })
    }

    pub fn invocations(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheInvalidator for CountingCacheInvalidator {
    async fn invalidate_pattern(&self, pattern: &str) -> DomainResult<u64> {
        self.patterns.lock().unwrap().push(pattern.to_string());
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}
