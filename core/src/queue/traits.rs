//! Broker and handler contracts

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::job::DeliveryJob;

/// Errors surfaced by a queue broker
#[derive(Error, Debug)]
pub enum QueueError {
    /// The job payload could not be serialized or deserialized
    #[error("Failed to serialize job payload: {0}")]
    Serialization(String),

    /// The broker connection or a broker command failed
    #[error("Queue broker error: {0}")]
    Broker(String),
}

/// A named, at-least-once work queue
///
/// Implementations back the queue with a broker (Redis in production, an
/// in-process structure in tests). `reserve` moves a job from waiting to
/// active; the caller must then settle it with exactly one of `complete`,
/// `retry_later`, or `discard`.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Appends a job to the named queue and returns immediately
    ///
    /// The caller gets no delivery feedback beyond broker acceptance.
    async fn enqueue(
        &self,
        queue: &str,
        payload: serde_json::Value,
    ) -> Result<DeliveryJob, QueueError>;

    /// Pulls the next waiting job, blocking up to `timeout`
    ///
    /// Delayed jobs whose backoff has elapsed are promoted back to waiting
    /// before the queue is read. Returns `Ok(None)` when the timeout passes
    /// with nothing to do.
    async fn reserve(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<DeliveryJob>, QueueError>;

    /// Removes a successfully handled job from the broker
    async fn complete(&self, job: &DeliveryJob) -> Result<(), QueueError>;

    /// Reschedules a failed job to run again after `delay`
    ///
    /// The broker stores the job with its attempt counter already bumped,
    /// so the next reservation sees the incremented count.
    async fn retry_later(&self, job: &DeliveryJob, delay: Duration) -> Result<(), QueueError>;

    /// Removes a permanently failed job from the broker
    async fn discard(&self, job: &DeliveryJob) -> Result<(), QueueError>;
}

/// Consumer-side processing of one job
///
/// Returning an error counts one failed attempt; the worker pool applies
/// the retry policy. Handlers must be safe to run more than once for the
/// same job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &DeliveryJob) -> anyhow::Result<()>;
}
