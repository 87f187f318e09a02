//! The unit of queued work

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One queued outbound notification
///
/// A job's lifecycle state (waiting, active, delayed) is the broker list it
/// currently sits in, not a field on the job. Completed and permanently
/// failed jobs are removed from the broker; no durable history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryJob {
    /// Unique job identifier, assigned at enqueue time
    pub id: Uuid,
    /// Name of the queue the job belongs to
    pub queue: String,
    /// Opaque handler payload
    pub payload: serde_json::Value,
    /// Completed (failed) handler runs so far; 0 until the first failure
    pub attempt: u32,
    /// When the job was first enqueued
    pub enqueued_at: DateTime<Utc>,
}

impl DeliveryJob {
    /// Creates a fresh job for the named queue
    pub fn new(queue: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue: queue.into(),
            payload,
            attempt: 0,
            enqueued_at: Utc::now(),
        }
    }

    /// Returns a copy of the job with the attempt counter bumped
    ///
    /// Used by brokers when rescheduling after a handler failure.
    pub fn next_attempt(&self) -> Self {
        let mut job = self.clone();
        job.attempt += 1;
        job
    }
}
