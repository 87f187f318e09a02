//! Redis-backed delivery job queue
//!
//! Each named queue maps to three Redis keys:
//!
//! * `queue:{name}:waiting` - LIST of jobs ready to run (LPUSH on enqueue,
//!   consumed from the tail for FIFO order)
//! * `queue:{name}:active`  - LIST of jobs currently held by a worker
//! * `queue:{name}:delayed` - ZSET of rescheduled jobs scored by the unix
//!   millisecond timestamp at which they become due
//!
//! Reservation moves a job from waiting to active in one LMOVE, so a job is
//! never in limbo between lists. Settling (`complete`, `retry_later`,
//! `discard`) removes the active entry by value; job encoding is
//! deterministic (serde_json sorts map keys, struct fields have a fixed
//! order), so re-serializing the reserved job always matches the stored
//! entry byte for byte.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use gk_core::queue::{DeliveryJob, JobQueue, QueueError};

use crate::cache::RedisClient;

/// How long reserve sleeps between polls of an empty queue
///
/// Polling with a plain LMOVE keeps the shared multiplexed connection free;
/// a blocking BLMOVE would stall every other command multiplexed onto it.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Redis implementation of the delivery job queue
pub struct RedisJobQueue {
    client: RedisClient,
}

impl RedisJobQueue {
    /// Create a new queue over an existing Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn waiting_key(queue: &str) -> String {
        format!("queue:{}:waiting", queue)
    }

    fn active_key(queue: &str) -> String {
        format!("queue:{}:active", queue)
    }

    fn delayed_key(queue: &str) -> String {
        format!("queue:{}:delayed", queue)
    }

    fn encode(job: &DeliveryJob) -> Result<String, QueueError> {
        serde_json::to_string(job).map_err(|e| QueueError::Serialization(e.to_string()))
    }

    fn decode(raw: &str) -> Result<DeliveryJob, QueueError> {
        serde_json::from_str(raw).map_err(|e| QueueError::Serialization(e.to_string()))
    }

    fn broker_err(e: redis::RedisError) -> QueueError {
        QueueError::Broker(e.to_string())
    }

    /// Move every due delayed job back onto the waiting list
    ///
    /// ZREM returns how many members it removed, so when several workers
    /// promote concurrently only the one that actually removed the member
    /// re-queues it.
    async fn promote_due(
        &self,
        conn: &mut MultiplexedConnection,
        queue: &str,
    ) -> Result<(), QueueError> {
        let delayed = Self::delayed_key(queue);
        let waiting = Self::waiting_key(queue);
        let now_ms = Utc::now().timestamp_millis();

        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(&delayed)
            .arg("-inf")
            .arg(now_ms)
            .query_async(conn)
            .await
            .map_err(Self::broker_err)?;

        for member in due {
            let won: i64 = redis::cmd("ZREM")
                .arg(&delayed)
                .arg(&member)
                .query_async(conn)
                .await
                .map_err(Self::broker_err)?;

            if won == 1 {
                redis::cmd("LPUSH")
                    .arg(&waiting)
                    .arg(&member)
                    .query_async::<_, ()>(conn)
                    .await
                    .map_err(Self::broker_err)?;
                debug!(queue = queue, "Promoted delayed job back to waiting");
            }
        }

        Ok(())
    }

    /// Remove one active entry matching the job's encoding
    async fn remove_active(&self, job: &DeliveryJob) -> Result<i64, QueueError> {
        let mut conn = self.client.connection();
        let encoded = Self::encode(job)?;

        redis::cmd("LREM")
            .arg(Self::active_key(&job.queue))
            .arg(1)
            .arg(&encoded)
            .query_async(&mut conn)
            .await
            .map_err(Self::broker_err)
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(
        &self,
        queue: &str,
        payload: serde_json::Value,
    ) -> Result<DeliveryJob, QueueError> {
        let job = DeliveryJob::new(queue, payload);
        let encoded = Self::encode(&job)?;
        let mut conn = self.client.connection();

        redis::cmd("LPUSH")
            .arg(Self::waiting_key(queue))
            .arg(&encoded)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(Self::broker_err)?;

        debug!(queue = queue, job_id = %job.id, "Enqueued job");
        Ok(job)
    }

    async fn reserve(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<DeliveryJob>, QueueError> {
        let waiting = Self::waiting_key(queue);
        let active = Self::active_key(queue);
        let deadline = Instant::now() + timeout;
        let mut conn = self.client.connection();

        loop {
            self.promote_due(&mut conn, queue).await?;

            // Tail of the waiting list is the oldest job
            let moved: Option<String> = redis::cmd("LMOVE")
                .arg(&waiting)
                .arg(&active)
                .arg("RIGHT")
                .arg("LEFT")
                .query_async(&mut conn)
                .await
                .map_err(Self::broker_err)?;

            if let Some(raw) = moved {
                let job = Self::decode(&raw)?;
                debug!(queue = queue, job_id = %job.id, attempt = job.attempt, "Reserved job");
                return Ok(Some(job));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            sleep(remaining.min(POLL_INTERVAL)).await;
        }
    }

    async fn complete(&self, job: &DeliveryJob) -> Result<(), QueueError> {
        let removed = self.remove_active(job).await?;
        if removed == 0 {
            warn!(queue = %job.queue, job_id = %job.id, "Completed job was not in the active list");
        } else {
            debug!(queue = %job.queue, job_id = %job.id, "Completed job");
        }
        Ok(())
    }

    async fn retry_later(&self, job: &DeliveryJob, delay: Duration) -> Result<(), QueueError> {
        let old = Self::encode(job)?;
        let next = Self::encode(&job.next_attempt())?;
        let due_ms = Utc::now().timestamp_millis() + delay.as_millis() as i64;
        let mut conn = self.client.connection();

        // MULTI/EXEC so the job cannot vanish between leaving the active
        // list and landing in the delayed set
        let (_removed, _added): (i64, i64) = redis::pipe()
            .atomic()
            .cmd("LREM")
            .arg(Self::active_key(&job.queue))
            .arg(1)
            .arg(&old)
            .cmd("ZADD")
            .arg(Self::delayed_key(&job.queue))
            .arg(due_ms)
            .arg(&next)
            .query_async(&mut conn)
            .await
            .map_err(Self::broker_err)?;

        debug!(
            queue = %job.queue,
            job_id = %job.id,
            attempt = job.attempt + 1,
            delay_ms = delay.as_millis() as u64,
            "Rescheduled job"
        );
        Ok(())
    }

    async fn discard(&self, job: &DeliveryJob) -> Result<(), QueueError> {
        let removed = self.remove_active(job).await?;
        if removed == 0 {
            warn!(queue = %job.queue, job_id = %job.id, "Discarded job was not in the active list");
        } else {
            warn!(
                queue = %job.queue,
                job_id = %job.id,
                attempts = job.attempt,
                "Discarded job after repeated failures"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_keys_are_namespaced() {
        assert_eq!(RedisJobQueue::waiting_key("email"), "queue:email:waiting");
        assert_eq!(RedisJobQueue::active_key("email"), "queue:email:active");
        assert_eq!(RedisJobQueue::delayed_key("email"), "queue:email:delayed");
    }

    #[test]
    fn test_encoding_is_stable_across_round_trips() {
        let job = DeliveryJob::new("email", json!({"to": "a@example.com", "subject": "hi"}));

        let first = RedisJobQueue::encode(&job).unwrap();
        let decoded = RedisJobQueue::decode(&first).unwrap();
        let second = RedisJobQueue::encode(&decoded).unwrap();

        // Settling removes active entries by value, so the encoding must
        // survive a decode/encode cycle unchanged
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = RedisJobQueue::decode("not json");
        assert!(matches!(result, Err(QueueError::Serialization(_))));
    }
}
