//! In-process queue broker
//!
//! Backs the [`JobQueue`] contract with plain collections behind a mutex.
//! Used by tests and available as a single-process fallback when no broker
//! is configured. Delayed jobs are tracked against the tokio clock so tests
//! can drive retries with a paused runtime.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::job::DeliveryJob;
use super::traits::{JobQueue, QueueError};

const RESERVE_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Default)]
struct QueueState {
    waiting: VecDeque<DeliveryJob>,
    active: Vec<DeliveryJob>,
    delayed: Vec<(Instant, DeliveryJob)>,
}

impl QueueState {
    fn promote_due(&mut self, now: Instant) {
        let mut i = 0;
        while i < self.delayed.len() {
            if self.delayed[i].0 <= now {
                let (_, job) = self.delayed.remove(i);
                self.waiting.push_back(job);
            } else {
                i += 1;
            }
        }
    }
}

/// [`JobQueue`] implementation holding all state in process memory
#[derive(Default)]
pub struct MemoryJobQueue {
    queues: Mutex<HashMap<String, QueueState>>,
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting or delayed on the named queue
    ///
    /// Active jobs are not counted; they are owned by a worker.
    pub async fn pending_count(&self, queue: &str) -> usize {
        let queues = self.queues.lock().await;
        queues
            .get(queue)
            .map(|state| state.waiting.len() + state.delayed.len())
            .unwrap_or(0)
    }

    async fn try_reserve(&self, queue: &str) -> Option<DeliveryJob> {
        let mut queues = self.queues.lock().await;
        let state = queues.entry(queue.to_string()).or_default();
        state.promote_due(Instant::now());
        let job = state.waiting.pop_front()?;
        state.active.push(job.clone());
        Some(job)
    }

    async fn remove_active(&self, job: &DeliveryJob) {
        let mut queues = self.queues.lock().await;
        if let Some(state) = queues.get_mut(&job.queue) {
            state.active.retain(|active| active.id != job.id);
        }
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(
        &self,
        queue: &str,
        payload: serde_json::Value,
    ) -> Result<DeliveryJob, QueueError> {
        let job = DeliveryJob::new(queue, payload);
        let mut queues = self.queues.lock().await;
        queues
            .entry(queue.to_string())
            .or_default()
            .waiting
            .push_back(job.clone());
        Ok(job)
    }

    async fn reserve(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<DeliveryJob>, QueueError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(job) = self.try_reserve(queue).await {
                return Ok(Some(job));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let wait = RESERVE_POLL_INTERVAL.min(deadline - now);
            tokio::time::sleep(wait).await;
        }
    }

    async fn complete(&self, job: &DeliveryJob) -> Result<(), QueueError> {
        self.remove_active(job).await;
        Ok(())
    }

    async fn retry_later(&self, job: &DeliveryJob, delay: Duration) -> Result<(), QueueError> {
        let due_at = Instant::now() + delay;
        let mut queues = self.queues.lock().await;
        if let Some(state) = queues.get_mut(&job.queue) {
            state.active.retain(|active| active.id != job.id);
            state.delayed.push((due_at, job.next_attempt()));
        }
        Ok(())
    }

    async fn discard(&self, job: &DeliveryJob) -> Result<(), QueueError> {
        self.remove_active(job).await;
        Ok(())
    }
}
