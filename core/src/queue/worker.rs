//! Per-queue worker tasks

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::job::DeliveryJob;
use super::retry::{RetryDecision, RetryPolicy};
use super::traits::{JobHandler, JobQueue};

/// Pause after a broker error before the next reserve attempt
const BROKER_ERROR_PAUSE: Duration = Duration::from_secs(1);

struct Registration {
    queue: String,
    concurrency: usize,
    handler: Arc<dyn JobHandler>,
}

/// Spawns and supervises the consumer tasks for every registered queue
///
/// Each registration gets `concurrency` independent tasks looping on
/// reserve, handle, settle. Shutdown is cooperative: workers observe the
/// flag between reservations, so stopping takes at most one reserve
/// timeout plus whatever job is currently in flight. A job that has been
/// reserved is never abandoned mid-handler.
pub struct WorkerPool {
    queue: Arc<dyn JobQueue>,
    policy: RetryPolicy,
    reserve_timeout: Duration,
    registrations: Vec<Registration>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(queue: Arc<dyn JobQueue>, policy: RetryPolicy, reserve_timeout: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            queue,
            policy,
            reserve_timeout,
            registrations: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Registers a handler with a fixed worker count for one queue
    pub fn register(
        &mut self,
        queue: impl Into<String>,
        concurrency: usize,
        handler: Arc<dyn JobHandler>,
    ) {
        self.registrations.push(Registration {
            queue: queue.into(),
            concurrency,
            handler,
        });
    }

    /// Spawns all worker tasks
    pub fn start(&mut self) {
        for registration in &self.registrations {
            for worker in 0..registration.concurrency {
                let handle = tokio::spawn(worker_loop(
                    Arc::clone(&self.queue),
                    registration.queue.clone(),
                    worker,
                    Arc::clone(&registration.handler),
                    self.policy.clone(),
                    self.reserve_timeout,
                    self.shutdown_rx.clone(),
                ));
                self.handles.push(handle);
            }
        }
        tracing::info!(workers = self.handles.len(), "worker pool started");
    }

    /// Signals all workers to stop and waits for them to finish
    ///
    /// In-flight jobs run to completion before their worker exits.
    pub async fn shutdown(mut self) {
        tracing::info!(workers = self.handles.len(), "stopping worker pool");
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "worker task did not stop cleanly");
            }
        }
        tracing::info!("worker pool stopped");
    }
}

async fn worker_loop(
    queue: Arc<dyn JobQueue>,
    queue_name: String,
    worker: usize,
    handler: Arc<dyn JobHandler>,
    policy: RetryPolicy,
    reserve_timeout: Duration,
    shutdown: watch::Receiver<bool>,
) {
    tracing::debug!(queue = %queue_name, worker = worker, "worker started");
    loop {
        if *shutdown.borrow() {
            break;
        }
        match queue.reserve(&queue_name, reserve_timeout).await {
            Ok(Some(job)) => process_job(queue.as_ref(), handler.as_ref(), &policy, job).await,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    queue = %queue_name,
                    error = %e,
                    "failed to reserve a job, backing off"
                );
                tokio::time::sleep(BROKER_ERROR_PAUSE).await;
            }
        }
    }
    tracing::debug!(queue = %queue_name, worker = worker, "worker stopped");
}

async fn process_job(
    queue: &dyn JobQueue,
    handler: &dyn JobHandler,
    policy: &RetryPolicy,
    job: DeliveryJob,
) {
    tracing::debug!(
        job_id = %job.id,
        queue = %job.queue,
        attempt = job.attempt,
        "processing job"
    );

    match handler.handle(&job).await {
        Ok(()) => {
            tracing::debug!(job_id = %job.id, queue = %job.queue, "job completed");
            if let Err(e) = queue.complete(&job).await {
                tracing::warn!(job_id = %job.id, error = %e, "failed to remove completed job");
            }
        }
        Err(err) => {
            let attempts_made = job.attempt + 1;
            match policy.decide(attempts_made) {
                RetryDecision::Retry(delay) => {
                    tracing::warn!(
                        job_id = %job.id,
                        queue = %job.queue,
                        attempt = attempts_made,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "job failed, scheduling retry"
                    );
                    if let Err(e) = queue.retry_later(&job, delay).await {
                        tracing::error!(job_id = %job.id, error = %e, "failed to reschedule job");
                    }
                }
                RetryDecision::Discard => {
                    tracing::error!(
                        job_id = %job.id,
                        queue = %job.queue,
                        attempts = attempts_made,
                        error = %err,
                        "job failed after final attempt, dropping"
                    );
                    if let Err(e) = queue.discard(&job).await {
                        tracing::error!(job_id = %job.id, error = %e, "failed to remove failed job");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::memory::MemoryJobQueue;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct RecordingHandler {
        failures: u32,
        calls: Mutex<Vec<Instant>>,
    }

    impl RecordingHandler {
        fn failing_first(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobHandler for RecordingHandler {
        async fn handle(&self, _job: &DeliveryJob) -> anyhow::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            if calls.len() as u32 <= self.failures {
                anyhow::bail!("handler refused the job");
            }
            Ok(())
        }
    }

    fn pool_with(
        queue: Arc<MemoryJobQueue>,
        handler: Arc<dyn JobHandler>,
        concurrency: usize,
    ) -> WorkerPool {
        let mut pool = WorkerPool::new(
            queue,
            RetryPolicy::default(),
            Duration::from_millis(100),
        );
        pool.register("email", concurrency, handler);
        pool
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_job_runs_exactly_three_times_then_drops() {
        let queue = Arc::new(MemoryJobQueue::new());
        let handler = RecordingHandler::failing_first(u32::MAX);
        let mut pool = pool_with(Arc::clone(&queue), handler.clone(), 1);
        pool.start();

        queue.enqueue("email", json!({"to": "a@example.com"})).await.unwrap();

        // Well past the full 1s + 2s backoff schedule in virtual time
        tokio::time::sleep(Duration::from_secs(30)).await;
        pool.shutdown().await;

        let calls = handler.call_times();
        assert_eq!(calls.len(), 3, "no fourth attempt after the budget is spent");

        let first_gap = calls[1] - calls[0];
        let second_gap = calls[2] - calls[1];
        assert!(
            first_gap >= Duration::from_secs(1) && first_gap < Duration::from_millis(1500),
            "first retry after ~1s, got {:?}",
            first_gap
        );
        assert!(
            second_gap >= Duration::from_secs(2) && second_gap < Duration::from_millis(2500),
            "second retry after ~2s, got {:?}",
            second_gap
        );
        assert_eq!(queue.pending_count("email").await, 0, "job dropped from broker");
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_failing_once_is_retried_then_completes() {
        let queue = Arc::new(MemoryJobQueue::new());
        let handler = RecordingHandler::failing_first(1);
        let mut pool = pool_with(Arc::clone(&queue), handler.clone(), 1);
        pool.start();

        queue.enqueue("email", json!({})).await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        pool.shutdown().await;

        assert_eq!(handler.call_times().len(), 2);
        assert_eq!(queue.pending_count("email").await, 0);
    }

    struct ParallelProbe {
        in_flight: AtomicU32,
        peak: AtomicU32,
    }

    #[async_trait]
    impl JobHandler for ParallelProbe {
        async fn handle(&self, _job: &DeliveryJob) -> anyhow::Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_used_and_bounded() {
        let queue = Arc::new(MemoryJobQueue::new());
        let probe = Arc::new(ParallelProbe {
            in_flight: AtomicU32::new(0),
            peak: AtomicU32::new(0),
        });
        for _ in 0..4 {
            queue.enqueue("email", json!({})).await.unwrap();
        }

        let mut pool = pool_with(Arc::clone(&queue), probe.clone(), 2);
        pool.start();
        tokio::time::sleep(Duration::from_secs(5)).await;
        pool.shutdown().await;

        assert_eq!(queue.pending_count("email").await, 0);
        assert_eq!(
            probe.peak.load(Ordering::SeqCst),
            2,
            "two workers run in parallel, never more"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_processing_after_shutdown() {
        let queue = Arc::new(MemoryJobQueue::new());
        let handler = RecordingHandler::failing_first(0);
        let mut pool = pool_with(Arc::clone(&queue), handler.clone(), 1);
        pool.start();
        pool.shutdown().await;

        queue.enqueue("email", json!({})).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(handler.call_times().is_empty());
        assert_eq!(queue.pending_count("email").await, 1);
    }
}
