//! Named background job queues and the worker pool that drains them
//!
//! Producers enqueue fire-and-forget [`DeliveryJob`]s; per-queue workers pull
//! them, invoke the registered handler, and apply the retry policy on
//! failure. Delivery is at-least-once: enqueueing is not transactional with
//! the request that triggered it, and a job is dropped only after its retry
//! budget is exhausted.

mod job;
mod memory;
mod retry;
mod traits;
mod worker;

pub use job::DeliveryJob;
pub use memory::MemoryJobQueue;
pub use retry::{RetryDecision, RetryPolicy};
pub use traits::{JobHandler, JobQueue, QueueError};
pub use worker::WorkerPool;
