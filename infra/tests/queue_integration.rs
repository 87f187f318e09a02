//! Integration tests for the Redis job queue
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p gk_infra --test queue_integration -- --ignored

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use gk_core::queue::JobQueue;
use gk_infra::{RedisClient, RedisJobQueue};
use gk_shared::config::CacheConfig;

async fn test_queue() -> RedisJobQueue {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    );
    let client = RedisClient::new(config)
        .await
        .expect("Failed to connect to Redis");
    RedisJobQueue::new(client)
}

/// Every test works on its own queue name so runs never interfere
fn unique_queue() -> String {
    format!("test-email-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_enqueue_then_reserve_returns_same_job() {
    let queue = test_queue().await;
    let name = unique_queue();

    let enqueued = queue
        .enqueue(&name, json!({"to": "a@example.com", "subject": "hi"}))
        .await
        .unwrap();

    let reserved = queue
        .reserve(&name, Duration::from_secs(1))
        .await
        .unwrap()
        .expect("queued job should be reservable");

    assert_eq!(reserved.id, enqueued.id);
    assert_eq!(reserved.attempt, 0);
    assert_eq!(reserved.payload["to"], "a@example.com");

    queue.complete(&reserved).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_reserve_times_out_on_empty_queue() {
    let queue = test_queue().await;
    let name = unique_queue();

    let reserved = queue
        .reserve(&name, Duration::from_millis(300))
        .await
        .unwrap();

    assert!(reserved.is_none());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_jobs_come_back_in_fifo_order() {
    let queue = test_queue().await;
    let name = unique_queue();

    let first = queue.enqueue(&name, json!({"n": 1})).await.unwrap();
    let second = queue.enqueue(&name, json!({"n": 2})).await.unwrap();

    let a = queue
        .reserve(&name, Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();
    let b = queue
        .reserve(&name, Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(a.id, first.id);
    assert_eq!(b.id, second.id);

    queue.complete(&a).await.unwrap();
    queue.complete(&b).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_retry_later_holds_job_until_due() {
    let queue = test_queue().await;
    let name = unique_queue();

    queue.enqueue(&name, json!({"n": 1})).await.unwrap();
    let job = queue
        .reserve(&name, Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();

    queue
        .retry_later(&job, Duration::from_millis(400))
        .await
        .unwrap();

    // Not due yet
    let early = queue
        .reserve(&name, Duration::from_millis(100))
        .await
        .unwrap();
    assert!(early.is_none());

    // Due after the delay elapses
    let retried = queue
        .reserve(&name, Duration::from_secs(2))
        .await
        .unwrap()
        .expect("delayed job should be promoted once due");

    assert_eq!(retried.id, job.id);
    assert_eq!(retried.attempt, 1);

    queue.complete(&retried).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_discard_removes_job_for_good() {
    let queue = test_queue().await;
    let name = unique_queue();

    queue.enqueue(&name, json!({"n": 1})).await.unwrap();
    let job = queue
        .reserve(&name, Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();

    queue.discard(&job).await.unwrap();

    let after = queue
        .reserve(&name, Duration::from_millis(300))
        .await
        .unwrap();
    assert!(after.is_none());
}
