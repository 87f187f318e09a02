//! Queue module for Redis-backed job delivery

pub mod redis_queue;

pub use redis_queue::RedisJobQueue;
