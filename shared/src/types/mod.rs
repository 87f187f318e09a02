//! Type definitions module
//!
//! - `response` - API response envelopes and health checks

pub mod response;

// Re-export commonly used types at module level
pub use response::{ApiResponse, HealthResponse, HealthStatus, MessageResponse, ResponseStatus};
