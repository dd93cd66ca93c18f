//! Core utilities shared by the acquisition strategies
//!
//! - `cache`: on-disk cache paths and TTL-aware reads
//! - `cancel`: cancellation signal threaded through every suspension point
//! - `http`: API client construction and request headers
//! - `retry`: bounded exponential backoff for transient failures

pub mod cache;
pub mod cancel;
pub mod http;
pub mod retry;

pub use cancel::{cancellation, CancelHandle, Cancellation};
pub use retry::{with_retry, RetryPolicy};
