//! Download-with-retry: HTTP client and backoff engine.

pub mod client;
pub mod retry;

pub use client::Fetcher;
pub use retry::{with_retry, Retryable, RetryConfig};
