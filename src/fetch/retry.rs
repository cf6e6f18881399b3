//! Retry logic with exponential backoff.
//!
//! Transient failures are retried with exponentially growing delays between
//! attempts; permanent failures abort immediately. Execution is synchronous —
//! the pipeline processes one file at a time and blocking between attempts is
//! the intended behavior.

use std::time::Duration;

use crate::error::ReportError;

/// Retry tuning for one operation.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first (0 behaves like 1).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Growth factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Build from the download section of the application config.
    pub fn from_download(config: &crate::config::DownloadConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_backoff(),
            max_delay: config.max_backoff(),
            backoff_multiplier: 2.0,
        }
    }
}

/// Classify errors as transient (worth retrying) or permanent.
pub trait Retryable {
    /// Returns true if the error is transient and the operation should be retried.
    fn is_retryable(&self) -> bool;
}

impl Retryable for ReportError {
    fn is_retryable(&self) -> bool {
        match self {
            // Timeouts and connection failures are transient.
            ReportError::Network(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            // The server answered; it may answer differently next time.
            ReportError::HttpStatus { .. } => true,
            // Transient I/O kinds only — a failed file create or a full disk
            // will not improve on retry.
            ReportError::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            ReportError::FileNotFound(_)
            | ReportError::InvalidReport { .. }
            | ReportError::Export(_) => false,
        }
    }
}

/// Execute an operation with exponential backoff.
///
/// Runs `operation` up to `config.max_attempts` times total. After a
/// retryable failure the thread sleeps for the current delay, then the delay
/// is multiplied by `backoff_multiplier` (capped at `max_delay`). There is no
/// sleep after the final attempt. Non-retryable errors return immediately.
pub fn with_retry<T, E, F>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Retryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt: u32 = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation() {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis(),
                    "Operation failed, retrying"
                );

                std::thread::sleep(delay);

                attempt += 1;
                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "Operation failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}
