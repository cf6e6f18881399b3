//! Streamed HTTP download with bounded retry.
//!
//! The response body is copied to disk in chunks through a `BufWriter`;
//! arbitrarily large files never sit in memory. A failed attempt removes the
//! partial file so no incomplete output survives a run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::DownloadConfig;
use crate::error::{ReportError, Result};
use crate::fetch::retry::{with_retry, RetryConfig};
use crate::model::stats::DownloadOutcome;

/// HTTP downloader with a fixed per-attempt timeout and retry policy.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    retry: RetryConfig,
}

impl Fetcher {
    /// Build a fetcher from the download configuration.
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            retry: RetryConfig::from_download(config),
        })
    }

    /// Build a fetcher with an explicit retry configuration (used by tests
    /// to shrink the backoff to millisecond scale).
    pub fn with_retry_config(config: &DownloadConfig, retry: RetryConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, retry })
    }

    /// Download `url` to `dest`, retrying transient failures.
    ///
    /// Never returns an error: the outcome records success or failure along
    /// with the number of attempts made, and the caller folds it into its
    /// counters.
    pub fn fetch(&self, url: &str, dest: &Path) -> DownloadOutcome {
        let mut attempts: u32 = 0;

        let result = with_retry(&self.retry, || {
            attempts += 1;
            self.fetch_once(url, dest)
        });

        match result {
            Ok(bytes_written) => {
                tracing::debug!(url, dest = %dest.display(), bytes = bytes_written, "Downloaded");
                DownloadOutcome {
                    success: true,
                    attempts,
                    bytes_written,
                }
            }
            Err(e) => {
                tracing::warn!(url, error = %e, attempts, "Download failed");
                DownloadOutcome {
                    success: false,
                    attempts,
                    bytes_written: 0,
                }
            }
        }
    }

    /// One streamed GET attempt. Removes the partial file on any failure.
    fn fetch_once(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            tracing::debug!(url, content_length = length, "Response headers received");
        }

        match self.write_body(response, dest) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                // Do not leave a partial file behind.
                let _ = std::fs::remove_file(dest);
                Err(e)
            }
        }
    }

    /// Stream the body to disk in chunks.
    fn write_body(&self, mut response: reqwest::blocking::Response, dest: &Path) -> Result<u64> {
        let file = File::create(dest).map_err(|e| ReportError::io(dest, e))?;
        let mut writer = BufWriter::new(file);

        let bytes = std::io::copy(&mut response, &mut writer)
            .map_err(|e| ReportError::io(dest, e))?;
        writer.flush().map_err(|e| ReportError::io(dest, e))?;

        Ok(bytes)
    }
}
