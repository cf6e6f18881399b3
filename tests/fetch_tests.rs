//! HTTP fetcher tests against a local mock server.
//!
//! The fetcher is blocking by design; tests run it on a blocking thread and
//! shrink the backoff to millisecond scale through the retry config.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use classfetch::config::DownloadConfig;
use classfetch::fetch::{Fetcher, RetryConfig};
use classfetch::model::stats::DownloadOutcome;

fn test_download_config() -> DownloadConfig {
    DownloadConfig {
        timeout_secs: 5,
        ..DownloadConfig::default()
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_secs(1),
        backoff_multiplier: 2.0,
    }
}

async fn fetch_blocking(url: String, dest: PathBuf, max_attempts: u32) -> DownloadOutcome {
    tokio::task::spawn_blocking(move || {
        let fetcher = Fetcher::with_retry_config(&test_download_config(), fast_retry(max_attempts))
            .expect("client builds");
        fetcher.fetch(&url, &dest)
    })
    .await
    .expect("blocking task completes")
}

// ─── Test 1: clean download writes the full body ────────────────────

#[tokio::test]
async fn test_fetch_success_writes_body() {
    let server = MockServer::start().await;
    let body = vec![0x25u8; 64 * 1024]; // 64 KB, larger than one chunk

    Mock::given(method("GET"))
        .and(path("/hw.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("hw.pdf");

    let outcome = fetch_blocking(format!("{}/hw.pdf", server.uri()), dest.clone(), 3).await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.bytes_written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

// ─── Test 2: two failures then success within three attempts ────────

#[tokio::test]
async fn test_fetch_retries_then_succeeds() {
    let server = MockServer::start().await;

    // First two requests fail with 503, then the real response is served.
    Mock::given(method("GET"))
        .and(path("/flaky.pdf"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"content".to_vec()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("flaky.pdf");

    let start = Instant::now();
    let outcome = fetch_blocking(format!("{}/flaky.pdf", server.uri()), dest.clone(), 3).await;
    let elapsed = start.elapsed();

    assert!(outcome.success, "third attempt should succeed");
    assert_eq!(outcome.attempts, 3);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "content");

    // Backoff between attempts: 20ms then 40ms.
    assert!(
        elapsed >= Duration::from_millis(60),
        "expected two backoff delays, waited {elapsed:?}"
    );
}

// ─── Test 3: exhaustion leaves no partial file ──────────────────────

#[tokio::test]
async fn test_fetch_exhaustion_cleans_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dead.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("dead.pdf");

    let outcome = fetch_blocking(format!("{}/dead.pdf", server.uri()), dest.clone(), 3).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 3, "all attempts must be used");
    assert_eq!(outcome.bytes_written, 0);
    assert!(!dest.exists(), "no partial file may be left behind");
}

// ─── Test 4: connection errors are retried too ──────────────────────

#[tokio::test]
async fn test_fetch_connection_error_exhausts_attempts() {
    // Nothing listens on this address; reqwest fails at connect time.
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("nowhere.pdf");

    let outcome =
        fetch_blocking("https://127.0.0.1:9/nowhere.pdf".to_string(), dest.clone(), 2).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 2);
    assert!(!dest.exists());
}
