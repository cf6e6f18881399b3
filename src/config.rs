//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$CLASSFETCH_CONFIG` (environment variable)
//! 2. `~/.config/classfetch/config.toml` (Linux/macOS)
//!    `%APPDATA%\classfetch\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Input and output folder names.
    pub folders: FolderConfig,
    /// Download and retry tuning.
    pub download: DownloadConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Input and output folder names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder scanned for exported `*.json` reports.
    pub rawdata: PathBuf,
    /// Root of the downloaded file tree.
    pub downloads: PathBuf,
    /// Folder receiving per-report and summary CSVs.
    pub results: PathBuf,
}

/// Download and retry tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Total attempts per file, including the first (default: 3).
    pub max_attempts: u32,
    /// Per-attempt request timeout in seconds (default: 30).
    pub timeout_secs: u64,
    /// Delay before the first retry, in milliseconds (default: 1000).
    pub initial_backoff_ms: u64,
    /// Upper bound on any single backoff delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Pause after each download attempt sequence, in milliseconds (default: 500).
    pub pacing_ms: u64,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            rawdata: PathBuf::from("rawdata"),
            downloads: PathBuf::from("downloads"),
            results: PathBuf::from("results"),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_secs: 30,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            pacing_ms: 500,
        }
    }
}

impl DownloadConfig {
    /// Per-attempt request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before the first retry as a `Duration`.
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Backoff cap as a `Duration`.
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Inter-file pacing delay as a `Duration`.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// No config file present; built-in defaults.
    Default,
    /// A file existed but could not be read or parsed; defaults were used.
    Fallback { path: PathBuf, reason: String },
}

/// Load configuration, searching standard locations.
///
/// Never fails: a missing file yields the defaults, a broken file yields the
/// defaults plus a [`ConfigSource::Fallback`] the caller can log once the
/// subscriber is installed.
pub fn load_config() -> (Config, ConfigSource) {
    match config_file_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => (Config::default(), ConfigSource::Default),
    }
}

/// Load configuration from an explicit file path.
pub fn load_config_from(path: &Path) -> (Config, ConfigSource) {
    let fallback = |reason: String| {
        (
            Config::default(),
            ConfigSource::Fallback {
                path: path.to_path_buf(),
                reason,
            },
        )
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => (cfg, ConfigSource::File(path.to_path_buf())),
            Err(e) => fallback(e.to_string()),
        },
        Err(e) => fallback(e.to_string()),
    }
}

/// Write `config` as TOML to `path`, creating parent folders as needed.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| ReportError::Export(format!("config serialization failed: {e}")))?;
    std::fs::write(path, contents).map_err(|e| ReportError::io(path, e))?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("CLASSFETCH_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("classfetch").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("classfetch")
}
