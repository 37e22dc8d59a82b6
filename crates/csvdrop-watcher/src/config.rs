//! Watcher configuration
//!
//! Loaded from environment variables with `.env` support, in the same
//! spirit as the logging configuration in `csvdrop-common`. CLI flags in
//! the binary override individual fields after loading.

use csvdrop_common::{CsvDropError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ingestion watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Directory watched for incoming CSV files
    pub watch_dir: PathBuf,

    /// Directory receiving archived output; quarantined files land in its
    /// `failed/` subdirectory
    pub archive_dir: PathBuf,

    /// Maximum processing attempts per file
    pub max_retries: u32,

    /// Base retry delay in seconds; attempt N+1 waits `retry_base * 2^(N-1)`
    pub retry_base_secs: u64,

    /// Token inserted into archived filenames; files already carrying it
    /// are never re-ingested
    pub processed_marker: String,

    /// Whether transformed rows are persisted next to the archived original
    pub write_processed_output: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("input_files"),
            archive_dir: PathBuf::from("archive"),
            max_retries: 3,
            retry_base_secs: 1,
            processed_marker: ".processed".to_string(),
            write_processed_output: true,
        }
    }
}

impl WatcherConfig {
    /// Load configuration from the environment
    ///
    /// A `.env` file in the working directory is merged into the process
    /// environment first. Recognized variables:
    ///
    /// - `WATCH_DIR`, `ARCHIVE_DIR`
    /// - `MAX_RETRIES`, `RETRY_BASE_SECONDS`
    /// - `PROCESSED_MARKER`
    /// - `WRITE_PROCESSED_OUTPUT` (1/true/yes)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(dir) = std::env::var("WATCH_DIR") {
            config.watch_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("ARCHIVE_DIR") {
            config.archive_dir = PathBuf::from(dir);
        }

        if let Ok(retries) = std::env::var("MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .map_err(|_| CsvDropError::Config(format!("Invalid MAX_RETRIES: {}", retries)))?;
        }

        if let Ok(base) = std::env::var("RETRY_BASE_SECONDS") {
            config.retry_base_secs = base.parse().map_err(|_| {
                CsvDropError::Config(format!("Invalid RETRY_BASE_SECONDS: {}", base))
            })?;
        }

        if let Ok(marker) = std::env::var("PROCESSED_MARKER") {
            config.processed_marker = marker;
        }

        if let Ok(flag) = std::env::var("WRITE_PROCESSED_OUTPUT") {
            config.write_processed_output = parse_bool(&flag);
        }

        config.validate()?;
        Ok(config)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> WatcherConfigBuilder {
        WatcherConfigBuilder::default()
    }

    /// Validate field combinations that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(CsvDropError::Config(
                "max_retries must be at least 1".to_string(),
            ));
        }

        if self.processed_marker.is_empty() {
            return Err(CsvDropError::Config(
                "processed_marker must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Quarantine directory for files that exhausted their retries
    pub fn failed_dir(&self) -> PathBuf {
        self.archive_dir.join("failed")
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Builder for WatcherConfig
#[derive(Default)]
pub struct WatcherConfigBuilder {
    config: WatcherConfig,
}

impl WatcherConfigBuilder {
    pub fn watch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.watch_dir = dir.into();
        self
    }

    pub fn archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.archive_dir = dir.into();
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn retry_base_secs(mut self, secs: u64) -> Self {
        self.config.retry_base_secs = secs;
        self
    }

    pub fn processed_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.processed_marker = marker.into();
        self
    }

    pub fn write_processed_output(mut self, write: bool) -> Self {
        self.config.write_processed_output = write;
        self
    }

    /// Finish the builder, rejecting invalid field combinations
    pub fn build(self) -> Result<WatcherConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
