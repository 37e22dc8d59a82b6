//! Ingestion pipeline: the per-file state machine
//!
//! Detected files are filtered for eligibility, then processed with retries
//! and exponential backoff until they end in exactly one terminal state:
//! archived, quarantined, or skipped. Any error during an attempt (read,
//! transform, write, relocate) is retryable; only retry exhaustion and a
//! failed quarantine move are surfaced at error severity. Nothing raised
//! here can take down the watcher process.

use crate::codec::{CsvCodec, Row};
use crate::config::WatcherConfig;
use crate::relocate::{
    path_with_suffix, safe_move, timestamped_name, unique_destination, ORIG_SUFFIX, TEMP_SUFFIX,
};
use crate::transform::{RowTransform, Uppercase};
use chrono::Local;
use csvdrop_common::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Recognized tabular extension, matched case-insensitively
const TABULAR_EXT: &str = "csv";

/// Terminal state of one detection cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Processed and relocated into the archive
    Archived,
    /// Exhausted all attempts and relocated into the quarantine area
    Quarantined,
    /// Filtered out; the file was not touched
    Skipped,
}

/// Drives a detected file through transform, retry, and relocation
///
/// Codec and transformer are injected at construction; [`Pipeline::new`]
/// wires the standard CSV codec with the uppercase policy.
pub struct Pipeline<T: RowTransform = Uppercase> {
    config: WatcherConfig,
    codec: CsvCodec,
    transform: T,
}

impl Pipeline<Uppercase> {
    /// Pipeline with the default header-mode codec and uppercase transform
    pub fn new(config: WatcherConfig) -> Self {
        Self::with_parts(config, CsvCodec::default(), Uppercase)
    }
}

impl<T: RowTransform> Pipeline<T> {
    pub fn with_parts(config: WatcherConfig, codec: CsvCodec, transform: T) -> Self {
        Self {
            config,
            codec,
            transform,
        }
    }

    /// React to one detection event and run the file to a terminal state
    ///
    /// Ineligible paths (directories, marker-bearing names, foreign
    /// extensions) exit immediately as [`Outcome::Skipped`] without touching
    /// the file.
    pub async fn handle_detected(&self, path: &Path) -> Outcome {
        let Some(filename) = file_name(path) else {
            return Outcome::Skipped;
        };

        if path.is_dir() {
            return Outcome::Skipped;
        }

        if filename.contains(&self.config.processed_marker) {
            debug!(file = %filename, "Ignoring file (already-processed marker present)");
            return Outcome::Skipped;
        }

        if !has_tabular_extension(path) {
            info!(file = %filename, "Ignoring non-CSV file");
            return Outcome::Skipped;
        }

        info!(file = %filename, "Detected new file");
        self.run_attempts(path, &filename).await
    }

    /// Retry loop with exponential backoff
    ///
    /// Attempt N+1 never starts before attempt N's backoff has elapsed; the
    /// wait suspends only this file's sequence.
    async fn run_attempts(&self, path: &Path, filename: &str) -> Outcome {
        let max_retries = self.config.max_retries;

        for attempt in 1..=max_retries {
            info!(
                file = %filename,
                attempt,
                max_retries,
                "Processing attempt"
            );

            match self.process_once(path, filename) {
                Ok(archive_path) => {
                    info!(
                        file = %filename,
                        archived_as = %archive_path.display(),
                        "Archived"
                    );
                    return Outcome::Archived;
                },
                Err(e) if attempt < max_retries => {
                    let delay = backoff_delay(self.config.retry_base_secs, attempt);
                    warn!(
                        file = %filename,
                        attempt,
                        error = %e,
                        delay_secs = delay.as_secs(),
                        "Attempt failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                },
                Err(e) => {
                    error!(
                        file = %filename,
                        attempts = max_retries,
                        error = %e,
                        "Exceeded max retries, quarantining file"
                    );
                    return self.quarantine(path, filename);
                },
            }
        }

        // max_retries is validated >= 1, so the loop always returns
        Outcome::Quarantined
    }

    /// One full attempt: read, transform, optionally persist, relocate
    ///
    /// Returns the canonical archive path on success.
    fn process_once(&self, path: &Path, filename: &str) -> Result<PathBuf> {
        let rows = self.codec.read(path)?;
        let processed: Vec<Row> = rows.iter().map(|r| self.transform.transform(r)).collect();

        let archive_name =
            timestamped_name(filename, &self.config.processed_marker, Local::now());
        let archive_path = unique_destination(&self.config.archive_dir, &archive_name);

        if self.config.write_processed_output {
            // Temp write plus two ordered moves: a crash in between leaves
            // either the original in the watch dir (attempt repeats) or the
            // original already archived as .orig (temp file is inert).
            let temp_out = path_with_suffix(&archive_path, TEMP_SUFFIX);
            self.codec.write(&temp_out, &processed)?;

            safe_move(path, &path_with_suffix(&archive_path, ORIG_SUFFIX))?;

            if processed.is_empty() {
                // Empty input produces no processed counterpart; only the
                // original is preserved under its .orig name.
                debug!(file = %filename, "No rows decoded, skipping processed output");
            } else {
                safe_move(&temp_out, &archive_path)?;
            }
        } else {
            // Transform ran as a pass-through validation; its output is
            // intentionally discarded under this policy.
            safe_move(path, &archive_path)?;
        }

        Ok(archive_path)
    }

    /// Final placement after retry exhaustion
    ///
    /// A failure here is the one unrecoverable path: it is logged at error
    /// severity and the file stays where it is for manual intervention.
    fn quarantine(&self, path: &Path, filename: &str) -> Outcome {
        let failed_path = self.config.failed_dir().join(format!("{}.failed", filename));

        match safe_move(path, &failed_path) {
            Ok(()) => {
                info!(
                    file = %filename,
                    quarantined_as = %failed_path.display(),
                    "Moved failed file to quarantine"
                );
            },
            Err(e) => {
                error!(
                    file = %filename,
                    error = %e,
                    "Failed to quarantine file, leaving it in place"
                );
            },
        }

        Outcome::Quarantined
    }
}

/// Backoff before the attempt following `attempt`: `base * 2^(attempt-1)`
fn backoff_delay(base_secs: u64, attempt: u32) -> Duration {
    Duration::from_secs(base_secs.saturating_mul(1u64 << (attempt - 1).min(62)))
}

fn has_tabular_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TABULAR_EXT))
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
