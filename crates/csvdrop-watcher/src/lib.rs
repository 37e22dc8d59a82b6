//! CSVDrop Watcher Library
//!
//! File-lifecycle pipeline for CSV files dropped into a watched directory:
//! detection, per-row transformation, retry with exponential backoff, and
//! atomic relocation into an archive or quarantine area.
//!
//! # Components
//!
//! - [`codec`]: reads and writes row-oriented tabular data
//! - [`transform`]: pluggable pure per-row transformations
//! - [`relocate`]: collision-resistant archive names and crash-safe moves
//! - [`pipeline`]: the per-file state machine driving the above
//! - [`watch`]: filesystem watcher feeding detection events to the pipeline
//!
//! # Example
//!
//! ```no_run
//! use csvdrop_watcher::config::WatcherConfig;
//! use csvdrop_watcher::pipeline::Pipeline;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WatcherConfig::from_env()?;
//!     let pipeline = Pipeline::new(config);
//!     pipeline.handle_detected(Path::new("input_files/data.csv")).await;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod pipeline;
pub mod relocate;
pub mod transform;
pub mod watch;

pub use codec::{CsvCodec, Row};
pub use config::WatcherConfig;
pub use pipeline::{Outcome, Pipeline};
pub use transform::{Identity, RowTransform, Uppercase};
