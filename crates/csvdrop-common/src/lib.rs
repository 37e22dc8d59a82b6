//! CSVDrop Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging bootstrap for the CSVDrop workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`CsvDropError`] taxonomy and [`Result`] alias
//!   used by the file-lifecycle pipeline
//! - **Logging**: `tracing`-based logging configuration shared by every
//!   binary in the workspace
//!
//! # Example
//!
//! ```no_run
//! use csvdrop_common::{CsvDropError, Result};
//! use std::path::Path;
//!
//! fn require_file(path: &Path) -> Result<()> {
//!     if !path.exists() {
//!         return Err(CsvDropError::NotFound(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CsvDropError, Result};
