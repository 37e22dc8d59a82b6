//! CSVDrop Watcher - CSV ingestion daemon

use anyhow::Result;
use clap::Parser;
use csvdrop_common::logging::{init_logging, LogConfig, LogLevel};
use csvdrop_watcher::config::WatcherConfig;
use csvdrop_watcher::watch;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "csvdrop-watcher")]
#[command(author, version, about = "Watch a directory and archive processed CSV files")]
struct Cli {
    /// Directory to watch for incoming CSV files
    #[arg(short, long)]
    watch_dir: Option<PathBuf>,

    /// Archive directory for processed files
    #[arg(short, long)]
    archive_dir: Option<PathBuf>,

    /// Maximum processing attempts per file
    #[arg(long)]
    max_retries: Option<u32>,

    /// Base retry delay in seconds
    #[arg(long)]
    retry_base: Option<u64>,

    /// Marker token inserted into processed filenames
    #[arg(long)]
    marker: Option<String>,

    /// Skip writing transformed output (archive the original only)
    #[arg(long)]
    no_processed_output: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment first, then the verbose flag raises the level
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    log_config.log_file_prefix = "csvdrop-watcher".to_string();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    // Env (and .env) first, then CLI flags override per field
    let mut config = WatcherConfig::from_env()?;

    if let Some(dir) = cli.watch_dir {
        config.watch_dir = dir;
    }
    if let Some(dir) = cli.archive_dir {
        config.archive_dir = dir;
    }
    if let Some(retries) = cli.max_retries {
        config.max_retries = retries;
    }
    if let Some(base) = cli.retry_base {
        config.retry_base_secs = base;
    }
    if let Some(marker) = cli.marker {
        config.processed_marker = marker;
    }
    if cli.no_processed_output {
        config.write_processed_output = false;
    }

    config.validate()?;

    info!("Starting CSV watcher");
    watch::run(config).await?;
    info!("CSV watcher stopped");

    Ok(())
}
