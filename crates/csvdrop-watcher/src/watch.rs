//! Directory watching and event dispatch
//!
//! Wraps a platform filesystem watcher and funnels create events through a
//! channel into the pipeline. Files are processed to completion one at a
//! time, including their backoff waits, so a single file is never handled
//! by two sequences; relocation out of the watch directory is the only
//! duplicate-processing guard. A startup sweep drains any backlog already
//! sitting in the watch directory.

use crate::config::WatcherConfig;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watch `config.watch_dir` and run the pipeline until ctrl-c
///
/// On shutdown no new detections are accepted; the file in flight (if any)
/// finishes its relocation sequence first.
pub async fn run(config: WatcherConfig) -> Result<()> {
    fs::create_dir_all(&config.watch_dir).with_context(|| {
        format!("Failed to create watch dir {}", config.watch_dir.display())
    })?;
    fs::create_dir_all(&config.archive_dir).with_context(|| {
        format!("Failed to create archive dir {}", config.archive_dir.display())
    })?;

    let (tx, rx) = mpsc::unbounded_channel();

    // Backlog sweep: files dropped before startup never raise a create event
    for path in sweep_existing(&config.watch_dir)? {
        debug!(file = %path.display(), "Queueing pre-existing file");
        let _ = tx.send(path);
    }

    let _watcher = spawn_watcher(&config.watch_dir, tx)?;

    info!(dir = %config.watch_dir.display(), "Watching for CSV files");

    let pipeline = Pipeline::new(config);
    dispatch(pipeline, rx).await;

    info!("Watcher stopped");
    Ok(())
}

/// Forward detection events into the pipeline, one file at a time
async fn dispatch(pipeline: Pipeline, mut rx: mpsc::UnboundedReceiver<PathBuf>) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Shutdown signal received, draining stopped");
                break;
            },
            detected = rx.recv() => match detected {
                Some(path) => {
                    pipeline.handle_detected(&path).await;
                },
                None => break,
            },
        }
    }
}

/// Register a create-event watcher on the directory
///
/// The returned watcher must stay alive for events to keep flowing; the
/// caller holds it for the duration of the run.
fn spawn_watcher(
    watch_dir: &std::path::Path,
    tx: mpsc::UnboundedSender<PathBuf>,
) -> Result<RecommendedWatcher> {
    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if matches!(event.kind, EventKind::Create(_)) {
                    for path in event.paths {
                        // Send never blocks; the channel queues behind the
                        // file currently in flight.
                        let _ = tx.send(path);
                    }
                }
            },
            Err(e) => warn!(error = %e, "Watch error"),
        })
        .context("Failed to create filesystem watcher")?;

    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

    Ok(watcher)
}

/// Regular files already present in the watch directory at startup
fn sweep_existing(watch_dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(watch_dir)
        .with_context(|| format!("Failed to read watch dir {}", watch_dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }

    paths.sort();
    Ok(paths)
}
