//! Directory watcher and rotation coordinator
//!
//! # Architecture
//!
//! `FolderWatcher` wires three concurrent tasks around one FIFO queue:
//! 1. **Event adapter** - notify callbacks bridged over an unbounded channel
//!    into queued operations
//! 2. **Polling supervisor** - fixed-interval snapshot + rotation decision
//! 3. **Worker** - the single consumer performing every filesystem mutation
//!
//! The queue is constructed here and handles are injected into the producers
//! and the consumer; there is no process-global state. Shutdown is explicit: a
//! watch-channel signal stops the polling loop, dropping the notify
//! subscription stops the adapter, and queue closure drains the worker.

pub mod events; // Public for tests

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::policy::{self, DirectorySnapshot};
use crate::queue::{FileOperation, OperationQueue};
use crate::worker::{self, Worker};

/// Owns the notify subscription and the three coordinated tasks
pub struct FolderWatcher {
    config: WatchConfig,
    watcher: Option<RecommendedWatcher>,
    queue: Option<OperationQueue>,
    operation_rx: Option<mpsc::UnboundedReceiver<FileOperation>>,
    shutdown: watch::Sender<bool>,
    worker_handle: Option<JoinHandle<()>>,
}

impl FolderWatcher {
    /// Prepare the watched directory and the operation queue.
    ///
    /// The directory is created if absent, and an empty directory gets its
    /// first file immediately - before any task starts - so the bootstrap
    /// invariant holds even if the worker never runs.
    pub fn new(config: WatchConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.watch_dir).with_context(|| {
            format!(
                "Failed to create watch directory {}",
                config.watch_dir.display()
            )
        })?;

        if DirectorySnapshot::capture(&config.watch_dir).is_empty() {
            info!("Directory is empty at startup. Creating a new log file.");
            worker::create_log_file(&config.watch_dir, &config.file_extension)?;
        }

        let (queue, operation_rx) = OperationQueue::unbounded();
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config,
            watcher: None,
            queue: Some(queue),
            operation_rx: Some(operation_rx),
            shutdown,
            worker_handle: None,
        })
    }

    /// Start the worker, the notify subscription, and the polling supervisor
    pub fn start(&mut self) -> Result<()> {
        let queue = self.queue.clone().context("Watcher has been stopped")?;
        let operation_rx = self
            .operation_rx
            .take()
            .context("Watcher already started")?;

        info!("Watching {}...", self.config.watch_dir.display());

        let worker = Worker::new(operation_rx, self.config.file_extension.clone());
        self.worker_handle = Some(tokio::spawn(worker.run()));

        // Bridge the notify callback thread into tokio
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = event_tx.send(res) {
                error!("Failed to forward file event: {e}");
            }
        })?;
        watcher
            .watch(&self.config.watch_dir, RecursiveMode::NonRecursive)
            .context("Failed to start watching directory")?;
        self.watcher = Some(watcher);

        let adapter_queue = queue.clone();
        tokio::spawn(async move {
            debug!("File system event adapter started");
            while let Some(event_result) = event_rx.recv().await {
                match event_result {
                    Ok(event) => events::handle_event(&adapter_queue, event),
                    Err(e) => warn!("File watcher error: {e}"),
                }
            }
            debug!("Event stream closed, adapter exiting");
        });

        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown.subscribe();
        tokio::spawn(async move {
            debug!("Polling supervisor started");
            let mut tick = interval(config.poll_interval());
            loop {
                tokio::select! {
                    _ = tick.tick() => poll_tick(&config, &queue),
                    _ = shutdown_rx.changed() => break,
                }
            }
            debug!("Polling supervisor stopped");
        });

        Ok(())
    }

    /// Signal all tasks to stop and wait for the worker to drain.
    ///
    /// In-flight work finishes; anything still queued when the process exits
    /// is abandoned, which is acceptable for best-effort housekeeping.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            info!("File watcher stopped");
        }
        // Dropping the last producer closes the queue and ends the worker loop
        self.queue.take();
        self.operation_rx.take();
        if let Some(handle) = self.worker_handle.take() {
            if let Err(e) = handle.await {
                warn!("Worker task did not exit cleanly: {e}");
            }
        }
    }
}

/// One polling pass: snapshot, decide, act.
///
/// Creation happens directly here (not through the queue) so a rotation is
/// never delayed behind queued deletions; eviction goes through the queue so
/// deletes stay serialized with event-driven ones. A failed create is logged
/// and the tick completes.
pub fn poll_tick(config: &WatchConfig, queue: &OperationQueue) {
    let snapshot = DirectorySnapshot::capture(&config.watch_dir);
    let decision = policy::decide(
        &snapshot,
        config.size_threshold_bytes,
        config.max_file_count,
    );

    if decision.should_create {
        if let Err(e) = worker::create_log_file(&config.watch_dir, &config.file_extension) {
            error!("Failed to create log file during poll: {e:#}");
        }
    }
    if let Some(path) = decision.evict_path {
        queue.enqueue(FileOperation::DeleteFile { path });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &std::path::Path) -> WatchConfig {
        WatchConfig {
            watch_dir: dir.to_path_buf(),
            ..WatchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_new_bootstraps_empty_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("watched");

        let _watcher = FolderWatcher::new(test_config(&dir)).unwrap();

        let count = fs::read_dir(&dir).unwrap().count();
        assert_eq!(count, 1, "bootstrap must create exactly one file");
    }

    #[tokio::test]
    async fn test_new_leaves_populated_directory_alone() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("existing.log"), b"data").unwrap();

        let _watcher = FolderWatcher::new(test_config(temp.path())).unwrap();

        let count = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_poll_tick_enqueues_eviction_only_when_over_count() {
        let temp = TempDir::new().unwrap();
        for name in ["a.log", "b.log", "c.log"] {
            fs::write(temp.path().join(name), b"small").unwrap();
        }

        let (queue, mut rx) = OperationQueue::unbounded();
        poll_tick(&test_config(temp.path()), &queue);

        // Three small files: nothing to create, nothing to evict
        assert!(rx.try_recv().is_err());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_poll_tick_rotates_oversized_newest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.log"), vec![b'x'; 2048]).unwrap();

        let (queue, mut rx) = OperationQueue::unbounded();
        poll_tick(&test_config(temp.path()), &queue);

        // Direct create fired, no eviction at two files
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
        assert!(rx.try_recv().is_err());
    }
}
