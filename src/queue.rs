//! Operation queue shared by the polling supervisor and the event adapter
//!
//! A thin wrapper around an unbounded tokio mpsc channel: any number of
//! producers, exactly one consumer (the worker). Items are delivered in
//! enqueue order and the channel closes once every producer handle drops,
//! which is also the worker's shutdown signal.

use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::debug;

/// A queued filesystem mutation, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Create a fresh timestamp-named file under `dir`
    CreateNewFile { dir: PathBuf },
    /// Remove `path` if it still exists
    DeleteFile { path: PathBuf },
}

/// Cloneable producer handle for the worker's FIFO queue
#[derive(Debug, Clone)]
pub struct OperationQueue {
    tx: mpsc::UnboundedSender<FileOperation>,
}

impl OperationQueue {
    /// Create the queue and the single consumer end
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<FileOperation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue an operation for the worker.
    ///
    /// A closed queue means the worker is shutting down; the operation is
    /// dropped silently since pending housekeeping is best-effort.
    pub fn enqueue(&self, operation: FileOperation) {
        debug!("Queueing file operation: {:?}", operation);
        if self.tx.send(operation).is_err() {
            debug!("Operation queue consumer is gone, dropping operation");
        }
    }
}
