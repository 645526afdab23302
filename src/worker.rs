//! Single-consumer worker performing all queued filesystem mutations
//!
//! Every create and delete funnels through one loop, one item at a time, so
//! concurrent triggers never race on the same directory state. A failed item
//! is logged and the loop moves on; the only clean exit is queue closure
//! (every producer handle dropped).

use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::queue::FileOperation;

/// Payload written into every freshly created file
pub const MARKER_PAYLOAD: &[u8] = b"New log file created.";

/// Collision suffixes probed within a single timestamp second
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Result of one executed operation; "not found" is a normal outcome because
/// duplicate deletion requests are expected under concurrent delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Created(PathBuf),
    Deleted(PathBuf),
    NotFound(PathBuf),
}

/// FIFO consumer loop draining the operation queue
pub struct Worker {
    rx: mpsc::UnboundedReceiver<FileOperation>,
    extension: String,
}

impl Worker {
    pub fn new(rx: mpsc::UnboundedReceiver<FileOperation>, extension: impl Into<String>) -> Self {
        Self {
            rx,
            extension: extension.into(),
        }
    }

    /// Process operations strictly in enqueue order until the queue closes.
    ///
    /// One item's failure never escapes the loop; it is logged and the next
    /// item proceeds.
    pub async fn run(mut self) {
        debug!("File operation worker started");
        while let Some(operation) = self.rx.recv().await {
            if let Err(e) = self.execute(&operation) {
                error!("File operation failed: {e:#}");
            }
        }
        debug!("Operation queue closed, worker exiting");
    }

    fn execute(&self, operation: &FileOperation) -> Result<OperationOutcome> {
        match operation {
            FileOperation::CreateNewFile { dir } => {
                create_log_file(dir, &self.extension).map(OperationOutcome::Created)
            }
            FileOperation::DeleteFile { path } => delete_file(path),
        }
    }
}

/// Create a new `<unix-seconds>.<extension>` file with the marker payload.
///
/// Name collisions within the same second get a `-1`, `-2`, ... suffix;
/// `create_new` guarantees an existing file is never overwritten. Also used
/// directly by the polling supervisor so the empty-directory bootstrap holds
/// before the worker starts.
pub fn create_log_file(dir: &Path, extension: &str) -> Result<PathBuf> {
    let stamp = Utc::now().timestamp();
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{stamp}.{extension}")
        } else {
            format!("{stamp}-{attempt}.{extension}")
        };
        let path = dir.join(&name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(MARKER_PAYLOAD)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Created new file: {name}");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", path.display()));
            }
        }
    }
    bail!(
        "Exhausted name candidates for timestamp {stamp} in {}",
        dir.display()
    )
}

/// Remove `path`, treating an already-missing file as a normal outcome.
///
/// Removing directly (instead of checking existence first) keeps the race
/// window closed: whoever loses the race gets `NotFound`, not an error.
pub fn delete_file(path: &Path) -> Result<OperationOutcome> {
    let name = display_name(path);
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted file: {name}");
            Ok(OperationOutcome::Deleted(path.to_path_buf()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("File not found: {name}");
            Ok(OperationOutcome::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
