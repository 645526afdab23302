//! logrot - bounded rolling log file keeper
//!
//! Watches a single directory (non-recursively) and keeps a bounded rolling set
//! of log files: a fresh file is created once the newest file reaches the size
//! threshold, and the oldest file is evicted once more than the configured
//! number of files accumulate.
//!
//! # Architecture
//!
//! Three concurrent tasks share the directory through one FIFO queue:
//! 1. **Polling supervisor** - snapshots the directory on a fixed interval and
//!    asks the pure rotation policy what to do
//! 2. **Event adapter** - folds filesystem create/delete notifications into the
//!    same queue
//! 3. **Worker** - single consumer performing all queued filesystem mutations,
//!    one at a time
//!
//! This separation means no two mutations ever race on the same directory
//! state, and duplicate or stale requests (a delete for a file already gone)
//! are normal outcomes rather than errors.

pub mod config;
pub mod policy;
pub mod queue;
pub mod watcher;
pub mod worker;

// Re-export common types
pub use config::{ConfigError, WatchConfig};
pub use policy::{DirectorySnapshot, FileEntry, RotationDecision, decide};
pub use queue::{FileOperation, OperationQueue};
pub use watcher::{FolderWatcher, poll_tick};
pub use worker::{OperationOutcome, Worker, create_log_file, delete_file};
