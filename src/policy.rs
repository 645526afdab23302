//! Rotation policy and directory snapshots
//!
//! The policy is a pure function over an immutable snapshot of the directory.
//! Snapshots are rebuilt from the filesystem on every cycle and never cached,
//! so a file that vanished between cycles simply stops appearing - listing
//! races cannot corrupt any in-memory state.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One regular file observed in the watched directory
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub created_at: SystemTime,
    pub size_bytes: u64,
}

/// Point-in-time listing of the watched directory, oldest file first
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: Vec<FileEntry>,
}

impl DirectorySnapshot {
    /// List the directory's regular files, sorted ascending by creation time.
    ///
    /// An unreadable or missing directory yields an empty snapshot rather than
    /// an error; the next cycle re-observes whatever state exists then.
    pub fn capture(dir: &Path) -> Self {
        let mut entries = Vec::new();
        if let Ok(dir_entries) = fs::read_dir(dir) {
            for entry in dir_entries.flatten() {
                let Ok(metadata) = entry.metadata() else {
                    continue;
                };
                if !metadata.is_file() {
                    continue;
                }
                // Not every filesystem reports a creation time
                let created_at = metadata
                    .created()
                    .or_else(|_| metadata.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                entries.push(FileEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path(),
                    created_at,
                    size_bytes: metadata.len(),
                });
            }
        }
        Self::from_entries(entries)
    }

    /// Build a snapshot from pre-collected entries (stable sort keeps listing
    /// order for creation-time ties)
    pub fn from_entries(mut entries: Vec<FileEntry>) -> Self {
        entries.sort_by_key(|e| e.created_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest(&self) -> Option<&FileEntry> {
        self.entries.first()
    }

    pub fn newest(&self) -> Option<&FileEntry> {
        self.entries.last()
    }
}

/// What the rotation policy wants done, computed fresh per snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RotationDecision {
    pub should_create: bool,
    pub evict_path: Option<PathBuf>,
}

/// Decide whether to rotate and/or evict for the given snapshot.
///
/// Pure function, no I/O: an empty directory always asks for a new file, the
/// newest file reaching `size_threshold_bytes` asks for a new file, and more
/// than `max_file_count` files asks for the single oldest to be evicted.
pub fn decide(
    snapshot: &DirectorySnapshot,
    size_threshold_bytes: u64,
    max_file_count: usize,
) -> RotationDecision {
    let Some(newest) = snapshot.newest() else {
        // Bootstrap: an empty directory must never remain empty
        return RotationDecision {
            should_create: true,
            evict_path: None,
        };
    };

    let should_create = newest.size_bytes >= size_threshold_bytes;
    let evict_path = if snapshot.len() > max_file_count {
        snapshot.oldest().map(|e| e.path.clone())
    } else {
        None
    };

    RotationDecision {
        should_create,
        evict_path,
    }
}
