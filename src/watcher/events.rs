//! File system event processing
//!
//! Translates raw notify events into queued operations. Only create and
//! remove events for non-directory paths matter; everything else is noise.
//!
//! Creation events are observation-only: the polling supervisor owns the
//! decision to create files, so a creation seen here (our own rotation, or an
//! external actor dropping a file in) needs nothing beyond a log line.
//! Removal events are enqueued so that files removed by any actor are
//! acknowledged through the same worker log line, without re-deleting.

use notify::event::{CreateKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{debug, info};

use crate::queue::{FileOperation, OperationQueue};

/// Fold one raw file system event into the operation queue
pub fn handle_event(queue: &OperationQueue, event: Event) {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => {
            debug!("Ignoring directory creation event");
        }
        EventKind::Create(_) => {
            for path in &event.paths {
                if path.is_file() {
                    if let Some(name) = path.file_name() {
                        info!("Observed new file: {}", name.to_string_lossy());
                    }
                }
            }
        }
        EventKind::Remove(RemoveKind::Folder) => {
            debug!("Ignoring directory removal event");
        }
        EventKind::Remove(_) => {
            // The path is already gone, so no stat filter is possible here;
            // the worker reports NotFound if someone beat us to it.
            for path in event.paths {
                queue.enqueue(FileOperation::DeleteFile { path });
            }
        }
        _ => {
            debug!("Ignoring event kind: {:?}", event.kind);
        }
    }
}
