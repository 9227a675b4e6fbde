//! Change-set input from the host build scheduler.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The set of filesystem changes since the last synchronization run.
///
/// The host scheduler supplies this for incremental runs; `full_scan` builds
/// one from the current state of the source roots for full rebuilds.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Files that were added or modified.
    pub added_or_changed: Vec<PathBuf>,
    /// Files that were removed.
    pub removed: Vec<PathBuf>,
    /// Whether the output directory must be rebuilt from scratch.
    pub full_rebuild: bool,
}

impl ChangeSet {
    /// Creates an incremental change set.
    pub fn incremental(added_or_changed: Vec<PathBuf>, removed: Vec<PathBuf>) -> Self {
        Self {
            added_or_changed,
            removed,
            full_rebuild: false,
        }
    }

    /// Builds a full-rebuild change set by enumerating every file currently
    /// present under the given source roots.
    pub fn full_scan<P: AsRef<Path>>(source_roots: &[P]) -> Self {
        let added_or_changed = source_roots
            .iter()
            .flat_map(|root| {
                WalkDir::new(root.as_ref())
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
            })
            .collect();

        Self {
            added_or_changed,
            removed: Vec::new(),
            full_rebuild: true,
        }
    }

    /// Whether this change set carries no work at all.
    pub fn is_empty(&self) -> bool {
        self.added_or_changed.is_empty() && self.removed.is_empty()
    }
}
