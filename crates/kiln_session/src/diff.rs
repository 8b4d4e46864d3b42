//! Digest comparison between two consecutive requests.
//!
//! Compares the previous request's input digests against the current ones
//! and reports which files were deleted, created, or changed. Only digests
//! are compared; timestamps and file contents are never consulted.

use std::fmt;
use std::path::PathBuf;

use kiln_common::InputDigests;

/// How a single input file differs between two requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The file is new in the current request.
    Created,
    /// The file is present in both requests with different digests.
    Changed,
    /// The file was present before and is gone now.
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "created"),
            ChangeKind::Changed => write!(f, "changed"),
            ChangeKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// A file-level invalidation event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEvent {
    /// The affected input path.
    pub path: PathBuf,
    /// What happened to it.
    pub kind: ChangeKind,
}

impl FileEvent {
    /// Creates a new event.
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Per-kind event counts of one diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of `Created` events.
    pub created: usize,
    /// Number of `Changed` events.
    pub changed: usize,
    /// Number of `Deleted` events.
    pub deleted: usize,
}

impl DiffSummary {
    /// Counts the events in `events`.
    pub fn of(events: &[FileEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            match event.kind {
                ChangeKind::Created => summary.created += 1,
                ChangeKind::Changed => summary.changed += 1,
                ChangeKind::Deleted => summary.deleted += 1,
            }
        }
        summary
    }

    /// Returns `true` if the diff produced no events.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total number of events.
    pub fn total(&self) -> usize {
        self.created + self.changed + self.deleted
    }
}

/// Computes the invalidation events between two input snapshots.
///
/// With no `previous` snapshot (the first build of a session) there is
/// nothing to invalidate and no events are produced. Otherwise every path
/// present in exactly one snapshot, or in both with different digests,
/// yields one event. Deletions come first, then creations, then changes,
/// each group in path order.
pub fn diff_inputs(previous: Option<&InputDigests>, current: &InputDigests) -> Vec<FileEvent> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let mut deleted = Vec::new();
    let mut created = Vec::new();
    let mut changed = Vec::new();

    for (path, _) in previous.iter() {
        if !current.contains(path) {
            deleted.push(FileEvent::new(path.clone(), ChangeKind::Deleted));
        }
    }

    for (path, digest) in current.iter() {
        match previous.get(path) {
            None => created.push(FileEvent::new(path.clone(), ChangeKind::Created)),
            Some(old) if old != digest => {
                changed.push(FileEvent::new(path.clone(), ChangeKind::Changed))
            }
            Some(_) => {}
        }
    }

    deleted.extend(created);
    deleted.extend(changed);
    deleted
}
