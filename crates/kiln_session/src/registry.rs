//! Path-to-callback table through which the engine hears about file changes.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::diff::ChangeKind;

/// A callback the engine installs when it starts watching a path.
pub type WatchCallback = Box<dyn FnMut(&Path, ChangeKind) + Send>;

/// The set of paths the engine currently watches, with their callbacks.
///
/// The registry is an index of engine interest, not an owner of file
/// contents. Delivering an event for a path nobody watches is a no-op: the
/// build may declare inputs the engine never opens.
#[derive(Default)]
pub struct InvalidationRegistry {
    watches: HashMap<PathBuf, WatchCallback>,
}

impl InvalidationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the callback for `path`, replacing any existing one.
    pub fn register(&mut self, path: impl Into<PathBuf>, callback: WatchCallback) {
        self.watches.insert(path.into(), callback);
    }

    /// Removes the callback for `path`. Returns `false` if none was installed.
    pub fn unregister(&mut self, path: &Path) -> bool {
        self.watches.remove(path).is_some()
    }

    /// Invokes the callback for `path` with `kind`.
    ///
    /// Returns `true` if a callback was invoked.
    pub fn deliver(&mut self, path: &Path, kind: ChangeKind) -> bool {
        match self.watches.get_mut(path) {
            Some(callback) => {
                callback(path, kind);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `path` has a callback installed.
    pub fn is_watched(&self, path: &Path) -> bool {
        self.watches.contains_key(path)
    }

    /// Number of watched paths.
    pub fn len(&self) -> usize {
        self.watches.len()
    }

    /// Returns `true` if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Drops every callback.
    pub fn clear(&mut self) {
        self.watches.clear();
    }

    /// Returns the watched paths in sorted order.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.watches.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl fmt::Debug for InvalidationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidationRegistry")
            .field("watched", &self.watched_paths())
            .finish()
    }
}
