//! Resolved source locations attached to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A 1-indexed line/column position inside a named file.
///
/// Locations are resolved by the engine when the diagnostic is created, so
/// rendering never needs access to file contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The file path as the build named it.
    pub path: PathBuf,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number (in bytes).
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// Creates a location for a whole file, pointing at its first byte.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, 1, 1)
    }

    /// Returns the path with `/` separators regardless of platform.
    pub fn canonical_path(&self) -> String {
        self.path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
            .replace("//", "/")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.canonical_path(), self.line, self.column)
    }
}
