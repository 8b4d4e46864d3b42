//! Loaded source text with line-start indexing for location lookup.

use std::path::{Path, PathBuf};

use kiln_common::ContentHash;
use kiln_diagnostics::Location;

/// A source file's text as last read by the engine.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// The path the file was read from.
    pub path: PathBuf,
    /// The full text content.
    pub content: String,
    /// Hash of `content`, used to skip rewriting unchanged outputs.
    pub content_hash: ContentHash,
    line_starts: Vec<u32>,
}

impl SourceText {
    /// Creates a new `SourceText` with precomputed line starts and hash.
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            path: path.into(),
            content,
            content_hash,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// The diagnostic location of a byte offset.
    pub fn location(&self, byte_offset: u32) -> Location {
        let (line, column) = self.line_col(byte_offset);
        Location::new(self.path.clone(), line, column)
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

/// What the engine currently knows about one source file.
#[derive(Debug, Clone)]
pub enum SourceState {
    /// The file was read successfully.
    Loaded(SourceText),
    /// The file does not exist or could not be read.
    Missing(String),
    /// The file exists but is not valid UTF-8.
    NotUtf8,
}

impl SourceState {
    /// Reads `path` from disk.
    pub fn read(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => SourceState::Loaded(SourceText::new(path, content)),
                Err(_) => SourceState::NotUtf8,
            },
            Err(e) => SourceState::Missing(e.to_string()),
        }
    }
}
