//! Caller-supplied input digests and per-request input snapshots.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An opaque content identifier for one input file.
///
/// The worker never interprets a digest beyond equality: two digests for the
/// same path that compare equal mean the file is unchanged. The build tool
/// decides how digests are computed (usually a base64 or hex hash string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.0)
    }
}

/// The complete path-to-digest mapping of one build request.
///
/// Every file the build considers relevant is present, changed or not.
/// Backed by a `BTreeMap` so iteration (and therefore every diff computed
/// from it) is ordered by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputDigests(BTreeMap<PathBuf, Digest>);

impl InputDigests {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records the digest for `path`, replacing any previous value.
    pub fn insert(&mut self, path: impl Into<PathBuf>, digest: impl Into<Digest>) {
        self.0.insert(path.into(), digest.into());
    }

    /// Returns the digest recorded for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&Digest> {
        self.0.get(path)
    }

    /// Returns `true` if `path` is part of this snapshot.
    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }

    /// Returns the number of inputs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot has no inputs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(path, digest)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Digest)> {
        self.0.iter()
    }

    /// Iterates over the input paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.keys()
    }
}

impl<P: Into<PathBuf>, D: Into<Digest>> FromIterator<(P, D)> for InputDigests {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, d)| (p.into(), d.into()))
                .collect(),
        )
    }
}
