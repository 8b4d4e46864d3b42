//! Argument-list fingerprints used as the sole key for session reuse.

use std::fmt;

use crate::hash::ContentHash;

/// Deterministic identity of a request's argument list.
///
/// Two requests with identical argument lists target the same build
/// configuration, even when issued from different working directories.
/// Each argument is length-prefixed before hashing, so `["a b"]` and
/// `["a", "b"]` produce different fingerprints.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(ContentHash);

impl Fingerprint {
    /// Computes the fingerprint of an ordered argument list.
    pub fn of<S: AsRef<str>>(arguments: &[S]) -> Self {
        let mut buf = Vec::new();
        for arg in arguments {
            let bytes = arg.as_ref().as_bytes();
            buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            buf.extend_from_slice(bytes);
        }
        Self(ContentHash::from_bytes(&buf))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.0.to_string()[..8])
    }
}
