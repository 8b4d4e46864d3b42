//! Shared foundational types used across the kiln compilation worker.
//!
//! This crate provides content hashing, the opaque per-file [`Digest`] that
//! callers attach to build inputs, the [`InputDigests`] snapshot of one
//! request's inputs, and argument [`Fingerprint`]s used for session reuse.

#![warn(missing_docs)]

pub mod digest;
pub mod fingerprint;
pub mod hash;

pub use digest::{Digest, InputDigests};
pub use fingerprint::Fingerprint;
pub use hash::ContentHash;
