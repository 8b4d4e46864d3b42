//! Incremental session management for the kiln compilation worker.
//!
//! A worker process services an unbounded sequence of build requests. This
//! crate keeps one compilation engine warm across them: it decides when the
//! live [`Session`] can be reused, turns the difference between two requests'
//! input digests into file-level invalidations for the engine, makes stale
//! work from superseded requests cancel itself, and folds the engine's
//! output into a single [`Verdict`] per request.
//!
//! The engine is an external collaborator reached through the [`Engine`],
//! [`Program`], and [`EngineFactory`] traits.

#![warn(missing_docs)]

pub mod cache;
pub mod diff;
pub mod engine;
pub mod error;
pub mod guard;
pub mod manager;
pub mod registry;
pub mod report;
pub mod session;
pub mod verdict;

pub use cache::SessionCache;
pub use diff::{diff_inputs, ChangeKind, DiffSummary, FileEvent};
pub use engine::{EmitOutput, Engine, EngineFactory, Program};
pub use error::SessionError;
pub use guard::{Cancelled, RequestClock, StalenessGuard};
pub use manager::{Dispatch, Request, SessionManager};
pub use registry::{InvalidationRegistry, WatchCallback};
pub use report::DiagnosticsReporter;
pub use session::Session;
pub use verdict::Verdict;
