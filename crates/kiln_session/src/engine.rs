//! The boundary between the session layer and the compilation engine.
//!
//! The engine is an opaque collaborator. It opens watches by registering
//! callbacks in the session's [`InvalidationRegistry`], may defer applying
//! the resulting updates to its own task queue, and exposes a program that
//! can be checked and emitted under a [`StalenessGuard`].

use kiln_diagnostics::Diagnostic;

use crate::error::SessionError;
use crate::guard::{Cancelled, StalenessGuard};
use crate::registry::InvalidationRegistry;

/// Result of a completed emit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitOutput {
    /// `true` if the engine decided not to write any output.
    pub skipped: bool,
    /// Diagnostics produced while emitting.
    pub diagnostics: Vec<Diagnostic>,
}

/// A program snapshot that can be checked and emitted.
pub trait Program {
    /// Writes the program's outputs.
    ///
    /// Implementations poll `guard` at safe points and return
    /// `Err(Cancelled)` as soon as it is stale, without writing further.
    /// Outputs written before cancellation may remain on disk but are not
    /// recorded as emitted, so the next emit writes them again.
    fn emit(&mut self, guard: &StalenessGuard) -> Result<EmitOutput, Cancelled>;

    /// Returns the program's diagnostics (syntax, semantic, configuration).
    fn pre_emit_diagnostics(&mut self, guard: &StalenessGuard)
        -> Result<Vec<Diagnostic>, Cancelled>;
}

/// A live, incrementally updatable engine instance.
pub trait Engine {
    /// The program type this engine produces.
    type Program: Program;

    /// Applies every update queued by watch callbacks.
    ///
    /// Called after invalidations are delivered and before the program is
    /// read. The engine may open or close watches while draining.
    fn drain_pending(&mut self, watches: &mut InvalidationRegistry);

    /// The current program. It may be a different snapshot after
    /// [`drain_pending`](Self::drain_pending).
    fn program(&mut self) -> &mut Self::Program;

    /// Releases every resource and closes every watch the engine opened.
    fn close(self, watches: &mut InvalidationRegistry);
}

/// Constructs engines from a request's argument list.
pub trait EngineFactory {
    /// The engine type produced.
    type Engine: Engine;

    /// Builds a new engine, registering its initial watches in `watches`.
    ///
    /// Malformed arguments or a missing configuration file are reported as
    /// [`SessionError::Configuration`].
    fn construct(
        &mut self,
        arguments: &[String],
        watches: &mut InvalidationRegistry,
    ) -> Result<Self::Engine, SessionError>;
}
