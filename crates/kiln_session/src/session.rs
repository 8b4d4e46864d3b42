//! One live engine instance and the state kept alongside it.

use kiln_common::{Fingerprint, InputDigests};
use tracing::trace;

use crate::diff::{diff_inputs, DiffSummary};
use crate::engine::Engine;
use crate::registry::InvalidationRegistry;

/// The reusable incremental compilation state for one build configuration.
///
/// Owns the engine, the registry of paths the engine watches, and the input
/// snapshot of the last request it served. `last_inputs` is absent until the
/// first request on a fresh session completes.
pub struct Session<E: Engine> {
    /// Configuration identity the engine was built for.
    fingerprint: Fingerprint,
    /// Engine holding the incremental state.
    engine: E,
    /// Watches the engine registered at construction.
    watches: InvalidationRegistry,
    /// Input digests from the previous request, if it carried any.
    last_inputs: Option<InputDigests>,
}

impl<E: Engine> Session<E> {
    /// Wraps a freshly constructed engine and the watches it registered.
    pub fn new(fingerprint: Fingerprint, engine: E, watches: InvalidationRegistry) -> Self {
        Self {
            fingerprint,
            engine,
            watches,
            last_inputs: None,
        }
    }

    /// The fingerprint of the arguments this session was built from.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// The inputs of the most recent request, if any.
    pub fn last_inputs(&self) -> Option<&InputDigests> {
        self.last_inputs.as_ref()
    }

    /// The engine's current watches.
    pub fn watches(&self) -> &InvalidationRegistry {
        &self.watches
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Brings the engine up to date with `inputs`.
    ///
    /// Diffs `inputs` against the last snapshot, delivers each event through
    /// the registry, then lets the engine drain the work those callbacks
    /// queued. On a fresh session the diff is empty and only the drain runs.
    /// The snapshot itself is not replaced here; see
    /// [`record_inputs`](Self::record_inputs).
    pub fn invalidate(&mut self, inputs: &InputDigests) -> DiffSummary {
        let events = diff_inputs(self.last_inputs.as_ref(), inputs);
        for event in &events {
            if !self.watches.deliver(&event.path, event.kind) {
                trace!(path = %event.path.display(), kind = %event.kind, "no watcher for input");
            }
        }
        self.engine.drain_pending(&mut self.watches);
        DiffSummary::of(&events)
    }

    /// The engine's current program.
    pub fn program(&mut self) -> &mut E::Program {
        self.engine.program()
    }

    /// Replaces the input snapshot with the one just presented.
    pub fn record_inputs(&mut self, inputs: InputDigests) {
        self.last_inputs = Some(inputs);
    }

    /// Closes the engine and drops every remaining watch.
    pub fn release(self) {
        let Self {
            engine,
            mut watches,
            ..
        } = self;
        engine.close(&mut watches);
        watches.clear();
    }
}
