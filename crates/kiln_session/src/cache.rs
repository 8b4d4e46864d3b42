//! Holds at most one live session and replaces it when the arguments change.

use kiln_common::Fingerprint;
use tracing::debug;

use crate::engine::EngineFactory;
use crate::error::SessionError;
use crate::registry::InvalidationRegistry;
use crate::session::Session;

/// Single-slot session cache keyed by argument fingerprint.
///
/// A worker process serves one build configuration at a time. When a
/// request arrives with different arguments, the live session is released
/// (its engine closed, its watches dropped) before the replacement engine
/// is constructed, so two engines never hold watches at once.
pub struct SessionCache<F: EngineFactory> {
    /// Builds an engine on every cache miss.
    factory: F,
    /// The single retained session, if any.
    live: Option<Session<F::Engine>>,
}

impl<F: EngineFactory> SessionCache<F> {
    /// Creates an empty cache that builds engines with `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            live: None,
        }
    }

    /// Returns the session for `arguments`, constructing it if needed.
    ///
    /// A live session with the same fingerprint is returned unchanged. If
    /// construction fails the error is returned and the cache is left empty.
    pub fn get_or_create(
        &mut self,
        arguments: &[String],
    ) -> Result<&mut Session<F::Engine>, SessionError> {
        let fingerprint = Fingerprint::of(arguments);

        let session = match self.live.take() {
            Some(session) if session.fingerprint() == fingerprint => session,
            stale => {
                if let Some(old) = stale {
                    debug!(old = ?old.fingerprint(), new = ?fingerprint, "arguments changed, releasing session");
                    old.release();
                }
                let mut watches = InvalidationRegistry::new();
                let engine = self.factory.construct(arguments, &mut watches)?;
                debug!(fingerprint = ?fingerprint, "constructed session");
                Session::new(fingerprint, engine, watches)
            }
        };

        Ok(self.live.insert(session))
    }

    /// The live session, if any.
    pub fn live(&self) -> Option<&Session<F::Engine>> {
        self.live.as_ref()
    }

    /// Releases the live session. Returns `false` if there was none.
    pub fn release(&mut self) -> bool {
        match self.live.take() {
            Some(session) => {
                debug!(fingerprint = ?session.fingerprint(), "releasing session");
                session.release();
                true
            }
            None => false,
        }
    }

    /// The engine factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: EngineFactory> Drop for SessionCache<F> {
    fn drop(&mut self) {
        self.release();
    }
}
