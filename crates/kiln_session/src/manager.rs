//! Per-request dispatch: invalidate, emit under a guard, assemble a verdict.

use kiln_common::{Fingerprint, InputDigests};
use tracing::debug;

use crate::cache::SessionCache;
use crate::engine::{EngineFactory, Program};
use crate::error::SessionError;
use crate::guard::{Cancelled, RequestClock, StalenessGuard};
use crate::report::DiagnosticsReporter;
use crate::session::Session;
use crate::verdict::Verdict;

/// One build request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// The engine's argument list, in order.
    pub arguments: Vec<String>,
    /// Digest of every input the build considers relevant.
    pub inputs: InputDigests,
}

impl Request {
    /// Creates a request.
    pub fn new(arguments: Vec<String>, inputs: InputDigests) -> Self {
        Self { arguments, inputs }
    }
}

/// How a dispatched request ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The request ran to completion; respond with this verdict.
    Completed(Verdict),
    /// A newer request began while this one was emitting. No response
    /// should be produced for it.
    Superseded,
}

/// Owns the session cache and the request clock for one worker.
///
/// All state that would otherwise be process-wide lives here, so separate
/// managers (e.g. in tests) never interfere with each other.
pub struct SessionManager<F: EngineFactory> {
    /// Holds at most one live session.
    cache: SessionCache<F>,
    /// Stamps each request so older ones can observe they were superseded.
    clock: RequestClock,
    /// Renders diagnostics into the response text.
    reporter: DiagnosticsReporter,
}

impl<F: EngineFactory> SessionManager<F> {
    /// Creates a manager with no live session.
    pub fn new(factory: F) -> Self {
        Self::with_reporter(factory, DiagnosticsReporter::new())
    }

    /// Creates a manager that reports diagnostics with `reporter`.
    pub fn with_reporter(factory: F, reporter: DiagnosticsReporter) -> Self {
        Self {
            cache: SessionCache::new(factory),
            clock: RequestClock::new(),
            reporter,
        }
    }

    /// The clock whose latest stamp decides which request is current.
    pub fn clock(&self) -> &RequestClock {
        &self.clock
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&Session<F::Engine>> {
        self.cache.live()
    }

    /// The inputs of the most recently dispatched request on the live session.
    pub fn last_inputs(&self) -> Option<&InputDigests> {
        self.session().and_then(Session::last_inputs)
    }

    /// The fingerprint of the live session's argument list.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.session().map(Session::fingerprint)
    }

    /// The engine factory.
    pub fn factory(&self) -> &F {
        self.cache.factory()
    }

    /// Releases the live session, closing its engine.
    pub fn release(&mut self) -> bool {
        self.cache.release()
    }

    /// Services one request.
    ///
    /// The request's stamp is taken first, which makes every earlier guard
    /// stale. The session is then reused or rebuilt, brought up to date with
    /// the request's inputs, and its program emitted. The input snapshot is
    /// recorded whether the request passes, fails, or is superseded.
    /// Engine construction failures are returned as errors and leave no
    /// snapshot behind.
    pub fn dispatch(&mut self, request: Request) -> Result<Dispatch, SessionError> {
        let Request { arguments, inputs } = request;
        let guard = self.clock.begin();

        let session = self.cache.get_or_create(&arguments)?;
        let summary = session.invalidate(&inputs);
        if !summary.is_empty() {
            debug!(
                stamp = guard.stamp(),
                total = summary.total(),
                created = summary.created,
                changed = summary.changed,
                deleted = summary.deleted,
                "delivered invalidations"
            );
        }

        let outcome = run_program(session.program(), &guard);
        session.record_inputs(inputs);

        match outcome {
            Ok(mut verdict) => {
                if !verdict.success {
                    verdict.report = self.reporter.format(&verdict.diagnostics);
                    self.reporter.report(&verdict.report);
                }
                Ok(Dispatch::Completed(verdict))
            }
            Err(Cancelled) => {
                debug!(stamp = guard.stamp(), latest = self.clock.latest(), "request superseded");
                Ok(Dispatch::Superseded)
            }
        }
    }
}

fn run_program<P: Program>(program: &mut P, guard: &StalenessGuard) -> Result<Verdict, Cancelled> {
    let emitted = program.emit(guard)?;
    let pre_emit = program.pre_emit_diagnostics(guard)?;
    Ok(Verdict::assemble(emitted, pre_emit))
}
