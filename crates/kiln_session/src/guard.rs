//! Per-request staleness guards and the clock that invalidates them.
//!
//! Every request takes a fresh stamp from the [`RequestClock`] when it is
//! dispatched. The clock remembers only the latest stamp, so a guard stays
//! valid until the next request begins and becomes stale at that instant,
//! even if the engine is still working on the older request's behalf.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Returned when a guard check finds that its request has been superseded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("request superseded by a newer request")]
pub struct Cancelled;

/// Issues request stamps and records the most recent one.
///
/// Clones share the same counter. Stamps are a logical counter rather than
/// wall-clock time, so two requests can never share a stamp.
#[derive(Clone, Debug, Default)]
pub struct RequestClock {
    latest: Arc<AtomicU64>,
}

impl RequestClock {
    /// Creates a clock with no requests issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new request, making every earlier guard stale.
    pub fn begin(&self) -> StalenessGuard {
        let stamp = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        StalenessGuard {
            stamp,
            latest: Arc::clone(&self.latest),
        }
    }

    /// The stamp of the most recently begun request (0 before the first).
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Cooperative cancellation token for one request.
///
/// The engine polls [`is_stale`](Self::is_stale) or [`check`](Self::check)
/// at safe points during long-running work. There is no preemptive
/// interrupt.
#[derive(Clone, Debug)]
pub struct StalenessGuard {
    stamp: u64,
    latest: Arc<AtomicU64>,
}

impl StalenessGuard {
    /// The stamp this guard was issued with.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Returns `true` once a newer request has begun.
    pub fn is_stale(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.stamp
    }

    /// Returns `Err(Cancelled)` once a newer request has begun.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_stale() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
