//! Shared Detector Handle
//!
//! ```text
//!  producer t0 ──┐
//!  producer t1 ──┼──▶ Mutex<Detector> ──▶ one event at a time
//!  producer t2 ──┘
//! ```
//!
//! Every call takes the lock for exactly one event, so the detector sees
//! the interleaving in which the lock was taken. Per-thread program order is
//! preserved as long as each producer reports its own events in order.

use crate::domain::detector::{
    AccessKind, DataRace, Detector, DetectorConfig, DetectorError, ReleaseMode, Verdict,
};
use crate::domain::diagnostics::{DetectorSnapshot, DetectorStats};
use crate::domain::state::{LockId, Location, ThreadId};
use crate::domain::trace::TraceEvent;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one [`Detector`]
#[derive(Debug, Clone)]
pub struct SharedDetector {
    inner: Arc<Mutex<Detector>>,
}

impl Default for SharedDetector {
    fn default() -> Self {
        Self::new(Detector::new())
    }
}

impl SharedDetector {
    pub fn new(detector: Detector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self::new(Detector::with_config(config))
    }

    pub fn read(&self, t: ThreadId, location: impl Into<Location>) -> Result<Verdict, DetectorError> {
        self.inner.lock().read(t, location)
    }

    pub fn write(&self, t: ThreadId, location: impl Into<Location>) -> Result<Verdict, DetectorError> {
        self.inner.lock().write(t, location)
    }

    pub fn range_access(
        &self,
        t: ThreadId,
        base: u64,
        len: u64,
        kind: AccessKind,
    ) -> Result<Vec<DataRace>, DetectorError> {
        self.inner.lock().range_access(t, base, len, kind)
    }

    pub fn acquire(&self, t: ThreadId, lock: impl Into<LockId>) -> Result<(), DetectorError> {
        self.inner.lock().acquire(t, lock)
    }

    pub fn release(
        &self,
        t: ThreadId,
        lock: impl Into<LockId>,
        mode: ReleaseMode,
    ) -> Result<(), DetectorError> {
        self.inner.lock().release(t, lock, mode)
    }

    pub fn fork(&self, parent: ThreadId, child: ThreadId) -> Result<(), DetectorError> {
        self.inner.lock().fork(parent, child)
    }

    pub fn end(&self, t: ThreadId) -> Result<(), DetectorError> {
        self.inner.lock().end(t)
    }

    /// Apply one trace event under the lock
    pub fn apply(&self, event: &TraceEvent) -> Result<Vec<DataRace>, DetectorError> {
        event.apply(&mut self.inner.lock())
    }

    /// Run `f` with exclusive access, e.g. to batch several events
    pub fn with<R>(&self, f: impl FnOnce(&mut Detector) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn stats(&self) -> DetectorStats {
        self.inner.lock().stats()
    }

    pub fn snapshot(&self) -> DetectorSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn races(&self) -> Vec<DataRace> {
        self.inner.lock().races().to_vec()
    }

    /// Recover the detector if this is the last handle
    pub fn try_into_inner(self) -> Result<Detector, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let a = SharedDetector::with_config(DetectorConfig {
            log_races: false,
            ..DetectorConfig::default()
        });
        let b = a.clone();
        a.fork(ThreadId(0), ThreadId(1)).unwrap();
        b.write(ThreadId(0), "x").unwrap();
        assert!(a.write(ThreadId(1), "x").unwrap().is_race());
        assert_eq!(b.races().len(), 1);
        assert!(a.try_into_inner().is_err());
        let detector = b.try_into_inner().unwrap();
        assert_eq!(detector.race_count(), 1);
    }

    #[test]
    fn test_apply_and_with() {
        let shared = SharedDetector::default();
        shared
            .apply(&TraceEvent::Fork {
                parent: ThreadId(0),
                child: ThreadId(1),
            })
            .unwrap();
        let live = shared.with(|d| d.is_live(ThreadId(1)));
        assert!(live);
        assert_eq!(shared.stats().live_threads, 2);
    }
}
