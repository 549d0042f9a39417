//! Operation Counters

use crate::domain::detector::{AccessKind, ReleaseMode};
use serde::{Deserialize, Serialize};

/// Counts of the operations the detector has processed
///
/// Thread lifecycle events (fork, end, register) are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCounters {
    pub read: u64,
    pub write: u64,
    pub acquire: u64,
    pub release: u64,
    pub release_merge: u64,
    pub release_acquire: u64,
}

impl OpCounters {
    /// Sum over every kind
    pub fn total(&self) -> u64 {
        self.read
            + self.write
            + self.acquire
            + self.release
            + self.release_merge
            + self.release_acquire
    }

    pub(crate) fn record_access(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.read += 1,
            AccessKind::Write => self.write += 1,
        }
    }

    pub(crate) fn record_acquire(&mut self) {
        self.acquire += 1;
    }

    pub(crate) fn record_release(&mut self, mode: ReleaseMode) {
        match mode {
            ReleaseMode::Release => self.release += 1,
            ReleaseMode::ReleaseMerge => self.release_merge += 1,
            ReleaseMode::ReleaseAcquire => self.release_acquire += 1,
        }
    }
}
