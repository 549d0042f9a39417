//! Detector Statistics

use crate::domain::detector::Detector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time size summary of a detector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorStats {
    /// Counted operations so far
    pub ops: u64,
    /// Threads currently live
    pub live_threads: usize,
    /// Threads ever created (live plus retired)
    pub total_threads: usize,
    /// Locks seen
    pub locks: usize,
    /// Locations accessed
    pub variables: usize,
    /// Non-zero entries across all live thread clocks
    pub thread_vc_entries: usize,
    /// Non-zero entries across all lock clocks
    pub lock_vc_entries: usize,
    /// Races detected
    pub races: u64,
}

impl fmt::Display for DetectorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FastTrack, ops={}, threads={}/{}, locks={}, vars={}, VC threads={}, VC locks={}, races={}",
            self.ops,
            self.live_threads,
            self.total_threads,
            self.locks,
            self.variables,
            self.thread_vc_entries,
            self.lock_vc_entries,
            self.races
        )
    }
}

impl Detector {
    /// Current statistics
    pub fn stats(&self) -> DetectorStats {
        let live_threads = self.live_threads().count();
        DetectorStats {
            ops: self.ops().total(),
            live_threads,
            total_threads: live_threads + self.retired_threads().count(),
            locks: self.locks().count(),
            variables: self.shadows().count(),
            thread_vc_entries: self.live_threads().map(|t| t.clock().len()).sum(),
            lock_vc_entries: self.locks().map(|l| l.clock().len()).sum(),
            races: self.race_count(),
        }
    }
}
