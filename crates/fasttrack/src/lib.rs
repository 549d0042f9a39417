//! FastTrack Dynamic Data-Race Detector
//!
//! # Overview
//!
//! `fasttrack` consumes a stream of per-thread events (memory accesses,
//! lock operations, thread creation and termination) and decides, one event
//! at a time, whether two accesses to the same location from different
//! threads are unordered by happens-before with at least one of them a
//! write.
//!
//! Vector clocks are compressed to epochs wherever one thread's step is
//! enough, which keeps the common read and write paths O(1).
//!
//! # Trinity Architecture
//!
//! - **Domain**: clocks, per-thread/lock/location state, the detector
//!   engine, diagnostics and trace events
//! - **Infrastructure**: trace files on disk
//! - **Adapters**: [`SharedDetector`] for multi-threaded producers
//!
//! # Usage
//!
//! ```rust
//! use fasttrack::{Detector, ThreadId};
//!
//! let mut detector = Detector::new();
//! let (t0, t1) = (ThreadId(0), ThreadId(1));
//!
//! detector.fork(t0, t1).unwrap();
//!
//! // Both threads write under the same lock: ordered
//! detector.acquire(t0, "m").unwrap();
//! detector.write(t0, "x").unwrap();
//! detector.rel(t0, "m").unwrap();
//!
//! detector.acquire(t1, "m").unwrap();
//! assert!(!detector.write(t1, "x").unwrap().is_race());
//! detector.rel(t1, "m").unwrap();
//!
//! // t0 writes again without the lock: races with t1's write
//! assert!(detector.write(t0, "x").unwrap().is_race());
//! ```

#![warn(clippy::all)]

// Trinity Architecture Layers
pub mod domain;
pub mod infrastructure;
pub mod adapters;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Clock types
pub use domain::{Epoch, VectorClock};

// Identifiers and state
pub use domain::{LockId, LockState, Location, ReadState, Shadow, ThreadId, ThreadState};

// Engine
pub use domain::{
    AccessKind, AccessRule, DataRace, Detector, DetectorBuilder, DetectorConfig, DetectorError,
    RaceKind, ReleaseMode, UnsupportedOp, Verdict, DEFAULT_RACE_LOG_LIMIT, WORD_SIZE,
};

// Diagnostics
pub use domain::{DetectorSnapshot, DetectorStats, OpCounters};

// Traces
pub use domain::trace::{replay, replay_with};
pub use domain::{ReplayError, ReplaySummary, TraceError, TraceEvent};
pub use infrastructure::{read_trace, TraceFormat, TraceReader};

pub use adapters::SharedDetector;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_root_types_exported() {
        let detector = Detector::new();
        assert!(detector.is_live(ThreadId::ROOT));
        assert_eq!(WORD_SIZE, 8);
        let _ = SharedDetector::new(detector);
    }
}
