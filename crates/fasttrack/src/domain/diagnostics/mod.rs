//! Diagnostics - Read-Only Views of Detector State
//!
//! Nothing here influences detection. Counters are updated by the engine;
//! statistics, snapshots and the text report are computed on demand.
//!
//! ```text
//! Detector ──▶ OpCounters        (per-kind operation counts)
//!          ──▶ DetectorStats     (one-line summary, periodic log)
//!          ──▶ DetectorSnapshot  (deterministic, serde-serializable dump)
//!          ──▶ report()          (thread / var / lock listing)
//! ```

mod counters;
mod snapshot;
mod stats;

pub use counters::OpCounters;
pub use snapshot::{DetectorSnapshot, LockEntry, ThreadEntry, VariableEntry};
pub use stats::DetectorStats;
