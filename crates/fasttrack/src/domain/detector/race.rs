//! Race Reports

use super::types::AccessKind;
use crate::domain::clock::{Epoch, VectorClock};
use crate::domain::state::{Location, Shadow, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which pair of accesses conflicted
///
/// Derived from the branch of the access rules that failed. On a write,
/// the last write is checked before the reads, so a write that is
/// unordered with both is classified `WriteAfterWrite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceKind {
    /// Read unordered with the last write
    ReadAfterWrite,
    /// Write unordered with the last write
    WriteAfterWrite,
    /// Write unordered with a read since the last write
    WriteAfterRead,
}

impl RaceKind {
    /// Kind of the access that triggered the report
    pub const fn current(self) -> AccessKind {
        match self {
            Self::ReadAfterWrite => AccessKind::Read,
            Self::WriteAfterWrite | Self::WriteAfterRead => AccessKind::Write,
        }
    }

    /// Kind of the earlier access it conflicts with
    pub const fn prior(self) -> AccessKind {
        match self {
            Self::ReadAfterWrite | Self::WriteAfterWrite => AccessKind::Write,
            Self::WriteAfterRead => AccessKind::Read,
        }
    }
}

impl fmt::Display for RaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadAfterWrite => f.write_str("read-after-write"),
            Self::WriteAfterWrite => f.write_str("write-after-write"),
            Self::WriteAfterRead => f.write_str("write-after-read"),
        }
    }
}

/// A detected data race
///
/// Carries the acting thread's clock and the location's shadow as they were
/// when the race was detected; the detector leaves both unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRace {
    /// Conflict classification
    pub kind: RaceKind,
    /// Thread performing the racing access
    pub thread: ThreadId,
    /// Location accessed
    pub location: Location,
    /// Prior access the current one is unordered with
    pub conflicting: Epoch,
    /// Clock of `thread` at detection time
    pub thread_clock: VectorClock,
    /// Shadow of `location` at detection time
    pub shadow: Shadow,
}

impl DataRace {
    /// Kind of the racing access
    pub fn access(&self) -> AccessKind {
        self.kind.current()
    }

    /// Thread that performed the conflicting prior access
    pub fn conflicting_thread(&self) -> ThreadId {
        self.conflicting.thread
    }
}

impl fmt::Display for DataRace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Data race on {} {} {} ({} with {})",
            self.access(),
            self.thread,
            self.location,
            self.kind,
            self.conflicting
        )?;
        writeln!(f, "  thread[{}]: {}", self.thread.0, self.thread_clock)?;
        write!(f, "  var[{}]: {}", self.location, self.shadow)
    }
}

impl std::error::Error for DataRace {}
