//! Shadow State - Per-Location Access History
//!
//! # Adaptive Read Representation
//!
//! ```text
//!              concurrent second reader
//!  Exclusive ─────────────────────────────▶ Shared
//!  (Epoch)                                  (VectorClock)
//!     ▲                                         │
//!     └─────────────────────────────────────────┘
//!              ordered write (reset to 0@root)
//! ```
//!
//! The common case (one reader since the last write) stays O(1); only
//! genuinely concurrent readers pay for a full clock.

use crate::domain::clock::{Epoch, VectorClock};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read history of a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "clock", rename_all = "snake_case")]
pub enum ReadState {
    /// At most one thread has read since the last write
    Exclusive(Epoch),
    /// Several concurrent readers; one entry per reader
    Shared(VectorClock),
}

impl ReadState {
    /// `true` for the shared representation
    #[inline(always)]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Number of clock entries held (1 for an epoch)
    pub fn entries(&self) -> usize {
        match self {
            Self::Exclusive(_) => 1,
            Self::Shared(vc) => vc.len(),
        }
    }
}

impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclusive(epoch) => write!(f, "{}", epoch),
            Self::Shared(vc) => write!(f, "{}", vc),
        }
    }
}

/// FastTrack shadow word for one monitored location
///
/// A fresh shadow looks as if the root thread wrote and read the location
/// at step zero, which every thread's clock covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadow {
    /// Epoch of the last write
    pub write: Epoch,
    /// Reads since the last write
    pub read: ReadState,
}

impl Shadow {
    /// Shadow for a location never accessed before
    pub const fn new() -> Self {
        Self {
            write: Epoch::ROOT_ZERO,
            read: ReadState::Exclusive(Epoch::ROOT_ZERO),
        }
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.write, self.read)
    }
}
