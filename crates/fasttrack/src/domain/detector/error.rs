//! Detector Errors
//!
//! Every fallible detector operation validates its arguments before touching
//! any table, so an `Err` leaves the detector exactly as it was.

use crate::domain::state::ThreadId;
use std::fmt;
use thiserror::Error;

/// Operation the detector deliberately does not model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOp {
    /// Thread join
    Join { parent: ThreadId, child: ThreadId },
    /// Memory release
    Free { addr: u64, size: u64 },
}

impl fmt::Display for UnsupportedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { parent, child } => write!(f, "join {} {}", parent, child),
            Self::Free { addr, size } => write!(f, "free {:#x} {}", addr, size),
        }
    }
}

/// Fatal usage errors reported by the detector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    #[error("Unknown thread: {0}")]
    UnknownThread(ThreadId),

    #[error("Thread {0} is already live")]
    ThreadAlreadyLive(ThreadId),

    #[error("Thread {0} has ended and its id cannot be reused")]
    ThreadRetired(ThreadId),

    #[error("Unsupported operation: {0}")]
    Unsupported(UnsupportedOp),

    #[error("Range {base:#x}+{len} overflows the address space")]
    RangeOverflow { base: u64, len: u64 },
}
