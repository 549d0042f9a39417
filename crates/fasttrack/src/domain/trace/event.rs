//! Trace Events

use crate::domain::detector::{AccessKind, DataRace, Detector, DetectorError, ReleaseMode, Verdict};
use crate::domain::state::{LockId, Location, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed event
///
/// Serialized as JSON with an `"op"` tag:
/// `{"op":"write","thread":1,"location":16}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceEvent {
    #[serde(alias = "rd")]
    Read { thread: ThreadId, location: Location },
    #[serde(alias = "wr")]
    Write { thread: ThreadId, location: Location },
    Range {
        thread: ThreadId,
        base: u64,
        len: u64,
        kind: AccessKind,
    },
    #[serde(alias = "acq")]
    Acquire { thread: ThreadId, lock: LockId },
    Release {
        thread: ThreadId,
        lock: LockId,
        #[serde(default = "default_release_mode")]
        mode: ReleaseMode,
    },
    Fork { parent: ThreadId, child: ThreadId },
    End { thread: ThreadId },
    Join { parent: ThreadId, child: ThreadId },
    Free { addr: u64, size: u64 },
}

fn default_release_mode() -> ReleaseMode {
    ReleaseMode::Release
}

impl TraceEvent {
    /// Thread performing the event (the parent for fork/join)
    pub fn thread(&self) -> Option<ThreadId> {
        match self {
            Self::Read { thread, .. }
            | Self::Write { thread, .. }
            | Self::Range { thread, .. }
            | Self::Acquire { thread, .. }
            | Self::Release { thread, .. }
            | Self::End { thread } => Some(*thread),
            Self::Fork { parent, .. } | Self::Join { parent, .. } => Some(*parent),
            Self::Free { .. } => None,
        }
    }

    /// Feed this event to `detector`, returning the races it revealed
    pub fn apply(&self, detector: &mut Detector) -> Result<Vec<DataRace>, DetectorError> {
        let verdict = match self {
            Self::Read { thread, location } => detector.read(*thread, location.clone())?,
            Self::Write { thread, location } => detector.write(*thread, location.clone())?,
            Self::Range {
                thread,
                base,
                len,
                kind,
            } => return detector.range_access(*thread, *base, *len, *kind),
            Self::Acquire { thread, lock } => {
                detector.acquire(*thread, lock.clone())?;
                return Ok(Vec::new());
            }
            Self::Release { thread, lock, mode } => {
                detector.release(*thread, lock.clone(), *mode)?;
                return Ok(Vec::new());
            }
            Self::Fork { parent, child } => {
                detector.fork(*parent, *child)?;
                return Ok(Vec::new());
            }
            Self::End { thread } => {
                detector.end(*thread)?;
                return Ok(Vec::new());
            }
            Self::Join { parent, child } => {
                detector.join(*parent, *child)?;
                return Ok(Vec::new());
            }
            Self::Free { addr, size } => {
                detector.free(*addr, *size)?;
                return Ok(Vec::new());
            }
        };

        Ok(match verdict {
            Verdict::Race(race) => vec![race],
            Verdict::Ordered(_) => Vec::new(),
        })
    }
}

/// Text-grammar form, parseable by [`parse_text_line`](super::parse_text_line)
impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { thread, location } => write!(f, "rd {} {}", thread.0, location),
            Self::Write { thread, location } => write!(f, "wr {} {}", thread.0, location),
            Self::Range {
                thread,
                base,
                len,
                kind,
            } => {
                let kind = match kind {
                    AccessKind::Read => "r",
                    AccessKind::Write => "w",
                };
                write!(f, "range {} {:#x} {} {}", thread.0, base, len, kind)
            }
            Self::Acquire { thread, lock } => write!(f, "acq {} {}", thread.0, lock),
            Self::Release { thread, lock, mode } => {
                write!(f, "{} {} {}", mode.mnemonic(), thread.0, lock)
            }
            Self::Fork { parent, child } => write!(f, "fork {} {}", parent.0, child.0),
            Self::End { thread } => write!(f, "end {}", thread.0),
            Self::Join { parent, child } => write!(f, "join {} {}", parent.0, child.0),
            Self::Free { addr, size } => write!(f, "free {:#x} {}", addr, size),
        }
    }
}
