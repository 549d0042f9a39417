//! FastTrack Access Rules
//!
//! Pure functions over one shadow and one thread. On success the shadow is
//! updated and the admitting rule is returned; on a race the shadow is left
//! untouched and the conflicting prior access is returned.
//!
//! ```text
//! read  x by t (epoch E, clock C):
//!   R == E                              → ReadSameEpoch
//!   W ⋢ C                               → race (read-after-write)
//!   R shared                            → R[t] := C[t]         ReadShared
//!   R ⊑ C                               → R := E               ReadExclusive
//!   otherwise                           → R := {E, R}          ReadShare
//!
//! write x by t:
//!   W == E                              → WriteSameEpoch
//!   W ⋢ C                               → race (write-after-write)
//!   R ⋢ C                               → race (write-after-read)
//!   R exclusive                         → W := E               WriteExclusive
//!   R shared                            → W := E, R := 0@root  WriteShared
//! ```

use super::race::RaceKind;
use super::types::AccessRule;
use crate::domain::clock::{Epoch, VectorClock};
use crate::domain::state::{ReadState, Shadow, ThreadState};

/// Prior access an unordered access conflicts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub kind: RaceKind,
    pub prior: Epoch,
}

pub(crate) fn check_read(shadow: &mut Shadow, thread: &ThreadState) -> Result<AccessRule, Conflict> {
    let epoch = thread.epoch();
    let clock = thread.clock();

    if shadow.read == ReadState::Exclusive(epoch) {
        return Ok(AccessRule::ReadSameEpoch);
    }

    if !shadow.write.is_covered_by(clock) {
        return Err(Conflict {
            kind: RaceKind::ReadAfterWrite,
            prior: shadow.write,
        });
    }

    let shared = match &mut shadow.read {
        ReadState::Shared(readers) => {
            readers.set(epoch.thread, epoch.clock);
            return Ok(AccessRule::ReadShared);
        }
        ReadState::Exclusive(last) if last.is_covered_by(clock) => {
            *last = epoch;
            return Ok(AccessRule::ReadExclusive);
        }
        ReadState::Exclusive(last) => VectorClock::from_epochs([epoch, *last]),
    };

    shadow.read = ReadState::Shared(shared);
    Ok(AccessRule::ReadShare)
}

pub(crate) fn check_write(shadow: &mut Shadow, thread: &ThreadState) -> Result<AccessRule, Conflict> {
    let epoch = thread.epoch();
    let clock = thread.clock();

    if shadow.write == epoch {
        return Ok(AccessRule::WriteSameEpoch);
    }

    if !shadow.write.is_covered_by(clock) {
        return Err(Conflict {
            kind: RaceKind::WriteAfterWrite,
            prior: shadow.write,
        });
    }

    let unordered_read = match &shadow.read {
        ReadState::Exclusive(last) => (!last.is_covered_by(clock)).then_some(*last),
        ReadState::Shared(readers) => readers.first_uncovered(clock),
    };
    if let Some(prior) = unordered_read {
        return Err(Conflict {
            kind: RaceKind::WriteAfterRead,
            prior,
        });
    }

    let rule = if shadow.read.is_shared() {
        shadow.read = ReadState::Exclusive(Epoch::ROOT_ZERO);
        AccessRule::WriteShared
    } else {
        AccessRule::WriteExclusive
    };
    shadow.write = epoch;
    Ok(rule)
}
