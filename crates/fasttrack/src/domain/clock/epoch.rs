//! Epoch - Compact Happens-Before Token

use crate::domain::state::ThreadId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::VectorClock;

/// A single step of a single thread, written `c@t`.
///
/// # Memory Layout
/// - Size: 16 bytes (`u64` counter + `u64` thread id)
/// - `Copy`: epochs are passed by value everywhere
///
/// # Ordering
///
/// `PartialOrd` only relates epochs of the same thread:
///
/// ```
/// use fasttrack::domain::clock::Epoch;
/// use fasttrack::domain::state::ThreadId;
///
/// let a = Epoch::new(1, ThreadId(0));
/// let b = Epoch::new(2, ThreadId(0));
/// let c = Epoch::new(2, ThreadId(1));
/// assert!(a <= b);
/// assert!(!(b <= c) && !(c <= b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Epoch {
    /// Counter value of `thread` at this step
    pub clock: u64,
    /// Thread that performed the step
    pub thread: ThreadId,
}

impl Epoch {
    /// The root thread's step zero. Every fresh shadow starts here.
    pub const ROOT_ZERO: Self = Self::new(0, ThreadId::ROOT);

    /// Create an epoch `clock@thread`
    #[inline(always)]
    pub const fn new(clock: u64, thread: ThreadId) -> Self {
        Self { clock, thread }
    }

    /// `self <= clock`, i.e. `self.clock <= clock[self.thread]`
    ///
    /// A zero epoch is covered by every clock.
    #[inline(always)]
    pub fn is_covered_by(&self, clock: &VectorClock) -> bool {
        self.clock <= clock.get(self.thread)
    }
}

impl PartialOrd for Epoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.thread == other.thread {
            Some(self.clock.cmp(&other.clock))
        } else {
            None
        }
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.clock, self.thread.0)
    }
}
