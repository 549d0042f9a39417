//! Per-lock analysis state

use super::LockId;
use crate::domain::clock::VectorClock;
use std::fmt;

/// A lock and the clock published by its last release
///
/// Created lazily the first time a lock id is acquired or released, with
/// an empty clock. Never destroyed.
#[derive(Debug, Clone)]
pub struct LockState {
    id: LockId,
    clock: VectorClock,
}

impl LockState {
    /// New lock with an empty clock
    pub fn new(id: LockId) -> Self {
        Self {
            id,
            clock: VectorClock::new(),
        }
    }

    /// Lock identifier
    pub fn id(&self) -> &LockId {
        &self.id
    }

    /// Clock published by the last release
    #[inline(always)]
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    pub(crate) fn set_clock(&mut self, clock: VectorClock) {
        self.clock = clock;
    }

    pub(crate) fn merge(&mut self, clock: &VectorClock) {
        self.clock.join_in(clock);
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock[{}]: {}", self.id, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::ThreadId;

    #[test]
    fn test_new_is_empty() {
        let l = LockState::new(LockId::from("l"));
        assert!(l.clock().is_empty());
        assert_eq!(l.to_string(), "lock[l]: {}");
    }

    #[test]
    fn test_merge() {
        let mut l = LockState::new(LockId::Addr(0x40));
        let mut a = VectorClock::new();
        a.set(ThreadId(0), 3);
        l.set_clock(a);

        let mut b = VectorClock::new();
        b.set(ThreadId(0), 1);
        b.set(ThreadId(1), 2);
        l.merge(&b);

        assert_eq!(l.clock().get(ThreadId(0)), 3);
        assert_eq!(l.clock().get(ThreadId(1)), 2);
        assert_eq!(l.to_string(), "lock[0x40]: {0: 3, 1: 2}");
    }
}
