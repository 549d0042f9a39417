//! Per-thread analysis state

use super::ThreadId;
use crate::domain::clock::{Epoch, VectorClock};
use std::fmt;

/// A live thread and its vector clock
///
/// # Invariant
///
/// `clock[id] >= 1` at all times: a fresh thread has already taken one
/// logical step, and its own entry only ever grows.
#[derive(Debug, Clone)]
pub struct ThreadState {
    id: ThreadId,
    clock: VectorClock,
}

impl ThreadState {
    /// Fresh thread: empty clock followed by one self-increment
    pub fn new(id: ThreadId) -> Self {
        let mut clock = VectorClock::new();
        clock.increment(id);
        Self { id, clock }
    }

    /// Thread identifier
    #[inline(always)]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Everything this thread has observed
    #[inline(always)]
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// Current epoch, `clock[id]@id`
    #[inline(always)]
    pub fn epoch(&self) -> Epoch {
        self.clock.epoch_of(self.id)
    }

    /// Advance this thread's own counter; returns the new value
    #[inline]
    pub fn tick(&mut self) -> u64 {
        self.clock.increment(self.id)
    }

    /// Absorb `other` into this thread's clock
    pub(crate) fn absorb(&mut self, other: &VectorClock) {
        self.clock.join_in(other);
    }

    /// Replace the clock wholesale, returning the previous one
    pub(crate) fn replace_clock(&mut self, clock: VectorClock) -> VectorClock {
        debug_assert!(clock.get(self.id) >= self.clock.get(self.id));
        std::mem::replace(&mut self.clock, clock)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread[{}]: {}", self.id.0, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_one() {
        let t = ThreadState::new(ThreadId(0));
        assert_eq!(t.clock().get(ThreadId(0)), 1);
        assert_eq!(t.clock().len(), 1);
    }

    #[test]
    fn test_tick() {
        let mut t = ThreadState::new(ThreadId(0));
        assert_eq!(t.tick(), 2);
        assert_eq!(t.clock().get(ThreadId(0)), 2);
        assert_eq!(t.clock().get(ThreadId(9)), 0);
    }

    #[test]
    fn test_epoch_tracks_own_entry() {
        let mut t = ThreadState::new(ThreadId(5));
        assert_eq!(t.epoch(), Epoch::new(1, ThreadId(5)));
        t.tick();
        assert_eq!(t.epoch(), Epoch::new(2, ThreadId(5)));
    }

    #[test]
    fn test_absorb_keeps_own_entry() {
        let mut t = ThreadState::new(ThreadId(1));
        let mut other = VectorClock::new();
        other.set(ThreadId(0), 4);
        t.absorb(&other);
        assert_eq!(t.clock().get(ThreadId(0)), 4);
        assert_eq!(t.clock().get(ThreadId(1)), 1);
    }

    #[test]
    fn test_display() {
        let t = ThreadState::new(ThreadId(2));
        assert_eq!(t.to_string(), "thread[2]: {2: 1}");
    }
}
