//! Vector Clock Implementation
//!
//! Vector clocks summarize everything a thread (or a lock) has
//! transitively observed.
//!
//! # Theory
//!
//! Given clocks V1 and V2:
//! - V1 <= V2 if every entry of V1 is at most the matching entry of V2
//! - the join V1 ⊔ V2 is the pointwise maximum (least upper bound)
//!
//! # Implementation
//!
//! Threads are created and retired dynamically, so the clock is a sparse
//! `BTreeMap` rather than a fixed-size array. Absent entries read as zero and
//! zero entries are never stored, which keeps `==` structural. `BTreeMap`
//! keeps iteration (and therefore reports) in thread-id order.

use super::Epoch;
use crate::domain::state::ThreadId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Sparse vector clock
///
/// # Example
///
/// ```text
/// Thread 0: {0: 5, 1: 2}   (T0 is at step 5, last saw T1 at step 2)
/// Thread 1: {0: 4, 1: 7}   (T1 is at step 7, last saw T0 at step 4)
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock {
    entries: BTreeMap<ThreadId, u64>,
}

impl VectorClock {
    /// Create an empty clock (every entry zero)
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a clock holding one entry per epoch
    ///
    /// # Panics
    ///
    /// Panics in debug mode if two epochs name the same thread.
    pub fn from_epochs<I>(epochs: I) -> Self
    where
        I: IntoIterator<Item = Epoch>,
    {
        let mut vc = Self::new();
        for epoch in epochs {
            debug_assert!(
                !vc.entries.contains_key(&epoch.thread),
                "duplicate thread {} in epoch list",
                epoch.thread
            );
            vc.set(epoch.thread, epoch.clock);
        }
        vc
    }

    /// Counter for `thread`, zero if absent
    #[inline]
    pub fn get(&self, thread: ThreadId) -> u64 {
        self.entries.get(&thread).copied().unwrap_or(0)
    }

    /// Overwrite the counter for `thread`
    #[inline]
    pub fn set(&mut self, thread: ThreadId, value: u64) {
        if value == 0 {
            self.entries.remove(&thread);
        } else {
            self.entries.insert(thread, value);
        }
    }

    /// Increment the counter for `thread` and return the new value
    ///
    /// # Example
    ///
    /// ```text
    /// {}       --tick(0)--> {0: 1}
    /// {0: 1}   --tick(0)--> {0: 2}
    /// ```
    #[inline]
    pub fn increment(&mut self, thread: ThreadId) -> u64 {
        let entry = self.entries.entry(thread).or_insert(0);
        *entry += 1;
        *entry
    }

    /// The epoch `self[thread]@thread`
    #[inline]
    pub fn epoch_of(&self, thread: ThreadId) -> Epoch {
        Epoch::new(self.get(thread), thread)
    }

    /// Least upper bound of `self` and `other` as a new clock
    ///
    /// ```text
    /// self:   {0: 3, 1: 1}
    /// other:  {1: 5, 2: 1}
    /// result: {0: 3, 1: 5, 2: 1}
    /// ```
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.join_in(other);
        result
    }

    /// In-place join: `self = self ⊔ other`
    pub fn join_in(&mut self, other: &Self) {
        for (&thread, &value) in &other.entries {
            let entry = self.entries.entry(thread).or_insert(0);
            if value > *entry {
                *entry = value;
            }
        }
    }

    /// `self <= other`
    ///
    /// Only the keys present in `self` are checked; anything absent from
    /// `self` is zero and trivially covered.
    pub fn leq(&self, other: &Self) -> bool {
        self.entries
            .iter()
            .all(|(&thread, &value)| value <= other.get(thread))
    }

    /// First entry of `self` (by thread id) not covered by `other`
    ///
    /// Returns `None` exactly when `self <= other`.
    pub fn first_uncovered(&self, other: &Self) -> Option<Epoch> {
        self.entries
            .iter()
            .find(|(&thread, &value)| value > other.get(thread))
            .map(|(&thread, &value)| Epoch::new(value, thread))
    }

    /// Number of non-zero entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if every entry is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(thread, counter)` pairs in thread-id order
    pub fn iter(&self) -> impl Iterator<Item = (ThreadId, u64)> + '_ {
        self.entries.iter().map(|(&thread, &value)| (thread, value))
    }
}

impl PartialOrd for VectorClock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.leq(other), other.leq(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }

    fn le(&self, other: &Self) -> bool {
        self.leq(other)
    }
}

impl fmt::Debug for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VC{}", self)
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (thread, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", thread.0, value)?;
        }
        write!(f, "}}")
    }
}
