//! Deterministic State Snapshots and the Text Report

use super::{DetectorStats, OpCounters};
use crate::domain::clock::VectorClock;
use crate::domain::detector::Detector;
use crate::domain::state::{LockId, Location, Shadow, ThreadId};
use serde::Serialize;
use std::fmt;

/// A live thread and its clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadEntry {
    pub id: ThreadId,
    pub clock: VectorClock,
}

/// A lock and its clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockEntry {
    pub id: LockId,
    pub clock: VectorClock,
}

/// A monitored location and its shadow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableEntry {
    pub location: Location,
    pub shadow: Shadow,
}

/// Full detector state, every table sorted by key
///
/// Two detectors fed the same events produce equal snapshots regardless of
/// hash-map iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorSnapshot {
    pub threads: Vec<ThreadEntry>,
    pub retired: Vec<ThreadId>,
    pub locks: Vec<LockEntry>,
    pub variables: Vec<VariableEntry>,
    pub ops: OpCounters,
    pub stats: DetectorStats,
}

impl DetectorSnapshot {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One line per live thread, variable and lock, in that order
impl fmt::Display for DetectorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.threads {
            writeln!(f, "thread[{}]: {}", entry.id.0, entry.clock)?;
        }
        for entry in &self.variables {
            writeln!(f, "var[{}]: {}", entry.location, entry.shadow)?;
        }
        for entry in &self.locks {
            writeln!(f, "lock[{}]: {}", entry.id, entry.clock)?;
        }
        Ok(())
    }
}

impl Detector {
    /// Capture the full state
    pub fn snapshot(&self) -> DetectorSnapshot {
        let mut threads: Vec<_> = self
            .live_threads()
            .map(|t| ThreadEntry {
                id: t.id(),
                clock: t.clock().clone(),
            })
            .collect();
        threads.sort_by_key(|entry| entry.id);

        let mut retired: Vec<_> = self.retired_threads().collect();
        retired.sort();

        let mut locks: Vec<_> = self
            .locks()
            .map(|l| LockEntry {
                id: l.id().clone(),
                clock: l.clock().clone(),
            })
            .collect();
        locks.sort_by(|a, b| a.id.cmp(&b.id));

        let mut variables: Vec<_> = self
            .shadows()
            .map(|(location, shadow)| VariableEntry {
                location: location.clone(),
                shadow: shadow.clone(),
            })
            .collect();
        variables.sort_by(|a, b| a.location.cmp(&b.location));

        DetectorSnapshot {
            threads,
            retired,
            locks,
            variables,
            ops: *self.ops(),
            stats: self.stats(),
        }
    }

    /// Human-readable listing of threads, variables and locks
    ///
    /// ```text
    /// thread[0]: {0: 3}
    /// var[0x10]: 2@0 0@0
    /// lock[m]: {0: 2}
    /// ```
    pub fn report(&self) -> String {
        self.snapshot().to_string()
    }
}
