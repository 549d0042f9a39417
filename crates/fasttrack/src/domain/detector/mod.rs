//! Detector - The FastTrack Analysis Engine
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Detector                            │
//! │                                                              │
//! │  threads:  ThreadId ──▶ ThreadState   (live only)            │
//! │  retired:  {ThreadId}                 (ended, never reused)  │
//! │  locks:    LockId   ──▶ LockState     (created on first use) │
//! │  shadows:  Location ──▶ Shadow        (created on first use) │
//! │                                                              │
//! │  read / write ──▶ rules::check_* ──▶ Verdict                 │
//! │  acquire / release / fork / end ──▶ clock bookkeeping        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The detector is a plain single-owner state machine; every operation
//! takes `&mut self`. Share it between threads through
//! [`SharedDetector`](crate::adapters::SharedDetector), which serializes
//! whole operations behind one lock.
//!
//! # Example
//!
//! ```rust
//! use fasttrack::{Detector, RaceKind, ThreadId};
//!
//! let mut detector = Detector::new();
//! let (t0, t1) = (ThreadId(0), ThreadId(1));
//!
//! detector.fork(t0, t1).unwrap();
//! assert!(!detector.write(t0, 0x10_u64).unwrap().is_race());
//!
//! let verdict = detector.write(t1, 0x10_u64).unwrap();
//! assert_eq!(verdict.race().unwrap().kind, RaceKind::WriteAfterWrite);
//! ```

mod config;
mod error;
mod race;
mod rules;
mod types;

pub use config::{DetectorBuilder, DetectorConfig, DEFAULT_RACE_LOG_LIMIT};
pub use error::{DetectorError, UnsupportedOp};
pub use race::{DataRace, RaceKind};
pub use types::{AccessKind, AccessRule, ReleaseMode, Verdict};

use crate::domain::clock::VectorClock;
use crate::domain::diagnostics::OpCounters;
use crate::domain::state::{LockId, LockState, Location, Shadow, ThreadId, ThreadState};
use rules::Conflict;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// Granularity of range accesses, in bytes
pub const WORD_SIZE: u64 = 8;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Detector
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// FastTrack dynamic race detector
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
    threads: HashMap<ThreadId, ThreadState>,
    retired: HashSet<ThreadId>,
    locks: HashMap<LockId, LockState>,
    shadows: HashMap<Location, Shadow>,
    ops: OpCounters,
    races: Vec<DataRace>,
    race_count: u64,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Detector with the root thread registered and default configuration
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Detector with the root thread registered
    pub fn with_config(config: DetectorConfig) -> Self {
        let mut threads = HashMap::new();
        threads.insert(ThreadId::ROOT, ThreadState::new(ThreadId::ROOT));
        Self {
            config,
            threads,
            retired: HashSet::new(),
            locks: HashMap::new(),
            shadows: HashMap::new(),
            ops: OpCounters::default(),
            races: Vec::new(),
            race_count: 0,
        }
    }

    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::new()
    }

    #[inline(always)]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Thread lifecycle
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Register a thread with no creation edge
    ///
    /// Used for threads whose creation the trace does not show. The new
    /// thread's clock holds only its own first step.
    pub fn register(&mut self, id: ThreadId) -> Result<(), DetectorError> {
        self.ensure_fresh(id)?;
        self.threads.insert(id, ThreadState::new(id));
        if self.config.log_events {
            debug!(thread = %id, "register");
        }
        Ok(())
    }

    /// `parent` creates `child`
    ///
    /// The child starts with everything the parent has observed plus its own
    /// first step; the parent then advances, so nothing it does afterwards
    /// is ordered before the child.
    pub fn fork(&mut self, parent: ThreadId, child: ThreadId) -> Result<(), DetectorError> {
        self.ensure_fresh(child)?;
        let parent_state = live_mut(&mut self.threads, &self.retired, parent)?;

        let mut child_state = ThreadState::new(child);
        child_state.absorb(parent_state.clock());
        parent_state.tick();

        if self.config.log_events {
            debug!(parent = %parent, child = %child, "fork");
        }
        self.threads.insert(child, child_state);
        Ok(())
    }

    /// Thread `id` terminates; its id is retired for good
    pub fn end(&mut self, id: ThreadId) -> Result<(), DetectorError> {
        live(&self.threads, &self.retired, id)?;
        self.threads.remove(&id);
        self.retired.insert(id);
        if self.config.log_events {
            debug!(thread = %id, "end");
        }
        Ok(())
    }

    /// Thread join is not modelled and always fails
    pub fn join(&mut self, parent: ThreadId, child: ThreadId) -> Result<(), DetectorError> {
        Err(rejected(DetectorError::Unsupported(UnsupportedOp::Join { parent, child })))
    }

    /// Memory release is not modelled and always fails
    pub fn free(&mut self, addr: u64, size: u64) -> Result<(), DetectorError> {
        Err(rejected(DetectorError::Unsupported(UnsupportedOp::Free { addr, size })))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Synchronization
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Thread `t` acquires `lock`: it now observes every prior release
    pub fn acquire(&mut self, t: ThreadId, lock: impl Into<LockId>) -> Result<(), DetectorError> {
        let lock = lock.into();
        let thread = live_mut(&mut self.threads, &self.retired, t)?;
        let state = self
            .locks
            .entry(lock)
            .or_insert_with_key(|id| LockState::new(id.clone()));

        thread.absorb(state.clock());

        if self.config.log_events {
            debug!(thread = %t, lock = %state.id(), "acq");
        }
        self.ops.record_acquire();
        self.after_counted_op();
        Ok(())
    }

    /// Thread `t` releases `lock` in the given mode, then advances
    pub fn release(
        &mut self,
        t: ThreadId,
        lock: impl Into<LockId>,
        mode: ReleaseMode,
    ) -> Result<(), DetectorError> {
        let lock = lock.into();
        let thread = live_mut(&mut self.threads, &self.retired, t)?;
        let log_unpaired = self.config.log_unpaired_release;
        let state = self.locks.entry(lock).or_insert_with_key(|id| {
            if log_unpaired {
                info!(thread = %t, lock = %id, "release of a lock never acquired");
            }
            LockState::new(id.clone())
        });

        match mode {
            ReleaseMode::Release => state.set_clock(thread.clock().clone()),
            ReleaseMode::ReleaseMerge => state.merge(thread.clock()),
            ReleaseMode::ReleaseAcquire => {
                let joined = thread.clock().join(state.clock());
                let released = thread.replace_clock(joined);
                state.set_clock(released);
            }
        }
        thread.tick();

        if self.config.log_events {
            debug!(thread = %t, lock = %state.id(), mode = %mode, "release");
        }
        self.ops.record_release(mode);
        self.after_counted_op();
        Ok(())
    }

    /// Plain release (`rel`)
    pub fn rel(&mut self, t: ThreadId, lock: impl Into<LockId>) -> Result<(), DetectorError> {
        self.release(t, lock, ReleaseMode::Release)
    }

    /// Release-merge (`rem`)
    pub fn rem(&mut self, t: ThreadId, lock: impl Into<LockId>) -> Result<(), DetectorError> {
        self.release(t, lock, ReleaseMode::ReleaseMerge)
    }

    /// Release-then-acquire (`rea`)
    pub fn rea(&mut self, t: ThreadId, lock: impl Into<LockId>) -> Result<(), DetectorError> {
        self.release(t, lock, ReleaseMode::ReleaseAcquire)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Memory accesses
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Thread `t` reads `location`
    pub fn read(&mut self, t: ThreadId, location: impl Into<Location>) -> Result<Verdict, DetectorError> {
        self.access(t, location, AccessKind::Read)
    }

    /// Thread `t` writes `location`
    pub fn write(&mut self, t: ThreadId, location: impl Into<Location>) -> Result<Verdict, DetectorError> {
        self.access(t, location, AccessKind::Write)
    }

    /// Thread `t` accesses `location`
    ///
    /// A race is a successful outcome ([`Verdict::Race`]); the shadow is not
    /// updated in that case. `Err` is reserved for misuse such as an unknown
    /// thread.
    pub fn access(
        &mut self,
        t: ThreadId,
        location: impl Into<Location>,
        kind: AccessKind,
    ) -> Result<Verdict, DetectorError> {
        self.access_word(t, location.into(), kind)
    }

    /// Access every word of `[base, base + len)`
    ///
    /// Words sit at `base`, `base + 8`, ... below `base + len`; a trailing
    /// partial word counts as a word. Each word is one counted access.
    /// Returns the races found, in address order.
    pub fn range_access(
        &mut self,
        t: ThreadId,
        base: u64,
        len: u64,
        kind: AccessKind,
    ) -> Result<Vec<DataRace>, DetectorError> {
        live(&self.threads, &self.retired, t)?;
        if len == 0 {
            return Ok(Vec::new());
        }
        let last = base
            .checked_add(len - 1)
            .ok_or_else(|| rejected(DetectorError::RangeOverflow { base, len }))?;

        let mut races = Vec::new();
        for addr in (base..=last).step_by(WORD_SIZE as usize) {
            if let Verdict::Race(race) = self.access_word(t, Location::Addr(addr), kind)? {
                races.push(race);
            }
        }
        Ok(races)
    }

    fn access_word(
        &mut self,
        t: ThreadId,
        location: Location,
        kind: AccessKind,
    ) -> Result<Verdict, DetectorError> {
        let thread = live(&self.threads, &self.retired, t)?;
        let shadow = self.shadows.entry(location.clone()).or_default();

        let outcome = match kind {
            AccessKind::Read => rules::check_read(shadow, thread),
            AccessKind::Write => rules::check_write(shadow, thread),
        };

        if self.config.log_events {
            debug!(thread = %t, location = %location, access = %kind, "access");
        }

        let verdict = match outcome {
            Ok(rule) => Verdict::Ordered(rule),
            Err(Conflict { kind: race_kind, prior }) => {
                let race = DataRace {
                    kind: race_kind,
                    thread: t,
                    location,
                    conflicting: prior,
                    thread_clock: thread.clock().clone(),
                    shadow: shadow.clone(),
                };
                self.record_race(&race);
                Verdict::Race(race)
            }
        };

        self.ops.record_access(kind);
        self.after_counted_op();
        Ok(verdict)
    }

    fn record_race(&mut self, race: &DataRace) {
        self.race_count += 1;
        if self.config.log_races {
            warn!(
                kind = %race.kind,
                thread = %race.thread,
                location = %race.location,
                conflicting = %race.conflicting,
                "data race detected"
            );
        }
        if self
            .config
            .race_log_limit
            .map_or(true, |limit| self.races.len() < limit)
        {
            self.races.push(race.clone());
        }
    }

    fn after_counted_op(&self) {
        if let Some(interval) = self.config.stats_interval {
            if interval > 0 && self.ops.total() % interval == 0 {
                info!("{}", self.stats());
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Introspection
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// State of a live thread
    pub fn thread(&self, id: ThreadId) -> Option<&ThreadState> {
        self.threads.get(&id)
    }

    /// Clock of a live thread
    pub fn thread_clock(&self, id: ThreadId) -> Option<&VectorClock> {
        self.threads.get(&id).map(ThreadState::clock)
    }

    /// State of a lock seen at least once
    pub fn lock(&self, id: &LockId) -> Option<&LockState> {
        self.locks.get(id)
    }

    /// Clock of a lock seen at least once
    pub fn lock_clock(&self, id: &LockId) -> Option<&VectorClock> {
        self.locks.get(id).map(LockState::clock)
    }

    /// Shadow of a location accessed at least once
    pub fn shadow(&self, location: &Location) -> Option<&Shadow> {
        self.shadows.get(location)
    }

    #[inline]
    pub fn is_live(&self, id: ThreadId) -> bool {
        self.threads.contains_key(&id)
    }

    #[inline]
    pub fn is_retired(&self, id: ThreadId) -> bool {
        self.retired.contains(&id)
    }

    pub fn live_threads(&self) -> impl Iterator<Item = &ThreadState> {
        self.threads.values()
    }

    pub fn retired_threads(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.retired.iter().copied()
    }

    pub fn locks(&self) -> impl Iterator<Item = &LockState> {
        self.locks.values()
    }

    pub fn shadows(&self) -> impl Iterator<Item = (&Location, &Shadow)> {
        self.shadows.iter()
    }

    /// Retained race reports, oldest first, up to `race_log_limit`
    pub fn races(&self) -> &[DataRace] {
        &self.races
    }

    /// Number of races detected, retained or not
    #[inline]
    pub fn race_count(&self) -> u64 {
        self.race_count
    }

    /// Operation counters
    #[inline]
    pub fn ops(&self) -> &OpCounters {
        &self.ops
    }

    /// Drop retained race reports, keeping the count
    pub fn clear_races(&mut self) -> Vec<DataRace> {
        std::mem::take(&mut self.races)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Validation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `id` may become a new thread: neither live nor retired
    fn ensure_fresh(&self, id: ThreadId) -> Result<(), DetectorError> {
        if self.threads.contains_key(&id) {
            return Err(rejected(DetectorError::ThreadAlreadyLive(id)));
        }
        if self.retired.contains(&id) {
            return Err(rejected(DetectorError::ThreadRetired(id)));
        }
        Ok(())
    }
}

fn live<'a>(
    threads: &'a HashMap<ThreadId, ThreadState>,
    retired: &HashSet<ThreadId>,
    id: ThreadId,
) -> Result<&'a ThreadState, DetectorError> {
    threads.get(&id).ok_or_else(|| not_live(retired, id))
}

fn live_mut<'a>(
    threads: &'a mut HashMap<ThreadId, ThreadState>,
    retired: &HashSet<ThreadId>,
    id: ThreadId,
) -> Result<&'a mut ThreadState, DetectorError> {
    threads.get_mut(&id).ok_or_else(|| not_live(retired, id))
}

fn not_live(retired: &HashSet<ThreadId>, id: ThreadId) -> DetectorError {
    if retired.contains(&id) {
        rejected(DetectorError::ThreadRetired(id))
    } else {
        rejected(DetectorError::UnknownThread(id))
    }
}

fn rejected(err: DetectorError) -> DetectorError {
    error!(%err, "operation rejected");
    err
}
