//! Domain Layer - The FastTrack Model
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Domain Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Clock Module                  State Module                 │
//! │  ├─ Epoch                      ├─ ThreadId / LockId         │
//! │  └─ VectorClock                ├─ Location                  │
//! │                                ├─ ThreadState / LockState   │
//! │                                └─ Shadow / ReadState        │
//! │                                                             │
//! │                     Detector Module                         │
//! │                     ├─ Detector (engine)                    │
//! │                     ├─ DetectorConfig / DetectorBuilder     │
//! │                     └─ Verdict / DataRace / DetectorError   │
//! │                                                             │
//! │  Diagnostics Module            Trace Module                 │
//! │  ├─ OpCounters                 ├─ TraceEvent                │
//! │  ├─ DetectorStats              ├─ text / JSON-lines parser  │
//! │  └─ DetectorSnapshot           └─ replay                    │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dependencies point downward only: clock knows nothing of threads'
//! lifecycles, state knows nothing of the rules, and the detector is the
//! only place the tables are mutated.

pub mod clock;
pub mod detector;
pub mod diagnostics;
pub mod state;
pub mod trace;

pub use clock::{Epoch, VectorClock};
pub use detector::{
    AccessKind, AccessRule, DataRace, Detector, DetectorBuilder, DetectorConfig, DetectorError,
    RaceKind, ReleaseMode, UnsupportedOp, Verdict, DEFAULT_RACE_LOG_LIMIT, WORD_SIZE,
};
pub use diagnostics::{DetectorSnapshot, DetectorStats, OpCounters};
pub use state::{LockId, LockState, Location, ReadState, Shadow, ThreadId, ThreadState};
pub use trace::{ReplayError, ReplaySummary, TraceError, TraceEvent};
