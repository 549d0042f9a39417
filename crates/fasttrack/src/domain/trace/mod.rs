//! Trace - Recorded Event Streams
//!
//! A trace is the sequence of events an instrumentation layer observed,
//! in an order consistent with each thread's program order. This module
//! defines the event type, the line-oriented text grammar and the replay
//! driver that feeds a trace through a [`Detector`](crate::Detector).
//!
//! # Text Grammar
//!
//! ```text
//! rd    T X            read
//! wr    T X            write
//! range T BASE LEN r|w word-by-word access of [BASE, BASE+LEN)
//! acq   T L            acquire
//! rel   T L            release
//! rem   T L            release-merge
//! rea   T L            release-then-acquire
//! fork  P C            P creates C
//! end   T              T terminates
//! join  P C            unsupported, rejected by the detector
//! free  ADDR SIZE      unsupported, rejected by the detector
//! ```
//!
//! Thread ids are decimal, optionally prefixed with `t`. Locations and locks
//! are addresses (`0x10`, `16`) or names. `#` starts a comment.

mod event;
mod parser;
mod replay;

pub use event::TraceEvent;
pub use parser::{parse_json_line, parse_jsonl, parse_text, parse_text_line, TraceError};
pub use replay::{replay, replay_with, ReplayError, ReplaySummary};
