//! Logical Clocks - Epochs and Vector Clocks
//!
//! # Overview
//!
//! The happens-before relation is tracked with two representations:
//!
//! - [`Epoch`]: `c@t`, "the c-th step of thread t". Constant size, used
//!   wherever a single thread's step is enough (last write, exclusive read).
//! - [`VectorClock`]: sparse `ThreadId -> counter` map, used for thread and
//!   lock state and for shared read state.
//!
//! # Ordering
//!
//! ```text
//! c1@t1 <= c2@t2   iff  t1 == t2 && c1 <= c2
//! c@t   <= V       iff  c <= V[t]
//! V1    <= V2      iff  for all t in keys(V1): V1[t] <= V2[t]
//! ```
//!
//! Epochs of different threads are incomparable; `partial_cmp` returns
//! `None` for them instead of failing.

mod epoch;
mod vector_clock;

#[cfg(kani)]
mod proofs;

pub use epoch::Epoch;
pub use vector_clock::VectorClock;
