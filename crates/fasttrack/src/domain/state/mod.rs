//! Detector State - Threads, Locks and Shadow Memory
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────────────┐
//! │ ThreadState  │   │ LockState    │   │ Shadow (per location)     │
//! ├──────────────┤   ├──────────────┤   ├───────────────────────────┤
//! │ id           │   │ id           │   │ write: Epoch              │
//! │ clock: VC    │   │ clock: VC    │   │ read:  Exclusive(Epoch)   │
//! │ epoch()      │   │              │   │      | Shared(VC)         │
//! └──────────────┘   └──────────────┘   └───────────────────────────┘
//! ```
//!
//! All three tables are owned by one [`Detector`](crate::domain::detector::Detector);
//! nothing here is shared or global.

pub mod types;
pub mod thread;
pub mod lock;
pub mod shadow;

pub use types::{LockId, Location, ThreadId};
pub use thread::ThreadState;
pub use lock::LockState;
pub use shadow::{ReadState, Shadow};
