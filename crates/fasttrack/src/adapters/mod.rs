//! Adapters Layer - Connecting Producers to the Detector
//!
//! Instrumented programs report events from many threads at once; the
//! detector itself is single-owner. Adapters bridge the two.

pub mod shared;

pub use shared::SharedDetector;
