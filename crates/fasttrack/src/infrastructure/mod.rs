//! Infrastructure Layer - File Formats and I/O
//!
//! # Responsibilities
//! - Reading recorded traces from disk (text or JSON lines)
//! - Streaming large traces without loading them whole

pub mod trace_file;

pub use trace_file::{read_trace, TraceFormat, TraceReader};
