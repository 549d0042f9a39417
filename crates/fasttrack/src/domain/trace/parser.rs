//! Trace Parsing (text lines and JSON lines)

use super::TraceEvent;
use crate::domain::detector::{AccessKind, ReleaseMode};
use crate::domain::state::{LockId, Location, ThreadId};
use thiserror::Error;

/// Malformed trace input
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: unknown operation '{op}'")]
    UnknownOp { line: usize, op: String },

    #[error("line {line}: '{op}' takes {expected} operands, found {found}")]
    Arity {
        line: usize,
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {what} '{token}'")]
    InvalidToken {
        line: usize,
        what: &'static str,
        token: String,
    },

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: read failed: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// 1-based line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownOp { line, .. }
            | Self::Arity { line, .. }
            | Self::InvalidToken { line, .. }
            | Self::Json { line, .. }
            | Self::Read { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Parse one text line; `Ok(None)` for blank and comment-only lines
pub fn parse_text_line(line_no: usize, line: &str) -> Result<Option<TraceEvent>, TraceError> {
    let content = line.split('#').next().unwrap_or_default();
    let mut tokens = content.split_whitespace();
    let Some(op) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let arity = |expected: usize| -> Result<(), TraceError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(TraceError::Arity {
                line: line_no,
                op: op.to_string(),
                expected,
                found: args.len(),
            })
        }
    };

    let event = match op {
        "rd" | "wr" => {
            arity(2)?;
            let thread = thread_id(line_no, args[0])?;
            let location = location(args[1]);
            if op == "rd" {
                TraceEvent::Read { thread, location }
            } else {
                TraceEvent::Write { thread, location }
            }
        }
        "range" => {
            arity(4)?;
            TraceEvent::Range {
                thread: thread_id(line_no, args[0])?,
                base: number(line_no, "base address", args[1])?,
                len: number(line_no, "length", args[2])?,
                kind: args[3].parse::<AccessKind>().map_err(|_| TraceError::InvalidToken {
                    line: line_no,
                    what: "access kind",
                    token: args[3].to_string(),
                })?,
            }
        }
        "acq" => {
            arity(2)?;
            TraceEvent::Acquire {
                thread: thread_id(line_no, args[0])?,
                lock: lock_id(args[1]),
            }
        }
        "rel" | "rem" | "rea" => {
            arity(2)?;
            let mode = op.parse::<ReleaseMode>().map_err(|_| TraceError::UnknownOp {
                line: line_no,
                op: op.to_string(),
            })?;
            TraceEvent::Release {
                thread: thread_id(line_no, args[0])?,
                lock: lock_id(args[1]),
                mode,
            }
        }
        "fork" | "join" => {
            arity(2)?;
            let parent = thread_id(line_no, args[0])?;
            let child = thread_id(line_no, args[1])?;
            if op == "fork" {
                TraceEvent::Fork { parent, child }
            } else {
                TraceEvent::Join { parent, child }
            }
        }
        "end" => {
            arity(1)?;
            TraceEvent::End {
                thread: thread_id(line_no, args[0])?,
            }
        }
        "free" => {
            arity(2)?;
            TraceEvent::Free {
                addr: number(line_no, "address", args[0])?,
                size: number(line_no, "size", args[1])?,
            }
        }
        other => {
            return Err(TraceError::UnknownOp {
                line: line_no,
                op: other.to_string(),
            })
        }
    };

    Ok(Some(event))
}

/// Parse a whole text trace
pub fn parse_text(input: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if let Some(event) = parse_text_line(index + 1, line)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Parse one JSON line; `Ok(None)` for blank lines
pub fn parse_json_line(line_no: usize, line: &str) -> Result<Option<TraceEvent>, TraceError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| TraceError::Json {
            line: line_no,
            source,
        })
}

/// Parse a whole JSON-lines trace
pub fn parse_jsonl(input: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if let Some(event) = parse_json_line(index + 1, line)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn thread_id(line: usize, token: &str) -> Result<ThreadId, TraceError> {
    token
        .strip_prefix('t')
        .unwrap_or(token)
        .parse::<u64>()
        .map(ThreadId)
        .map_err(|_| TraceError::InvalidToken {
            line,
            what: "thread id",
            token: token.to_string(),
        })
}

fn number(line: usize, what: &'static str, token: &str) -> Result<u64, TraceError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.map_err(|_| TraceError::InvalidToken {
        line,
        what,
        token: token.to_string(),
    })
}

fn location(token: &str) -> Location {
    token.parse().unwrap_or_else(|never| match never {})
}

fn lock_id(token: &str) -> LockId {
    token.parse().unwrap_or_else(|never| match never {})
}
