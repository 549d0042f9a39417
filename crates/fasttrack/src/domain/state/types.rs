//! Core Identifier Types
//!
//! Identifiers are opaque to the algorithm: it only hashes and compares them.
//! Locks and locations come from an instrumentation layer either as raw
//! addresses or as symbolic names, so both are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Logical thread identifier
///
/// Ids are never reused: once a thread ends its id is retired for the
/// lifetime of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u64);

impl ThreadId {
    /// The initial thread, registered when a detector is created
    pub const ROOT: Self = Self(0);

    /// Create a new thread identifier
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<u64> for ThreadId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Split a textual token into an address (`0x1f`, `31`) or a symbolic name
fn parse_address(token: &str) -> Option<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Wire form of a lock or location: a JSON number or a token string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Addr(u64),
    Text(String),
}

impl RawToken {
    fn resolve<T: From<u64> + From<String>>(self) -> T {
        match self {
            Self::Addr(addr) => addr.into(),
            Self::Text(token) => token.into(),
        }
    }
}

/// Lock identifier
///
/// Addresses display in normalized hex form (`0x1f`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum LockId {
    /// Address of the lock object
    Addr(u64),
    /// Symbolic lock name
    Named(String),
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(addr) => write!(f, "{:#x}", addr),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for LockId {
    fn from(addr: u64) -> Self {
        Self::Addr(addr)
    }
}

impl From<&str> for LockId {
    fn from(token: &str) -> Self {
        parse_address(token).map_or_else(|| Self::Named(token.to_owned()), Self::Addr)
    }
}

impl From<String> for LockId {
    fn from(token: String) -> Self {
        match parse_address(&token) {
            Some(addr) => Self::Addr(addr),
            None => Self::Named(token),
        }
    }
}

impl<'de> Deserialize<'de> for LockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawToken::deserialize(deserializer).map(RawToken::resolve)
    }
}

impl FromStr for LockId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

/// Monitored memory location
///
/// Addresses display in normalized hex form (`0x1f`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Location {
    /// Word address
    Addr(u64),
    /// Symbolic variable name
    Named(String),
}

impl Location {
    /// The word address, if this location is one
    pub fn as_addr(&self) -> Option<u64> {
        match self {
            Self::Addr(addr) => Some(*addr),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(addr) => write!(f, "{:#x}", addr),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Location {
    fn from(addr: u64) -> Self {
        Self::Addr(addr)
    }
}

impl From<&str> for Location {
    fn from(token: &str) -> Self {
        parse_address(token).map_or_else(|| Self::Named(token.to_owned()), Self::Addr)
    }
}

impl From<String> for Location {
    fn from(token: String) -> Self {
        match parse_address(&token) {
            Some(addr) => Self::Addr(addr),
            None => Self::Named(token),
        }
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawToken::deserialize(deserializer).map(RawToken::resolve)
    }
}

impl FromStr for Location {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}
