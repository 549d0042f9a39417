//! Detector Vocabulary - Access Kinds, Release Modes, Verdicts

use super::race::DataRace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// Load
    Read,
    /// Store
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

impl FromStr for AccessKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "rd" | "read" | "0" => Ok(Self::Read),
            "w" | "wr" | "write" | "1" => Ok(Self::Write),
            other => Err(format!("unknown access kind '{other}'")),
        }
    }
}

/// How a release publishes the releasing thread's clock into the lock
///
/// ```text
/// Release         (T, L) => (T,     T    )
/// ReleaseMerge    (T, L) => (T,     T ⊔ L)
/// ReleaseAcquire  (T, L) => (T ⊔ L, T    )
/// ```
///
/// Every mode ends with the releasing thread advancing its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseMode {
    /// Plain release (`rel`): the lock remembers exactly the thread's clock
    Release,
    /// Release-merge (`rem`): the lock keeps earlier releasers' contributions
    ReleaseMerge,
    /// Atomic release-then-acquire (`rea`), e.g. a condition-variable wait
    ReleaseAcquire,
}

impl ReleaseMode {
    /// Short trace mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Release => "rel",
            Self::ReleaseMerge => "rem",
            Self::ReleaseAcquire => "rea",
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for ReleaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rel" | "release" => Ok(Self::Release),
            "rem" | "release_merge" => Ok(Self::ReleaseMerge),
            "rea" | "release_acquire" => Ok(Self::ReleaseAcquire),
            other => Err(format!("unknown release mode '{other}'")),
        }
    }
}

/// FastTrack rule that admitted an access without a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// Read by the epoch that already holds the exclusive read slot
    ReadSameEpoch,
    /// Read recorded into an already shared read clock
    ReadShared,
    /// Read ordered after the previous reader; read slot stays exclusive
    ReadExclusive,
    /// Read concurrent with the previous reader; read slot becomes shared
    ReadShare,
    /// Write by the epoch that already holds the write slot
    WriteSameEpoch,
    /// Write ordered after the last write and the exclusive reader
    WriteExclusive,
    /// Write ordered after the last write and every shared reader
    WriteShared,
}

impl AccessRule {
    /// Kind of access this rule applies to
    pub const fn access(self) -> AccessKind {
        match self {
            Self::ReadSameEpoch | Self::ReadShared | Self::ReadExclusive | Self::ReadShare => {
                AccessKind::Read
            }
            Self::WriteSameEpoch | Self::WriteExclusive | Self::WriteShared => AccessKind::Write,
        }
    }
}

/// Outcome of a single access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The access is ordered after every conflicting prior access
    Ordered(AccessRule),
    /// The access races with a prior access
    Race(DataRace),
}

impl Verdict {
    /// `true` if a race was reported
    #[inline]
    pub fn is_race(&self) -> bool {
        matches!(self, Self::Race(_))
    }

    /// The rule that admitted the access, if it was ordered
    pub fn rule(&self) -> Option<AccessRule> {
        match self {
            Self::Ordered(rule) => Some(*rule),
            Self::Race(_) => None,
        }
    }

    /// The race report, if any
    pub fn race(&self) -> Option<&DataRace> {
        match self {
            Self::Ordered(_) => None,
            Self::Race(race) => Some(race),
        }
    }

    /// Consume into the race report, if any
    pub fn into_race(self) -> Option<DataRace> {
        match self {
            Self::Ordered(_) => None,
            Self::Race(race) => Some(race),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_mode_parse() {
        assert_eq!("rel".parse::<ReleaseMode>(), Ok(ReleaseMode::Release));
        assert_eq!("rem".parse::<ReleaseMode>(), Ok(ReleaseMode::ReleaseMerge));
        assert_eq!("rea".parse::<ReleaseMode>(), Ok(ReleaseMode::ReleaseAcquire));
        assert!("acq".parse::<ReleaseMode>().is_err());
        assert_eq!(ReleaseMode::ReleaseMerge.to_string(), "rem");
    }

    #[test]
    fn test_access_kind_parse() {
        assert_eq!("r".parse::<AccessKind>(), Ok(AccessKind::Read));
        assert_eq!("1".parse::<AccessKind>(), Ok(AccessKind::Write));
        assert!("x".parse::<AccessKind>().is_err());
    }

    #[test]
    fn test_rule_access_kind() {
        assert_eq!(AccessRule::ReadShare.access(), AccessKind::Read);
        assert_eq!(AccessRule::WriteShared.access(), AccessKind::Write);
    }

    #[test]
    fn test_verdict_accessors() {
        let v = Verdict::Ordered(AccessRule::WriteExclusive);
        assert!(!v.is_race());
        assert_eq!(v.rule(), Some(AccessRule::WriteExclusive));
        assert!(v.race().is_none());
        assert!(v.into_race().is_none());
    }
}
