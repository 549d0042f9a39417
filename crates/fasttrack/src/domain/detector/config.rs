//! Detector Configuration and Builder

use super::Detector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Race reports retained by a default-configured detector
pub const DEFAULT_RACE_LOG_LIMIT: usize = 1024;

/// Detector configuration
///
/// Only observability knobs live here; the detection algorithm itself has
/// no tunables. Missing JSON fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Emit a `debug` event for every operation
    pub log_events: bool,
    /// Emit a `warn` event for every race
    pub log_races: bool,
    /// Emit an `info` event when a lock is released without a prior acquire
    pub log_unpaired_release: bool,
    /// Emit an `info` statistics line every N counted operations
    pub stats_interval: Option<u64>,
    /// Race reports kept in memory (see [`Detector::races`]); `None` keeps
    /// all of them. Races past the limit are still counted.
    pub race_log_limit: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            log_events: false,
            log_races: true,
            log_unpaired_release: false,
            stats_interval: None,
            race_log_limit: Some(DEFAULT_RACE_LOG_LIMIT),
        }
    }
}

impl DetectorConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(std::io::Error::from)
    }
}

/// Builder for [`Detector`]
///
/// # Example
///
/// ```rust
/// use fasttrack::DetectorBuilder;
///
/// let detector = DetectorBuilder::new()
///     .log_races(false)
///     .stats_interval(10_000)
///     .build();
/// assert_eq!(detector.config().stats_interval, Some(10_000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: DetectorConfig,
}

impl DetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn log_events(mut self, enabled: bool) -> Self {
        self.config.log_events = enabled;
        self
    }

    pub fn log_races(mut self, enabled: bool) -> Self {
        self.config.log_races = enabled;
        self
    }

    pub fn log_unpaired_release(mut self, enabled: bool) -> Self {
        self.config.log_unpaired_release = enabled;
        self
    }

    /// Log statistics every `interval` operations (0 disables)
    pub fn stats_interval(mut self, interval: u64) -> Self {
        self.config.stats_interval = (interval > 0).then_some(interval);
        self
    }

    /// Retain at most `limit` race reports (`None` for no limit)
    pub fn race_log_limit(mut self, limit: Option<usize>) -> Self {
        self.config.race_log_limit = limit;
        self
    }

    pub fn build(self) -> Detector {
        Detector::with_config(self.config)
    }
}
