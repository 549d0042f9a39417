//! Trace Replay

use super::TraceEvent;
use crate::domain::detector::{DataRace, Detector, DetectorError};
use crate::domain::diagnostics::DetectorStats;
use thiserror::Error;
use tracing::debug;

/// Result of replaying a trace to completion
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    /// Events applied
    pub events: usize,
    /// Races found, in detection order
    pub races: Vec<DataRace>,
    /// Detector statistics after the last event
    pub stats: DetectorStats,
}

impl ReplaySummary {
    #[inline]
    pub fn is_race_free(&self) -> bool {
        self.races.is_empty()
    }
}

/// The detector rejected an event; replay stopped there
#[derive(Debug, Error)]
#[error("event {index} ({event}): {source}")]
pub struct ReplayError {
    /// 0-based position of the rejected event
    pub index: usize,
    pub event: TraceEvent,
    #[source]
    pub source: DetectorError,
    /// Races found before the rejected event
    pub races: Vec<DataRace>,
}

/// Replay `events` in order
pub fn replay<'a, I>(detector: &mut Detector, events: I) -> Result<ReplaySummary, ReplayError>
where
    I: IntoIterator<Item = &'a TraceEvent>,
{
    replay_with(detector, events, |_, _| {})
}

/// Replay `events` in order, calling `on_race(index, race)` as races appear
pub fn replay_with<'a, I, F>(
    detector: &mut Detector,
    events: I,
    mut on_race: F,
) -> Result<ReplaySummary, ReplayError>
where
    I: IntoIterator<Item = &'a TraceEvent>,
    F: FnMut(usize, &DataRace),
{
    let mut races = Vec::new();
    let mut applied = 0;

    for (index, event) in events.into_iter().enumerate() {
        match event.apply(detector) {
            Ok(found) => {
                for race in found {
                    on_race(index, &race);
                    races.push(race);
                }
            }
            Err(source) => {
                return Err(ReplayError {
                    index,
                    event: event.clone(),
                    source,
                    races,
                })
            }
        }
        applied += 1;
    }

    debug!(events = applied, races = races.len(), "replay finished");
    Ok(ReplaySummary {
        events: applied,
        races,
        stats: detector.stats(),
    })
}
