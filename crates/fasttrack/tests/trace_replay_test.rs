//! Trace File Replay Tests
//!
//! Traces are written to temporary files, read back through the
//! infrastructure layer and replayed through a fresh detector.

use fasttrack::{
    read_trace, replay, replay_with, Detector, DetectorConfig, DetectorError, RaceKind,
    ThreadId, TraceError, TraceEvent, TraceFormat, TraceReader, UnsupportedOp,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn quiet() -> Detector {
    Detector::builder().log_races(false).build()
}

const PRODUCER_CONSUMER: &str = "\
# producer / consumer over a mutex, then an unguarded flag
fork 0 1
fork 0 2

acq 1 0x7f00
wr  1 0x1000
rel 1 0x7f00

acq 2 0x7f00
rd  2 0x1000
rel 2 0x7f00

wr  1 done      # unguarded
rd  2 done
";

#[test]
fn test_text_trace_replay() {
    let file = trace_file(PRODUCER_CONSUMER);
    let events = read_trace(file.path(), TraceFormat::Text).unwrap();
    assert_eq!(events.len(), 10);

    let mut detector = quiet();
    let summary = replay(&mut detector, &events).unwrap();
    assert_eq!(summary.events, 10);
    assert_eq!(summary.races.len(), 1);

    let race = &summary.races[0];
    assert_eq!(race.kind, RaceKind::ReadAfterWrite);
    assert_eq!(race.location.to_string(), "done");
    assert_eq!(race.conflicting_thread().0, 1);
    assert_eq!(summary.stats.ops, 8);
}

#[test]
fn test_jsonl_trace_matches_text_trace() {
    let text = read_trace(trace_file(PRODUCER_CONSUMER).path(), TraceFormat::Text).unwrap();

    let jsonl: String = text
        .iter()
        .map(|event| serde_json::to_string(event).unwrap() + "\n")
        .collect();
    let file = trace_file(&jsonl);
    let from_json = read_trace(file.path(), TraceFormat::JsonLines).unwrap();
    assert_eq!(from_json, text);

    let mut a = quiet();
    let mut b = quiet();
    replay(&mut a, &text).unwrap();
    replay(&mut b, &from_json).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_hex_string_location_in_jsonl_matches_text() {
    let text = read_trace(
        trace_file("fork 0 1\nwr 0 0x10\nacq 1 0x7f00\nwr 1 16\n").path(),
        TraceFormat::Text,
    )
    .unwrap();
    let file = trace_file(concat!(
        r#"{"op":"fork","parent":0,"child":1}"#, "\n",
        r#"{"op":"wr","thread":0,"location":"0x10"}"#, "\n",
        r#"{"op":"acq","thread":1,"lock":32512}"#, "\n",
        r#"{"op":"wr","thread":1,"location":16}"#, "\n",
    ));
    let from_json = read_trace(file.path(), TraceFormat::JsonLines).unwrap();
    assert_eq!(from_json, text);

    let mut a = quiet();
    let mut b = quiet();
    let text_summary = replay(&mut a, &text).unwrap();
    let json_summary = replay(&mut b, &from_json).unwrap();
    assert_eq!(text_summary.races.len(), 1);
    assert_eq!(json_summary.races, text_summary.races);
    assert_eq!(b.shadows().count(), 1);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_streaming_reader_replay() {
    let file = trace_file("fork 0 1\nrange 0 0x0 64 w\nrange 1 0x20 64 r\n");
    let mut detector = quiet();
    let mut races = 0;
    for event in TraceReader::open(file.path(), TraceFormat::Text).unwrap() {
        races += event.unwrap().apply(&mut detector).unwrap().len();
    }
    // words 0x20..0x40 were written by t0 after the fork
    assert_eq!(races, 4);
    assert_eq!(detector.ops().write, 8);
    assert_eq!(detector.ops().read, 8);
}

#[test]
fn test_replay_reports_failing_event() {
    let file = trace_file("fork 0 1\nwr 1 x\nend 1\nwr 1 x\nwr 0 y\n");
    let events = read_trace(file.path(), TraceFormat::Text).unwrap();

    let mut detector = quiet();
    let err = replay(&mut detector, &events).unwrap_err();
    assert_eq!(err.index, 3);
    assert_eq!(err.source, DetectorError::ThreadRetired(ThreadId(1)));
    assert_eq!(err.event, events[3]);
    assert!(detector.shadow(&"y".parse().unwrap()).is_none());
}

#[test]
fn test_replay_of_join_fails_loudly() {
    let events = vec![
        TraceEvent::Fork {
            parent: ThreadId(0),
            child: ThreadId(1),
        },
        TraceEvent::Join {
            parent: ThreadId(0),
            child: ThreadId(1),
        },
    ];
    let mut detector = quiet();
    let err = replay(&mut detector, &events).unwrap_err();
    assert_eq!(
        err.source,
        DetectorError::Unsupported(UnsupportedOp::Join {
            parent: ThreadId(0),
            child: ThreadId(1)
        })
    );
}

#[test]
fn test_replay_callback_sees_event_indices() {
    let file = trace_file("fork 0 1\nwr 0 a\nwr 1 a\nwr 0 b\nrd 1 b\nrd 1 c\n");
    let events = read_trace(file.path(), TraceFormat::Text).unwrap();
    let mut indices = Vec::new();
    let mut detector = quiet();
    replay_with(&mut detector, &events, |index, race| {
        indices.push((index, race.kind));
    })
    .unwrap();
    assert_eq!(
        indices,
        vec![(2, RaceKind::WriteAfterWrite), (4, RaceKind::ReadAfterWrite)]
    );
}

#[test]
fn test_parse_error_has_line_number() {
    let file = trace_file("fork 0 1\n\n# ok so far\nwr 1\n");
    let err = read_trace(file.path(), TraceFormat::Text).unwrap_err();
    assert!(matches!(err, TraceError::Arity { line: 4, .. }));
}

#[test]
fn test_config_file_round_trip() {
    let config = DetectorConfig {
        log_events: true,
        stats_interval: Some(1000),
        ..DetectorConfig::default()
    };
    let file = trace_file(&serde_json::to_string(&config).unwrap());
    let loaded = DetectorConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}
