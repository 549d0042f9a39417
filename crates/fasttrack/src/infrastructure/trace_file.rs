//! Trace Files
//!
//! Traces are read line by line through [`TraceReader`], so a replay never
//! holds more than one line of input in memory beyond the detector itself.

use crate::domain::trace::{parse_json_line, parse_text_line, TraceError, TraceEvent};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// On-disk trace encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    /// One `op arg...` line per event
    #[default]
    Text,
    /// One JSON object per line
    JsonLines,
}

impl TraceFormat {
    /// Guess the format from a file extension (`.jsonl`, `.ndjson`, `.json`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl" | "ndjson" | "json") => Self::JsonLines,
            _ => Self::Text,
        }
    }
}

impl FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "txt" => Ok(Self::Text),
            "jsonl" | "json" | "ndjson" => Ok(Self::JsonLines),
            other => Err(format!("unknown trace format '{other}' (expected text or jsonl)")),
        }
    }
}

/// Streaming trace parser over any buffered reader
pub struct TraceReader<R> {
    reader: R,
    format: TraceFormat,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R, format: TraceFormat) -> Self {
        Self {
            reader,
            format,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl TraceReader<BufReader<File>> {
    /// Open a trace file
    pub fn open(path: impl AsRef<Path>, format: TraceFormat) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), format))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(source) => {
                    self.line_no += 1;
                    return Some(Err(TraceError::Read {
                        line: self.line_no,
                        source,
                    }));
                }
            }

            let parsed = match self.format {
                TraceFormat::Text => parse_text_line(self.line_no, &self.buf),
                TraceFormat::JsonLines => parse_json_line(self.line_no, &self.buf),
            };
            match parsed {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Read a whole trace file
pub fn read_trace(path: impl AsRef<Path>, format: TraceFormat) -> Result<Vec<TraceEvent>, TraceError> {
    TraceReader::open(path, format)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::ThreadId;
    use std::io::{Cursor, Write};

    #[test]
    fn test_format_from_path() {
        assert_eq!(TraceFormat::from_path(Path::new("a/b.jsonl")), TraceFormat::JsonLines);
        assert_eq!(TraceFormat::from_path(Path::new("trace.txt")), TraceFormat::Text);
        assert_eq!(TraceFormat::from_path(Path::new("trace")), TraceFormat::Text);
        assert_eq!("jsonl".parse::<TraceFormat>(), Ok(TraceFormat::JsonLines));
        assert!("xml".parse::<TraceFormat>().is_err());
    }

    #[test]
    fn test_reader_skips_blank_and_comments() {
        let input = Cursor::new("# trace\n\nfork 0 1\n   \nend 1\n");
        let mut reader = TraceReader::new(input, TraceFormat::Text);
        assert_eq!(
            reader.next().unwrap().unwrap(),
            TraceEvent::Fork {
                parent: ThreadId(0),
                child: ThreadId(1)
            }
        );
        assert_eq!(reader.line_no(), 3);
        assert!(matches!(reader.next(), Some(Ok(TraceEvent::End { .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_read_trace_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"op":"fork","parent":0,"child":1}}"#).unwrap();
        writeln!(file, r#"{{"op":"rd","thread":1,"location":16}}"#).unwrap();
        file.flush().unwrap();

        let events = read_trace(file.path(), TraceFormat::JsonLines).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_trace(dir.path().join("absent.txt"), TraceFormat::Text).unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_invalid_utf8_names_its_line() {
        let input = Cursor::new(b"fork 0 1\nwr 1 \xff\xfe\nend 1\n".to_vec());
        let mut reader = TraceReader::new(input, TraceFormat::Text);
        assert!(matches!(reader.next(), Some(Ok(TraceEvent::Fork { .. }))));

        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, TraceError::Read { line: 2, .. }));
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().starts_with("line 2: read failed"));

        assert!(matches!(reader.next(), Some(Ok(TraceEvent::End { .. }))));
        assert_eq!(reader.line_no(), 3);
    }
}
