#![warn(missing_docs)]
//! Headless testing surfaces: a recording menu host, event builders, and a
//! JSONL log of host traffic.

mod events;
mod host;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use yggdrasil_core::SimTick;

pub use events::*;
pub use host::*;

/// One line of the traffic log.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Manager tick when the host saw the call.
    pub tick: SimTick,
    /// The recorded call.
    pub event: &'a HostEvent,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file, written: 0 })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Append every event in `events`, stamped with `tick`.
    pub fn write_all(&mut self, tick: SimTick, events: &[HostEvent]) -> Result<()> {
        for event in events {
            self.write(&EventRecord { tick, event })?;
        }
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yggdrasil_menus::HolderId;

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs/traffic.jsonl");
        let events = vec![
            HostEvent::Close { holder: HolderId(1) },
            HostEvent::Message {
                holder: HolderId(1),
                text: "hello".into(),
            },
        ];
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write_all(SimTick(3), &events).expect("write succeeds");
        assert_eq!(sink.written(), 2);

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"kind\":\"close\""));
        assert!(lines[1].contains("hello"));
        assert!(lines[1].contains("\"tick\":3"));
    }
}
