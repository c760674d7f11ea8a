#![warn(missing_docs)]
//! Deterministic test surfaces: JSONL event streams, golden snapshots,
//! frame-stepping harness and run reports.

mod frames;
mod report;
mod snapshot;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use voxelcraft_core::FrameTick;

pub use frames::*;
pub use report::*;
pub use snapshot::*;

/// One line of an event log.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord<'a, P: Serialize> {
    /// Frame on which the event happened.
    pub tick: FrameTick,
    /// Short label used to filter logs.
    pub kind: &'a str,
    /// Structured event data.
    pub payload: &'a P,
}

/// Newline-delimited JSON writer.
pub struct JsonlSink {
    out: BufWriter<File>,
    lines: usize,
}

impl JsonlSink {
    /// Create (or truncate) a log at `path`, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Append one record.
    pub fn write<P: Serialize>(&mut self, record: &EventRecord<'_, P>) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush buffered records to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("Failed to flush event log")
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

/// Unique scratch path under the system temp directory.
pub fn scratch_path(prefix: &str, extension: &str) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    std::env::temp_dir().join(format!(
        "{prefix}-{stamp}-{}-{n}.{extension}",
        std::process::id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let path = scratch_path("events", "jsonl");
        let payload = json!({"pos": [1, 2, 3]});
        {
            let mut sink = JsonlSink::create(&path).expect("sink create");
            for tick in 0..3 {
                sink.write(&EventRecord {
                    tick: FrameTick(tick),
                    kind: "block_broken",
                    payload: &payload,
                })
                .expect("write succeeds");
            }
            assert_eq!(sink.lines_written(), 3);
        }

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["tick"], 0);
        assert_eq!(first["kind"], "block_broken");
        assert_eq!(first["payload"]["pos"][2], 3);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn scratch_paths_differ() {
        let a = scratch_path("x", "json");
        let b = scratch_path("x", "json");
        assert_ne!(a, b);
    }
}
