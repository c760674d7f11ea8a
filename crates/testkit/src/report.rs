//! Summary report for a headless run, exported as JSON for CI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Every frame ran.
    Pass,
    /// The run stopped early.
    Fail,
}

/// Counters collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Frames stepped.
    pub frames: u64,
    /// Successful breaks.
    pub blocks_broken: u64,
    /// Successful placements.
    pub blocks_placed: u64,
    /// Distinct targets acquired.
    pub target_changes: u64,
    /// Chunks resident at the end of the run.
    pub chunks_loaded: usize,
    /// Cells edited relative to generated terrain.
    pub overlay_entries: usize,
}

/// Top-level report document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub name: String,
    /// When the report was produced (RFC 3339).
    pub timestamp: String,
    /// Outcome.
    pub result: RunResult,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: f64,
    /// Collected counters.
    pub counters: RunCounters,
}

impl RunReport {
    /// Stamp a report with the current time.
    pub fn new(
        name: impl Into<String>,
        result: RunResult,
        duration: Duration,
        counters: RunCounters,
    ) -> Self {
        Self {
            name: name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result,
            duration_ms: duration.as_secs_f64() * 1000.0,
            counters,
        }
    }

    /// Pretty JSON written to `path`, creating parent directories.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))
    }
}
