//! Golden-file JSON snapshots.
//!
//! Values are rendered as pretty JSON with object keys sorted so that field
//! order never causes churn. Set `VXC_UPDATE_SNAPSHOTS=1` to rewrite goldens
//! instead of comparing.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Environment variable that switches snapshots to update mode.
pub const UPDATE_SNAPSHOTS_ENV: &str = "VXC_UPDATE_SNAPSHOTS";

/// Whether a snapshot call compares or rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Fail on any difference from the golden file.
    Compare,
    /// Overwrite the golden file.
    Update,
}

impl SnapshotMode {
    /// Mode selected by [`UPDATE_SNAPSHOTS_ENV`].
    pub fn from_env() -> Self {
        let update = std::env::var(UPDATE_SNAPSHOTS_ENV)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if update {
            Self::Update
        } else {
            Self::Compare
        }
    }
}

/// Compare `value` against the golden file at `path`, or rewrite it when
/// [`UPDATE_SNAPSHOTS_ENV`] is set.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    check_json_snapshot(path.as_ref(), value, SnapshotMode::from_env())
}

/// [`assert_json_snapshot`] with an explicit mode.
pub fn check_json_snapshot<T: Serialize>(path: &Path, value: &T, mode: SnapshotMode) -> Result<()> {
    let actual = to_canonical_json(value)?;

    if mode == SnapshotMode::Update {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create snapshot directory {}", parent.display())
            })?;
        }
        fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot updated");
        return Ok(());
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (set {UPDATE_SNAPSHOTS_ENV}=1 to create it)",
            path.display()
        )
    })?;
    if let Some((line, want, got)) = first_difference(&expected, &actual) {
        bail!(
            "Snapshot mismatch at {} line {line}\n  expected: {want}\n    actual: {got}\n(set {UPDATE_SNAPSHOTS_ENV}=1 to update)",
            path.display()
        );
    }
    Ok(())
}

/// Pretty JSON with recursively sorted object keys and a trailing newline.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut text =
        serde_json::to_string_pretty(&sorted(value)).context("Failed to format snapshot JSON")?;
    text.push('\n');
    Ok(text)
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sorted(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        scalar => scalar,
    }
}

/// 1-based line number and contents of the first differing line.
fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    if expected == actual {
        return None;
    }
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            (a, b) => return Some((line, a.unwrap_or("<eof>"), b.unwrap_or("<eof>"))),
        }
    }
}
