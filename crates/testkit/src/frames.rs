//! Frame-stepping harness.
//!
//! Steps a state a fixed number of frames, capturing a serializable
//! snapshot before the first step and after every step. The collected
//! frames can be inspected directly or compared against a golden file.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use voxelcraft_core::FrameTick;

/// Snapshot captured at one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedFrame<S> {
    /// Frame number; `0` is the state before any step.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Named run compared against a golden file.
#[derive(Debug, Clone)]
pub struct FrameRunConfig {
    /// Written into the snapshot document.
    pub name: String,
    /// Steps to run; the document holds `frames + 1` entries.
    pub frames: u64,
    /// Golden JSON file.
    pub snapshot_path: PathBuf,
}

#[derive(Serialize)]
struct FrameRunDocument<'a, S> {
    name: &'a str,
    frames: &'a [CapturedFrame<S>],
}

/// Step `state` `frames` times and collect snapshots.
///
/// `step` receives the tick being executed; `snapshot` receives the tick
/// reached after it.
pub fn run_frames<State, Snap, StepFn, SnapFn>(
    state: &mut State,
    frames: u64,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Vec<CapturedFrame<Snap>>
where
    StepFn: FnMut(FrameTick, &mut State),
    SnapFn: FnMut(FrameTick, &State) -> Snap,
{
    let mut tick = FrameTick::ZERO;
    let mut captured = Vec::with_capacity(frames as usize + 1);
    captured.push(CapturedFrame {
        tick: tick.0,
        snapshot: snapshot(tick, state),
    });
    for _ in 0..frames {
        step(tick, state);
        tick = tick.advance(1);
        captured.push(CapturedFrame {
            tick: tick.0,
            snapshot: snapshot(tick, state),
        });
    }
    captured
}

/// [`run_frames`], then assert the result against `config.snapshot_path`.
pub fn assert_frames_snapshot<State, Snap, StepFn, SnapFn>(
    config: FrameRunConfig,
    mut state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snap: Serialize,
    StepFn: FnMut(FrameTick, &mut State),
    SnapFn: FnMut(FrameTick, &State) -> Snap,
{
    let frames = run_frames(&mut state, config.frames, step, snapshot);
    let document = FrameRunDocument {
        name: &config.name,
        frames: &frames,
    };
    assert_json_snapshot(&config.snapshot_path, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{check_json_snapshot, scratch_path, SnapshotMode};

    #[test]
    fn captures_initial_and_every_step() {
        let mut counter = 10u32;
        let frames = run_frames(
            &mut counter,
            3,
            |tick, c| *c += tick.0 as u32,
            |_, c| *c,
        );
        let ticks: Vec<_> = frames.iter().map(|f| f.tick).collect();
        let values: Vec<_> = frames.iter().map(|f| f.snapshot).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3]);
        // Steps see ticks 0, 1, 2.
        assert_eq!(values, vec![10, 10, 11, 13]);
    }

    #[test]
    fn zero_frames_is_just_the_initial_snapshot() {
        let mut state = 7u8;
        let frames = run_frames(&mut state, 0, |_, s| *s += 1, |tick, _| tick.0);
        assert_eq!(state, 7);
        assert_eq!(frames, vec![CapturedFrame { tick: 0, snapshot: 0 }]);
    }

    #[test]
    fn frames_snapshot_matches_written_golden() {
        let path = scratch_path("frames", "json");
        let mut counter = 0u32;
        let frames = run_frames(&mut counter, 2, |_, c| *c += 1, |_, c| *c);
        let document = FrameRunDocument {
            name: "counter",
            frames: &frames,
        };
        check_json_snapshot(&path, &document, SnapshotMode::Update).unwrap();

        let config = FrameRunConfig {
            name: "counter".to_string(),
            frames: 2,
            snapshot_path: path.clone(),
        };
        assert_frames_snapshot(config, 0u32, |_, c| *c += 1, |_, c| *c).unwrap();
        std::fs::remove_file(&path).ok();
    }
}
