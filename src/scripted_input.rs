use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use voxelcraft_game::FrameInput;
use voxelcraft_physics::{Intents, MovementInput};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ScriptedStep {
    /// Seconds the step is held. Every step lasts at least one frame.
    duration: f32,
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    jump: bool,
    sneak: bool,
    sprint: bool,
    yaw: f32,
    pitch: f32,
    #[serde(rename = "break")]
    breaking: bool,
    // One-shot actions, fired on the step's first frame.
    place: bool,
    toggle_fly: bool,
    select_slot: Option<usize>,
    scroll: i32,
}

/// Replays a JSON list of timed input steps, one frame at a time.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    fired: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scripted input {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid scripted input {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            fired: false,
        })
    }

    /// True once every step has played out.
    pub fn finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Input for the next frame of length `dt`; idle once finished.
    pub fn advance(&mut self, dt: f32) -> FrameInput {
        let Some(step) = self.steps.get(self.index) else {
            return FrameInput::default();
        };
        let input = step.to_frame_input(!self.fired);
        self.fired = true;

        self.time_in_step += dt.max(0.0);
        while let Some(step) = self.steps.get(self.index) {
            if self.time_in_step < step.duration {
                break;
            }
            self.time_in_step -= step.duration.max(0.0);
            self.index += 1;
            self.fired = false;
            // Zero-length steps still get their frame.
            if self.steps.get(self.index).is_some_and(|next| next.duration <= 0.0) {
                self.time_in_step = 0.0;
                break;
            }
        }
        input
    }
}

impl ScriptedStep {
    fn to_frame_input(&self, first_frame: bool) -> FrameInput {
        let mut intents = Intents::empty();
        intents.set(Intents::FORWARD, self.forward);
        intents.set(Intents::BACK, self.back);
        intents.set(Intents::LEFT, self.left);
        intents.set(Intents::RIGHT, self.right);
        intents.set(Intents::JUMP, self.jump);
        intents.set(Intents::SNEAK, self.sneak);
        intents.set(Intents::SPRINT, self.sprint);

        let mut input = FrameInput {
            movement: MovementInput::new(intents, self.yaw),
            pitch: self.pitch,
            breaking: self.breaking,
            ..FrameInput::default()
        };
        if first_frame {
            input.place = self.place;
            input.toggle_fly = self.toggle_fly;
            input.select_slot = self.select_slot;
            input.scroll = self.scroll;
        }
        input
    }
}
