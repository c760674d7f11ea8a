//! Hold-to-break progress against a single targeted cell.

use serde::{Deserialize, Serialize};
use voxelcraft_core::{BlockPos, BlockRegistry};
use voxelcraft_physics::TargetResult;

/// Where the breaking state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BreakState {
    /// Not breaking anything.
    #[default]
    Idle,
    /// Breaking `cell`; `progress` is in `[0, 1)`.
    Targeting { cell: BlockPos, progress: f32 },
}

/// What one frame of evaluation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakOutcome {
    /// Nothing is being broken.
    Idle,
    /// A new cell was acquired with zero progress.
    Started(BlockPos),
    /// Progress advanced on the held cell.
    Progressed { cell: BlockPos, progress: f32 },
    /// Progress reached one; the caller should break the cell.
    Completed(BlockPos),
}

/// Read-only view for HUD crack overlays.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakSnapshot {
    pub target: Option<BlockPos>,
    pub progress: f32,
}

/// Accumulates break progress across frames.
///
/// Changing target, releasing the intent, losing the target, or aiming at
/// an indestructible block all drop progress back to zero.
#[derive(Debug, Clone, Default)]
pub struct BreakProgress {
    state: BreakState,
}

impl BreakProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BreakState {
        self.state
    }

    pub fn snapshot(&self) -> BreakSnapshot {
        match self.state {
            BreakState::Idle => BreakSnapshot::default(),
            BreakState::Targeting { cell, progress } => BreakSnapshot {
                target: Some(cell),
                progress,
            },
        }
    }

    pub fn reset(&mut self) {
        self.state = BreakState::Idle;
    }

    /// Evaluate one frame.
    pub fn update(
        &mut self,
        target: Option<&TargetResult>,
        held: bool,
        dt: f32,
        registry: &BlockRegistry,
    ) -> BreakOutcome {
        let Some(target) = target.filter(|_| held) else {
            self.reset();
            return BreakOutcome::Idle;
        };
        if registry.is_indestructible(target.block) {
            self.reset();
            return BreakOutcome::Idle;
        }

        let cell = target.position;
        let break_time = registry.break_time(target.block);
        let progress = match self.state {
            BreakState::Targeting {
                cell: current,
                progress,
            } if current == cell => {
                if break_time > 0.0 {
                    progress + dt.max(0.0) / break_time
                } else {
                    1.0
                }
            }
            _ if break_time <= 0.0 => 1.0,
            _ => {
                self.state = BreakState::Targeting {
                    cell,
                    progress: 0.0,
                };
                return BreakOutcome::Started(cell);
            }
        };

        if progress >= 1.0 {
            self.reset();
            BreakOutcome::Completed(cell)
        } else {
            self.state = BreakState::Targeting { cell, progress };
            BreakOutcome::Progressed { cell, progress }
        }
    }
}
