//! Fixed-step block targeting.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelcraft_core::{BlockKind, BlockPos, VoxelQuery};

/// Default reach in blocks.
pub const DEFAULT_REACH: f32 = 5.0;

/// Longest reach a resolver accepts, in blocks.
pub const MAX_REACH: f32 = 64.0;

/// Distance advanced per sample along the ray.
pub const RAY_STEP: f32 = 0.1;

/// The block the eye is pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    /// First solid cell along the ray.
    pub position: BlockPos,
    /// Block type occupying `position`.
    pub block: BlockKind,
    /// Last non-solid cell sampled before the hit; where a placed block goes.
    pub placement_position: BlockPos,
}

/// Marches a ray in fixed increments to find the targeted block.
///
/// Sampling starts one step in front of the eye, so the eye's own cell is
/// never a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetResolver {
    reach: f32,
    step: f32,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new(DEFAULT_REACH)
    }
}

impl TargetResolver {
    /// Resolver with the given reach and the standard step. Reach is
    /// limited to `0..=MAX_REACH`; NaN means no reach.
    pub fn new(reach: f32) -> Self {
        Self {
            reach: reach.max(0.0).min(MAX_REACH),
            step: RAY_STEP,
        }
    }

    /// Maximum targeting distance.
    pub fn reach(&self) -> f32 {
        self.reach
    }

    fn max_steps(&self) -> usize {
        (self.reach / self.step).ceil() as usize
    }

    /// Find the first solid cell within reach of `eye` along `direction`.
    ///
    /// `direction` is normalized here; a zero vector never hits.
    pub fn resolve<W: VoxelQuery + ?Sized>(
        &self,
        world: &W,
        eye: Vec3,
        direction: Vec3,
    ) -> Option<TargetResult> {
        let direction = direction.try_normalize()?;
        let mut point = eye;
        let mut last_empty = None;

        for _ in 0..self.max_steps() {
            point += direction * self.step;
            let cell = BlockPos::containing(point.x, point.y, point.z);
            if world.is_solid_at(cell) {
                return Some(TargetResult {
                    position: cell,
                    block: world.block_at(cell),
                    placement_position: last_empty.unwrap_or(cell.offset(0, 1, 0)),
                });
            }
            last_empty = Some(cell);
        }
        None
    }
}
