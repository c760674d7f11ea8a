#![warn(missing_docs)]
//! Physics primitives: AABBs, block targeting and player movement.

mod player;
mod raycast;

pub use player::*;
pub use raycast::*;

use glam::Vec3;
use voxelcraft_core::{BlockPos, VoxelQuery};

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: [f32; 3],
    /// Maximum corner (x, y, z).
    pub max: [f32; 3],
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        debug_assert!(min[0] <= max[0] && min[1] <= max[1] && min[2] <= max[2]);
        Self { min, max }
    }

    /// Box of a standing body: `feet` is the bottom-centre point.
    pub fn around_feet(feet: Vec3, half_width: f32, height: f32) -> Self {
        Self::new(
            [feet.x - half_width, feet.y, feet.z - half_width],
            [feet.x + half_width, feet.y + height, feet.z + half_width],
        )
    }

    /// Unit cube occupying a block cell.
    pub fn cube(pos: BlockPos) -> Self {
        let min = [pos.x as f32, pos.y as f32, pos.z as f32];
        Self::new(min, [min[0] + 1.0, min[1] + 1.0, min[2] + 1.0])
    }

    /// Tests intersection with another AABB. Boxes that only share a face
    /// do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min[0] < other.max[0]
            && self.max[0] > other.min[0]
            && self.min[1] < other.max[1]
            && self.max[1] > other.min[1]
            && self.min[2] < other.max[2]
            && self.max[2] > other.min[2]
    }

    /// Every block cell touched by the box, corners included.
    ///
    /// A corner lying exactly on a cell boundary counts the cell beyond it,
    /// so a body flush against a wall reports that wall.
    pub fn touched_cells(&self) -> impl Iterator<Item = BlockPos> {
        let lo = BlockPos::containing(self.min[0], self.min[1], self.min[2]);
        let hi = BlockPos::containing(self.max[0], self.max[1], self.max[2]);
        (lo.y..=hi.y).flat_map(move |y| {
            (lo.z..=hi.z).flat_map(move |z| (lo.x..=hi.x).map(move |x| BlockPos::new(x, y, z)))
        })
    }

    /// Whether any touched cell is solid in `world`.
    pub fn collides<W: VoxelQuery + ?Sized>(&self, world: &W) -> bool {
        self.touched_cells().any(|cell| world.is_solid_at(cell))
    }
}
