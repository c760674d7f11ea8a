#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod block;
pub mod registry;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use block::{BlockKind, BlockPos, BLOCK_KIND_COUNT};
pub use registry::{BlockProperties, BlockRegistry, DropRule, RegistryError};

/// Monotonic frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Read-only view of the voxel grid used by raycasts and collision.
pub trait VoxelQuery {
    /// Effective block type at a cell.
    fn block_at(&self, pos: BlockPos) -> BlockKind;

    /// Whether the cell blocks movement and rays.
    fn is_solid_at(&self, pos: BlockPos) -> bool;
}

/// Helper to derive a reproducible RNG seeded by world + chunk domains.
pub fn scoped_rng(world_seed: u64, chunk_hash: u64) -> StdRng {
    StdRng::seed_from_u64(world_seed ^ chunk_hash)
}
