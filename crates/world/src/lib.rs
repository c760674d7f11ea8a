//! Chunk storage, player edits and inventory for the voxel world.

mod chunk;
mod inventory;
mod overlay;
mod storage;
mod terrain;
mod voxel_world;

pub use chunk::*;
pub use inventory::*;
pub use overlay::*;
pub use storage::*;
pub use terrain::*;
pub use voxel_world::*;
