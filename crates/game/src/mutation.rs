//! Break and place orchestration.

use tracing::debug;
use voxelcraft_core::{BlockKind, BlockPos};
use voxelcraft_physics::Aabb;
use voxelcraft_world::{in_vertical_bounds, Inventory, VoxelWorld};

/// A successful break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenBlock {
    pub kind: BlockKind,
    /// What went into the inventory, if anything.
    pub drop: Option<BlockKind>,
}

/// Validates edits against the registry and inventory before writing them
/// to the world. Borrows both for the duration of one frame's mutations.
pub struct BlockMutationService<'a> {
    world: &'a mut VoxelWorld,
    inventory: &'a mut Inventory,
}

impl<'a> BlockMutationService<'a> {
    pub fn new(world: &'a mut VoxelWorld, inventory: &'a mut Inventory) -> Self {
        Self { world, inventory }
    }

    /// Break the block at `pos` and collect its drop.
    ///
    /// Fails without side effects on air and indestructible blocks.
    pub fn break_block(&mut self, pos: BlockPos) -> bool {
        self.try_break(pos).is_some()
    }

    pub fn try_break(&mut self, pos: BlockPos) -> Option<BrokenBlock> {
        let kind = self.world.get_block(pos.x, pos.y, pos.z);
        if kind.is_air() || self.world.registry().is_indestructible(kind) {
            return None;
        }
        self.world.set_block(pos.x, pos.y, pos.z, BlockKind::Air);

        let drop = self.world.registry().drop_for(kind);
        if let Some(dropped) = drop {
            if !self.inventory.add(dropped, 1) {
                debug!(%pos, %dropped, "inventory full, drop lost");
            }
        }
        debug!(%pos, %kind, ?drop, "block broken");
        Some(BrokenBlock { kind, drop })
    }

    /// Place one block from `slot` at `pos`.
    ///
    /// Fails when `pos` is outside the vertical extent, the cell is not air,
    /// the cell would overlap `body`, or the slot is empty.
    pub fn place_block(&mut self, pos: BlockPos, slot: usize, body: &Aabb) -> bool {
        self.try_place(pos, slot, body).is_some()
    }

    pub fn try_place(&mut self, pos: BlockPos, slot: usize, body: &Aabb) -> Option<BlockKind> {
        if !in_vertical_bounds(pos.y) {
            return None;
        }
        if !self.world.get_block(pos.x, pos.y, pos.z).is_air() {
            return None;
        }
        if Aabb::cube(pos).intersects(body) {
            debug!(%pos, "placement rejected: overlaps player");
            return None;
        }
        let kind = self.inventory.get(slot)?.kind;

        self.world.set_block(pos.x, pos.y, pos.z, kind);
        self.inventory.remove(slot, 1);
        debug!(%pos, %kind, slot, "block placed");
        Some(kind)
    }
}
