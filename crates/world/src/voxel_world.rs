use std::collections::BTreeSet;
use std::mem;

use tracing::debug;
use voxelcraft_core::{BlockKind, BlockPos, BlockRegistry, VoxelQuery};

use crate::chunk::{in_vertical_bounds, ChunkPos, CHUNK_SIZE};
use crate::overlay::ModificationOverlay;
use crate::storage::ChunkStore;
use crate::terrain::ChunkGenerator;

/// Chunks needed to hold a square load area of `radius`.
pub fn area_chunk_count(radius: i32) -> usize {
    let side = (radius.max(0) as usize).saturating_mul(2).saturating_add(1);
    side.saturating_mul(side)
}

/// Largest load radius whose square area fits in `capacity` chunks.
pub fn area_radius_for_capacity(capacity: usize) -> i32 {
    let mut side = (capacity as f64).sqrt() as usize;
    while side.checked_mul(side).map_or(true, |area| area > capacity) {
        side -= 1;
    }
    let radius = side.saturating_sub(1) / 2;
    i32::try_from(radius).unwrap_or(i32::MAX)
}

/// Generated chunks, player edits and block properties behind one read and
/// write surface.
///
/// Reads never allocate: a cell in an absent chunk is air until something
/// loads that chunk. Writes land in the overlay and invalidate the owning
/// chunk plus any neighbour sharing the edited face.
pub struct VoxelWorld {
    store: ChunkStore,
    overlay: ModificationOverlay,
    registry: BlockRegistry,
    dirty: BTreeSet<ChunkPos>,
}

impl VoxelWorld {
    pub fn new(
        registry: BlockRegistry,
        generator: Box<dyn ChunkGenerator>,
        chunk_capacity: usize,
    ) -> Self {
        Self {
            store: ChunkStore::new(chunk_capacity, generator),
            overlay: ModificationOverlay::new(),
            registry,
            dirty: BTreeSet::new(),
        }
    }

    /// Effective block: overlay first, then generated data, else air.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockKind {
        if !in_vertical_bounds(y) {
            return BlockKind::Air;
        }
        if let Some(kind) = self.overlay.get(BlockPos::new(x, y, z)) {
            return kind;
        }
        self.store.block(x, y, z)
    }

    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.registry.is_solid(self.get_block(x, y, z))
    }

    /// Record an edit and invalidate affected chunks.
    ///
    /// Returns false without touching anything when `y` is outside the
    /// vertical extent. Neighbour chunks that are not resident are skipped.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) -> bool {
        if !in_vertical_bounds(y) {
            return false;
        }
        self.overlay.insert(BlockPos::new(x, y, z), kind);

        let owner = ChunkPos::containing(x, z);
        self.store.ensure_chunk(owner).bump_version();
        self.dirty.insert(owner);

        let (lx, lz) = ChunkPos::local_xz(x, z);
        let edge = CHUNK_SIZE - 1;
        let mut neighbours = Vec::with_capacity(2);
        match lx {
            0 => neighbours.push(ChunkPos::new(owner.x - 1, owner.z)),
            l if l == edge => neighbours.push(ChunkPos::new(owner.x + 1, owner.z)),
            _ => {}
        }
        match lz {
            0 => neighbours.push(ChunkPos::new(owner.x, owner.z - 1)),
            l if l == edge => neighbours.push(ChunkPos::new(owner.x, owner.z + 1)),
            _ => {}
        }
        for pos in neighbours {
            if let Some(chunk) = self.store.get_mut(pos) {
                chunk.bump_version();
                self.dirty.insert(pos);
            }
        }

        debug!(x, y, z, %kind, chunk = %owner, "block set");
        true
    }

    /// Make sure the chunk at `pos` is resident, generating it if needed.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) {
        if !self.store.contains(pos) {
            self.dirty.insert(pos);
        }
        self.store.ensure_chunk(pos);
    }

    /// Load every chunk within `radius` chunks of the column `(x, z)`.
    ///
    /// The radius is shrunk until the square fits the chunk cache, so the
    /// area never evicts its own chunks. Rings load from the outside in,
    /// leaving the centre chunk most recently used.
    pub fn ensure_area(&mut self, x: i32, z: i32, radius: i32) {
        let fit = area_radius_for_capacity(self.store.capacity());
        let radius = if radius > fit {
            debug!(requested = radius, radius = fit, "Load radius exceeds chunk capacity");
            fit
        } else {
            radius.max(0)
        };
        let center = ChunkPos::containing(x, z);
        for ring in (0..=radius).rev() {
            for dz in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs() == ring || dz.abs() == ring {
                        self.ensure_chunk(ChunkPos::new(center.x + dx, center.z + dz));
                    }
                }
            }
        }
    }

    /// Maximum number of resident chunks.
    pub fn chunk_capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Version counter of a resident chunk. `None` if not loaded; counters
    /// restart at zero when an evicted chunk is regenerated.
    pub fn chunk_version(&self, pos: ChunkPos) -> Option<u64> {
        self.store.get(pos).map(|chunk| chunk.version())
    }

    /// Chunks generated or invalidated since the previous call.
    pub fn take_dirty_chunks(&mut self) -> BTreeSet<ChunkPos> {
        mem::take(&mut self.dirty)
    }

    pub fn loaded_chunks(&self) -> usize {
        self.store.len()
    }

    pub fn overlay(&self) -> &ModificationOverlay {
        &self.overlay
    }

    /// Replace all edits with a restored set. Resident chunks are marked
    /// dirty since their effective contents may have changed.
    pub fn restore_overlay(&mut self, overlay: ModificationOverlay) {
        self.overlay = overlay;
        let resident: Vec<_> = self.store.iter_positions().collect();
        for pos in resident {
            if let Some(chunk) = self.store.get_mut(pos) {
                chunk.bump_version();
            }
            self.dirty.insert(pos);
        }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }
}

impl VoxelQuery for VoxelWorld {
    fn block_at(&self, pos: BlockPos) -> BlockKind {
        self.get_block(pos.x, pos.y, pos.z)
    }

    fn is_solid_at(&self, pos: BlockPos) -> bool {
        self.is_solid(pos.x, pos.y, pos.z)
    }
}
