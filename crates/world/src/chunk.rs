use std::fmt;

use voxelcraft_core::BlockKind;

/// Chunk width and depth (X and Z) in cells.
pub const CHUNK_SIZE: usize = 16;
/// Chunk height (Y axis) in cells.
pub const CHUNK_HEIGHT: usize = 128;
/// Total cell count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT;

/// Chunk-local position (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    /// Convert to a linear index: `y * SIZE² + z * SIZE + x`.
    pub fn index(self) -> usize {
        debug_assert!(self.x < CHUNK_SIZE);
        debug_assert!(self.y < CHUNK_HEIGHT);
        debug_assert!(self.z < CHUNK_SIZE);
        (self.y * CHUNK_SIZE + self.z) * CHUNK_SIZE + self.x
    }
}

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk owning the world column (x, z).
    pub fn containing(world_x: i32, world_z: i32) -> Self {
        let size = CHUNK_SIZE as i32;
        Self {
            x: world_x.div_euclid(size),
            z: world_z.div_euclid(size),
        }
    }

    /// Chunk-local X/Z of a world column, always in `0..CHUNK_SIZE`.
    pub fn local_xz(world_x: i32, world_z: i32) -> (usize, usize) {
        let size = CHUNK_SIZE as i32;
        (
            world_x.rem_euclid(size) as usize,
            world_z.rem_euclid(size) as usize,
        )
    }

    /// World X/Z of this chunk's (0, 0) column.
    pub fn origin(self) -> (i32, i32) {
        let size = CHUNK_SIZE as i32;
        (self.x * size, self.z * size)
    }

    /// Stable hash used to seed per-chunk randomness.
    pub fn seed_hash(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.z as u32 as u64)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Whether a world Y lies inside the vertical extent of every chunk.
#[inline]
pub fn in_vertical_bounds(y: i32) -> bool {
    (0..CHUNK_HEIGHT as i32).contains(&y)
}

/// Dense column of generated cells plus an invalidation counter.
///
/// `version` only ever grows. External mesh builders remember the version
/// they last built and rebuild whenever it changes.
#[derive(Clone)]
pub struct Chunk {
    position: ChunkPos,
    blocks: Box<[BlockKind]>,
    version: u64,
}

impl Chunk {
    /// Allocate a fresh chunk filled with air.
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            blocks: vec![BlockKind::Air; CHUNK_VOLUME].into_boxed_slice(),
            version: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mark the chunk as changed.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        LocalPos { x, y, z }.index()
    }

    /// Fetch a generated cell.
    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockKind {
        self.blocks[Self::index(x, y, z)]
    }

    /// Write a generated cell. Player edits go through the overlay instead.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, kind: BlockKind) {
        let idx = Self::index(x, y, z);
        self.blocks[idx] = kind;
    }

    /// Fill every cell of a horizontal layer.
    pub fn fill_layer(&mut self, y: usize, kind: BlockKind) {
        let start = Self::index(0, y, 0);
        self.blocks[start..start + CHUNK_SIZE * CHUNK_SIZE].fill(kind);
    }

    /// Borrow raw block storage for mesh builders.
    pub fn blocks(&self) -> &[BlockKind] {
        &self.blocks
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("position", &self.position)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
