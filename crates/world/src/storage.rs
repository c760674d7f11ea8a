use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use voxelcraft_core::BlockKind;

use crate::terrain::ChunkGenerator;
use crate::{in_vertical_bounds, Chunk, ChunkPos};

/// In-memory chunk arena with lazy generation and an LRU eviction policy.
/// Uses BTreeMap for deterministic iteration order.
pub struct ChunkStore {
    chunks: BTreeMap<ChunkPos, Chunk>,
    lru: LruCache<ChunkPos, ()>,
    capacity: usize,
    generator: Box<dyn ChunkGenerator>,
}

impl ChunkStore {
    /// Create a store holding at most `capacity` chunks.
    pub fn new(capacity: usize, generator: Box<dyn ChunkGenerator>) -> Self {
        let capacity = capacity.max(1);
        Self {
            chunks: BTreeMap::new(),
            lru: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            capacity,
            generator,
        }
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunks are currently stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Maximum number of resident chunks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Obtain mutable access to a chunk, generating it if necessary.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        if !self.chunks.contains_key(&pos) {
            self.evict_if_needed();
        }
        self.lru.put(pos, ());
        let generator = &self.generator;
        self.chunks.entry(pos).or_insert_with(|| {
            let mut chunk = Chunk::new(pos);
            generator.generate(&mut chunk);
            trace!(%pos, "generated chunk");
            chunk
        })
    }

    /// Attempt to fetch a chunk immutably.
    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Fetch a chunk mutably (without creating it).
    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        if self.chunks.contains_key(&pos) {
            self.lru.put(pos, ());
        }
        self.chunks.get_mut(&pos)
    }

    /// Generated block at a world cell, or air when the chunk is absent or
    /// `y` is outside the vertical extent.
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockKind {
        if !in_vertical_bounds(y) {
            return BlockKind::Air;
        }
        let Some(chunk) = self.chunks.get(&ChunkPos::containing(x, z)) else {
            return BlockKind::Air;
        };
        let (lx, lz) = ChunkPos::local_xz(x, z);
        chunk.block(lx, y as usize, lz)
    }

    /// Iterate over currently resident chunk positions.
    pub fn iter_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    fn evict_if_needed(&mut self) {
        while self.chunks.len() >= self.capacity {
            if let Some((oldest, _)) = self.lru.pop_lru() {
                self.chunks.remove(&oldest);
                trace!(pos = %oldest, "evicted chunk");
            } else {
                break;
            }
        }
    }
}
