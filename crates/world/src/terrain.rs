//! Chunk generation seam.
//!
//! Real terrain shaping lives outside this crate; the store only needs
//! something that can fill a freshly allocated chunk deterministically.

use rand::Rng;
use voxelcraft_core::{scoped_rng, BlockKind};

use crate::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};

/// Fills newly addressed chunks. Must be deterministic for a given seed so
/// evicted chunks regenerate identically.
pub trait ChunkGenerator {
    /// Write generated cells into `chunk` (allocated as all-air).
    fn generate(&self, chunk: &mut Chunk);
}

/// Leaves every chunk empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyGenerator;

impl ChunkGenerator for EmptyGenerator {
    fn generate(&self, _chunk: &mut Chunk) {}
}

/// Flat strata: bedrock floor, stone, a few layers of dirt and a grass top.
#[derive(Debug, Clone, Copy)]
pub struct LayeredGenerator {
    seed: u64,
    surface_y: usize,
}

/// Default grass height.
pub const DEFAULT_SURFACE_Y: usize = 64;

/// Layers above the floor that mix bedrock into the stone.
const BEDROCK_BLEND_LAYERS: usize = 5;

impl LayeredGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_surface(seed, DEFAULT_SURFACE_Y)
    }

    pub fn with_surface(seed: u64, surface_y: usize) -> Self {
        Self {
            seed,
            surface_y: surface_y.clamp(BEDROCK_BLEND_LAYERS + 4, CHUNK_HEIGHT - 1),
        }
    }

    pub fn surface_y(&self) -> usize {
        self.surface_y
    }
}

impl ChunkGenerator for LayeredGenerator {
    fn generate(&self, chunk: &mut Chunk) {
        let mut rng = scoped_rng(self.seed, chunk.position().seed_hash());
        let dirt_start = self.surface_y - 3;

        chunk.fill_layer(0, BlockKind::Bedrock);
        for y in 1..BEDROCK_BLEND_LAYERS {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    // Bedrock thins out with height.
                    let chance = 1.0 - y as f32 / BEDROCK_BLEND_LAYERS as f32;
                    let kind = if rng.gen::<f32>() < chance * 0.5 {
                        BlockKind::Bedrock
                    } else {
                        BlockKind::Stone
                    };
                    chunk.set_block(x, y, z, kind);
                }
            }
        }
        for y in BEDROCK_BLEND_LAYERS..dirt_start {
            chunk.fill_layer(y, BlockKind::Stone);
        }
        for y in dirt_start..self.surface_y {
            chunk.fill_layer(y, BlockKind::Dirt);
        }
        chunk.fill_layer(self.surface_y, BlockKind::Grass);
    }
}
