//! Block identifiers and integer world coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every block type the world can hold.
///
/// The discriminant is the stable numeric id stored in chunk arrays.
/// `Air` is the reserved empty value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockKind {
    /// Empty cell.
    #[default]
    Air = 0,
    /// Grass-topped dirt.
    Grass = 1,
    /// Dirt.
    Dirt = 2,
    /// Natural stone.
    Stone = 3,
    /// Cobblestone.
    Cobblestone = 4,
    /// Oak wood.
    Wood = 5,
    /// Oak leaves.
    Leaves = 6,
    /// Sand.
    Sand = 7,
    /// Water (not solid).
    Water = 8,
    /// Glass.
    Glass = 9,
    /// Bricks.
    Brick = 10,
    /// Oak planks.
    Planks = 11,
    /// Oak log.
    Log = 12,
    /// Snow block.
    Snow = 13,
    /// Ice.
    Ice = 14,
    /// Clay.
    Clay = 15,
    /// Gravel.
    Gravel = 16,
    /// Coal ore.
    CoalOre = 17,
    /// Iron ore.
    IronOre = 18,
    /// Gold ore.
    GoldOre = 19,
    /// Diamond ore.
    DiamondOre = 20,
    /// Bedrock (indestructible).
    Bedrock = 21,
    /// Lava (not solid).
    Lava = 22,
    /// Cactus.
    Cactus = 23,
    /// Crafting table.
    CraftingTable = 24,
    /// Furnace.
    Furnace = 25,
    /// Chest.
    Chest = 26,
    /// TNT.
    Tnt = 27,
    /// Obsidian.
    Obsidian = 28,
    /// Glowstone.
    Glowstone = 29,
}

/// Number of distinct block kinds.
pub const BLOCK_KIND_COUNT: usize = 30;

impl BlockKind {
    /// All kinds in id order.
    pub const ALL: [BlockKind; BLOCK_KIND_COUNT] = [
        BlockKind::Air,
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Cobblestone,
        BlockKind::Wood,
        BlockKind::Leaves,
        BlockKind::Sand,
        BlockKind::Water,
        BlockKind::Glass,
        BlockKind::Brick,
        BlockKind::Planks,
        BlockKind::Log,
        BlockKind::Snow,
        BlockKind::Ice,
        BlockKind::Clay,
        BlockKind::Gravel,
        BlockKind::CoalOre,
        BlockKind::IronOre,
        BlockKind::GoldOre,
        BlockKind::DiamondOre,
        BlockKind::Bedrock,
        BlockKind::Lava,
        BlockKind::Cactus,
        BlockKind::CraftingTable,
        BlockKind::Furnace,
        BlockKind::Chest,
        BlockKind::Tnt,
        BlockKind::Obsidian,
        BlockKind::Glowstone,
    ];

    /// Numeric id used in chunk storage.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a kind by numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// True for the reserved empty value.
    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockKind::Air)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Integer world cell coordinate.
///
/// Ordered by (x, y, z) so sorted collections iterate deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// World Y (vertical).
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Construct a cell coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing a floating-point world position.
    pub fn containing(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
            z: z.floor() as i32,
        }
    }

    /// This cell shifted by the given deltas.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
