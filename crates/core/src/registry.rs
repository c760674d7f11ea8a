//! Static per-block-type properties.
//!
//! The registry is built once and never mutated afterwards. Lookups are a
//! plain array index by block id, so they are safe to call from the hot
//! paths (raycasts, collision sweeps) many times per frame.

use crate::block::{BlockKind, BLOCK_KIND_COUNT};
use thiserror::Error;

/// What a block yields when broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropRule {
    /// Drops one of the block that was broken.
    #[default]
    Itself,
    /// Drops a different block type.
    Block(BlockKind),
    /// Drops nothing.
    Nothing,
}

impl DropRule {
    /// Resolve the dropped kind for a broken block of `broken` type.
    pub fn resolve(self, broken: BlockKind) -> Option<BlockKind> {
        let dropped = match self {
            DropRule::Itself => broken,
            DropRule::Block(kind) => kind,
            DropRule::Nothing => return None,
        };
        (!dropped.is_air()).then_some(dropped)
    }
}

/// Properties of one block type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockProperties {
    /// Whether the block blocks movement and rays.
    pub solid: bool,
    /// Whether the block can never be broken.
    pub indestructible: bool,
    /// Seconds of continuous mining needed to break it (0 = instant).
    pub break_time_seconds: f32,
    /// Drop produced when broken.
    pub drop: DropRule,
}

impl Default for BlockProperties {
    fn default() -> Self {
        Self {
            solid: true,
            indestructible: false,
            break_time_seconds: 1.0,
            drop: DropRule::Itself,
        }
    }
}

impl BlockProperties {
    /// A solid block that drops itself.
    pub const fn solid(break_time_seconds: f32) -> Self {
        Self {
            solid: true,
            indestructible: false,
            break_time_seconds,
            drop: DropRule::Itself,
        }
    }

    /// A non-solid block (air, fluids).
    pub const fn passable() -> Self {
        Self {
            solid: false,
            indestructible: false,
            break_time_seconds: 0.0,
            drop: DropRule::Nothing,
        }
    }

    /// A solid block that cannot be broken.
    pub const fn indestructible() -> Self {
        Self {
            solid: true,
            indestructible: true,
            break_time_seconds: 0.0,
            drop: DropRule::Nothing,
        }
    }

    /// Replace the drop rule.
    pub const fn drops(mut self, drop: DropRule) -> Self {
        self.drop = drop;
        self
    }
}

/// Errors raised while assembling a custom registry.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// Air must stay non-solid so empty cells never collide.
    #[error("air cannot be solid")]
    SolidAir,
    /// Break times must be finite and non-negative.
    #[error("invalid break time {seconds} for {kind}")]
    InvalidBreakTime {
        /// Offending block.
        kind: BlockKind,
        /// Offending value.
        seconds: f32,
    },
}

/// Lookup table from block kind to [`BlockProperties`].
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    properties: [BlockProperties; BLOCK_KIND_COUNT],
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlockRegistry {
    /// The stock block catalogue.
    pub fn standard() -> Self {
        let mut properties = [BlockProperties::default(); BLOCK_KIND_COUNT];
        for kind in BlockKind::ALL {
            properties[kind.id() as usize] = standard_properties(kind);
        }
        Self { properties }
    }

    /// Copy of this registry with one entry replaced, after validation.
    pub fn with_properties(
        &self,
        kind: BlockKind,
        props: BlockProperties,
    ) -> Result<Self, RegistryError> {
        if kind.is_air() && props.solid {
            return Err(RegistryError::SolidAir);
        }
        if !props.break_time_seconds.is_finite() || props.break_time_seconds < 0.0 {
            return Err(RegistryError::InvalidBreakTime {
                kind,
                seconds: props.break_time_seconds,
            });
        }
        let mut next = self.clone();
        next.properties[kind.id() as usize] = props;
        Ok(next)
    }

    /// Properties for a block kind.
    #[inline]
    pub fn get(&self, kind: BlockKind) -> &BlockProperties {
        &self.properties[kind.id() as usize]
    }

    /// Whether the kind is solid. Air is never solid.
    #[inline]
    pub fn is_solid(&self, kind: BlockKind) -> bool {
        !kind.is_air() && self.get(kind).solid
    }

    /// Whether the kind can never be broken.
    #[inline]
    pub fn is_indestructible(&self, kind: BlockKind) -> bool {
        self.get(kind).indestructible
    }

    /// Break time in seconds.
    #[inline]
    pub fn break_time(&self, kind: BlockKind) -> f32 {
        self.get(kind).break_time_seconds
    }

    /// The kind dropped when `kind` is broken, if any.
    pub fn drop_for(&self, kind: BlockKind) -> Option<BlockKind> {
        self.get(kind).drop.resolve(kind)
    }
}

fn standard_properties(kind: BlockKind) -> BlockProperties {
    use BlockKind::*;
    match kind {
        Air | Water | Lava => BlockProperties::passable(),
        Grass => BlockProperties::solid(0.6).drops(DropRule::Block(Dirt)),
        Dirt | Sand | Snow => BlockProperties::solid(0.5),
        Ice => BlockProperties::solid(0.5).drops(DropRule::Nothing),
        Stone => BlockProperties::solid(1.5).drops(DropRule::Block(Cobblestone)),
        Cobblestone | Wood | Brick | Planks | Log => BlockProperties::solid(2.0),
        Leaves => BlockProperties::solid(0.2),
        Glass => BlockProperties::solid(0.3).drops(DropRule::Nothing),
        Clay | Gravel => BlockProperties::solid(0.6),
        CoalOre | IronOre | GoldOre | DiamondOre => BlockProperties::solid(3.0),
        Bedrock => BlockProperties::indestructible(),
        Cactus => BlockProperties::solid(0.4),
        CraftingTable | Chest => BlockProperties::solid(2.5),
        Furnace => BlockProperties::solid(3.5),
        Tnt => BlockProperties::solid(0.0),
        Obsidian => BlockProperties::solid(50.0),
        Glowstone => BlockProperties::solid(0.3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_and_fluids_are_not_solid() {
        let registry = BlockRegistry::standard();
        assert!(!registry.is_solid(BlockKind::Air));
        assert!(!registry.is_solid(BlockKind::Water));
        assert!(!registry.is_solid(BlockKind::Lava));
        assert!(registry.is_solid(BlockKind::Stone));
        assert!(registry.is_solid(BlockKind::Glass));
    }

    #[test]
    fn drop_rules_follow_catalogue() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.drop_for(BlockKind::Grass), Some(BlockKind::Dirt));
        assert_eq!(registry.drop_for(BlockKind::Stone), Some(BlockKind::Cobblestone));
        assert_eq!(registry.drop_for(BlockKind::Dirt), Some(BlockKind::Dirt));
        assert_eq!(registry.drop_for(BlockKind::Glass), None);
        assert_eq!(registry.drop_for(BlockKind::Ice), None);
        assert_eq!(registry.drop_for(BlockKind::Air), None);
    }

    #[test]
    fn bedrock_is_indestructible() {
        let registry = BlockRegistry::standard();
        assert!(registry.is_indestructible(BlockKind::Bedrock));
        assert!(registry.is_solid(BlockKind::Bedrock));
        assert!(!registry.is_indestructible(BlockKind::Obsidian));
    }

    #[test]
    fn break_times_match_catalogue() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.break_time(BlockKind::Dirt), 0.5);
        assert_eq!(registry.break_time(BlockKind::Stone), 1.5);
        assert_eq!(registry.break_time(BlockKind::Obsidian), 50.0);
        assert_eq!(registry.break_time(BlockKind::Tnt), 0.0);
    }

    #[test]
    fn with_properties_rejects_solid_air() {
        let registry = BlockRegistry::standard();
        let err = registry
            .with_properties(BlockKind::Air, BlockProperties::solid(1.0))
            .unwrap_err();
        assert_eq!(err, RegistryError::SolidAir);
    }

    #[test]
    fn with_properties_rejects_negative_break_time() {
        let registry = BlockRegistry::standard();
        let result = registry.with_properties(BlockKind::Stone, BlockProperties::solid(-1.0));
        assert!(matches!(
            result,
            Err(RegistryError::InvalidBreakTime { kind: BlockKind::Stone, .. })
        ));
    }

    #[test]
    fn with_properties_replaces_single_entry() {
        let registry = BlockRegistry::standard()
            .with_properties(BlockKind::Stone, BlockProperties::solid(2.0))
            .expect("valid override");
        assert_eq!(registry.break_time(BlockKind::Stone), 2.0);
        assert_eq!(registry.drop_for(BlockKind::Stone), Some(BlockKind::Stone));
        assert_eq!(registry.break_time(BlockKind::Dirt), 0.5);
    }
}
