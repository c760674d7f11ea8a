//! Sparse record of player edits layered over generated chunk data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use voxelcraft_core::{BlockKind, BlockPos};

/// World cell → block type for every cell edited since world load.
///
/// Lookups take precedence over generated chunk data. The map only grows
/// during a session; it is persisted and restored wholesale by the save
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationOverlay {
    edits: HashMap<BlockPos, BlockKind>,
}

impl ModificationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an overlay from saved entries. Later duplicates win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (BlockPos, BlockKind)>,
    {
        Self {
            edits: entries.into_iter().collect(),
        }
    }

    #[inline]
    pub fn get(&self, pos: BlockPos) -> Option<BlockKind> {
        self.edits.get(&pos).copied()
    }

    /// Record an edit, returning the previously recorded value.
    pub fn insert(&mut self, pos: BlockPos, kind: BlockKind) -> Option<BlockKind> {
        self.edits.insert(pos, kind)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, BlockKind)> + '_ {
        self.edits.iter().map(|(pos, kind)| (*pos, *kind))
    }

    /// Entries sorted by position, for stable serialization.
    pub fn sorted_entries(&self) -> Vec<(BlockPos, BlockKind)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(pos, _)| *pos);
        entries
    }
}

/// Serialized as a position-sorted list of `[pos, kind]` pairs.
impl Serialize for ModificationOverlay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let entries = self.sorted_entries();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for entry in &entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ModificationOverlay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries: Vec<(BlockPos, BlockKind)> = Vec::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut overlay = ModificationOverlay::new();
        let pos = BlockPos::new(1, 2, 3);
        assert_eq!(overlay.get(pos), None);
        assert_eq!(overlay.insert(pos, BlockKind::Stone), None);
        assert_eq!(overlay.get(pos), Some(BlockKind::Stone));
        assert_eq!(overlay.insert(pos, BlockKind::Air), Some(BlockKind::Stone));
        assert_eq!(overlay.get(pos), Some(BlockKind::Air));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn sorted_entries_are_ordered() {
        let overlay = ModificationOverlay::from_entries([
            (BlockPos::new(3, 0, 0), BlockKind::Dirt),
            (BlockPos::new(-1, 5, 0), BlockKind::Air),
            (BlockPos::new(0, 0, 0), BlockKind::Stone),
        ]);
        let positions: Vec<_> = overlay.sorted_entries().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            positions,
            vec![
                BlockPos::new(-1, 5, 0),
                BlockPos::new(0, 0, 0),
                BlockPos::new(3, 0, 0),
            ]
        );
    }

    #[test]
    fn serializes_as_entry_list() {
        let overlay = ModificationOverlay::from_entries([
            (BlockPos::new(5, 10, 5), BlockKind::Stone),
            (BlockPos::new(0, 64, 0), BlockKind::Air),
        ]);
        let json = serde_json::to_string(&overlay).unwrap();
        assert_eq!(
            json,
            r#"[[{"x":0,"y":64,"z":0},"Air"],[{"x":5,"y":10,"z":5},"Stone"]]"#
        );
        let restored: ModificationOverlay = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, overlay);
    }

    #[test]
    fn from_entries_keeps_last_duplicate() {
        let pos = BlockPos::new(0, 0, 0);
        let overlay =
            ModificationOverlay::from_entries([(pos, BlockKind::Stone), (pos, BlockKind::Glass)]);
        assert_eq!(overlay.get(pos), Some(BlockKind::Glass));
    }
}
