//! Player inventory.
//!
//! 36 block-stack slots, the first nine of which form the hotbar, plus the
//! selected slot index used for placement.

use serde::{Deserialize, Serialize};
use voxelcraft_core::BlockKind;

/// Maximum stack size for every block.
pub const STACK_LIMIT: u8 = 64;

/// Number of slots in the player inventory.
pub const INVENTORY_SIZE: usize = 36;

/// Number of hotbar slots (slots `0..HOTBAR_SIZE`).
pub const HOTBAR_SIZE: usize = 9;

/// A stack of one block kind in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStack {
    pub kind: BlockKind,
    pub count: u8,
}

impl SlotStack {
    pub fn new(kind: BlockKind, count: u8) -> Self {
        Self { kind, count }
    }

    /// Room left before the stack limit.
    pub fn remaining_space(&self) -> u8 {
        STACK_LIMIT.saturating_sub(self.count)
    }
}

/// Slot storage with stacking and hotbar selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InventoryRepr", into = "InventoryRepr")]
pub struct Inventory {
    slots: [Option<SlotStack>; INVENTORY_SIZE],
    selected: usize,
}

#[derive(Serialize, Deserialize)]
struct InventoryRepr {
    slots: Vec<Option<SlotStack>>,
    #[serde(default)]
    selected: usize,
}

impl From<Inventory> for InventoryRepr {
    fn from(inventory: Inventory) -> Self {
        Self {
            slots: inventory.slots.to_vec(),
            selected: inventory.selected,
        }
    }
}

impl TryFrom<InventoryRepr> for Inventory {
    type Error = String;

    fn try_from(repr: InventoryRepr) -> Result<Self, Self::Error> {
        let len = repr.slots.len();
        let slots: [Option<SlotStack>; INVENTORY_SIZE] = repr
            .slots
            .try_into()
            .map_err(|_| format!("expected {INVENTORY_SIZE} slots, got {len}"))?;
        if let Some(bad) = slots
            .iter()
            .flatten()
            .find(|stack| stack.count == 0 || stack.count > STACK_LIMIT || stack.kind.is_air())
        {
            return Err(format!("invalid stack {bad:?}"));
        }
        if repr.selected >= INVENTORY_SIZE {
            return Err(format!("selected slot {} out of range", repr.selected));
        }
        Ok(Self {
            slots,
            selected: repr.selected,
        })
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// An empty inventory with slot 0 selected.
    pub fn new() -> Self {
        Self {
            slots: [None; INVENTORY_SIZE],
            selected: 0,
        }
    }

    /// The new-game loadout: a full stack of each building block in the hotbar.
    pub fn starter() -> Self {
        const LOADOUT: [BlockKind; HOTBAR_SIZE] = [
            BlockKind::Dirt,
            BlockKind::Stone,
            BlockKind::Grass,
            BlockKind::Wood,
            BlockKind::Planks,
            BlockKind::Cobblestone,
            BlockKind::Sand,
            BlockKind::Glass,
            BlockKind::Log,
        ];
        let mut inventory = Self::new();
        for (slot, kind) in LOADOUT.into_iter().enumerate() {
            inventory.slots[slot] = Some(SlotStack::new(kind, STACK_LIMIT));
        }
        inventory
    }

    pub fn get(&self, slot: usize) -> Option<&SlotStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<SlotStack>; INVENTORY_SIZE] {
        &self.slots
    }

    /// Add `count` blocks of `kind`: top up matching stacks first, then fill
    /// empty slots in order. Returns whether everything fit; whatever did fit
    /// stays added.
    pub fn add(&mut self, kind: BlockKind, count: u32) -> bool {
        if kind.is_air() {
            return count == 0;
        }
        let mut remaining = count;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.kind == kind {
                let moved = remaining.min(stack.remaining_space() as u32);
                stack.count += moved as u8;
                remaining -= moved;
            }
        }

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let moved = remaining.min(STACK_LIMIT as u32);
                *slot = Some(SlotStack::new(kind, moved as u8));
                remaining -= moved;
            }
        }

        remaining == 0
    }

    /// Take up to `count` from a slot, clearing it when it runs out.
    /// Returns the amount actually removed.
    pub fn remove(&mut self, slot: usize, count: u8) -> u8 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(stack) = entry else {
            return 0;
        };
        let removed = count.min(stack.count);
        stack.count -= removed;
        if stack.count == 0 {
            *entry = None;
        }
        removed
    }

    /// Total blocks of `kind` across all slots.
    pub fn count_of(&self, kind: BlockKind) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.kind == kind)
            .map(|stack| stack.count as u32)
            .sum()
    }

    /// Select a slot. Out-of-range indices clamp to the last slot.
    pub fn select(&mut self, slot: usize) {
        self.selected = slot.min(INVENTORY_SIZE - 1);
    }

    /// Move the selection through the hotbar, wrapping at both ends.
    pub fn scroll_hotbar(&mut self, delta: i32) {
        let current = (self.selected % HOTBAR_SIZE) as i32;
        self.selected = (current + delta).rem_euclid(HOTBAR_SIZE as i32) as usize;
    }

    #[inline]
    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    pub fn selected_stack(&self) -> Option<&SlotStack> {
        self.get(self.selected)
    }

    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
