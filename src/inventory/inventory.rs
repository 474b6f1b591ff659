use crate::item::{ItemDefinition, ItemStack};
use super::error::InventoryError;
use serde::{Deserialize, Serialize};

/// Ordered list of item stacks
///
/// Capacity is unbounded: there is no slot limit and `add_item` never
/// overflows. Stacks keep insertion order so the inventory overlay shows
/// items in the order they were picked up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub stacks: Vec<ItemStack>,
}

impl Inventory {
    /// Creates a new empty inventory
    pub fn new() -> Self {
        Inventory { stacks: Vec::new() }
    }

    /// Returns true if the inventory has no items
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Counts how many of a specific item are in the inventory
    pub fn count_item(&self, item_id: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|stack| stack.item_id == item_id)
            .fold(0u32, |total, stack| total.saturating_add(stack.count))
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.count_item(item_id) > 0
    }

    /// Adds items to the inventory
    ///
    /// # Strategy
    /// 1. Stackable items merge into the existing stack with the same id
    /// 2. Otherwise a new stack is appended
    /// 3. Non-stackable items get one new stack per unit
    pub fn add_item(&mut self, def: &ItemDefinition, count: u32) {
        if count == 0 {
            return;
        }

        if def.stackable {
            if let Some(stack) = self.stacks.iter_mut().find(|s| s.can_merge_with(&def.id)) {
                stack.add(count);
                return;
            }
            self.stacks.push(ItemStack::from_definition(def, count));
        } else {
            for _ in 0..count {
                self.stacks.push(ItemStack::from_definition(def, 1));
            }
        }
    }

    /// Removes items from the inventory
    ///
    /// Stacks that reach zero are deleted. A non-stackable item removes one
    /// whole stack per unit. Returns the number of items actually removed.
    pub fn remove_item(&mut self, item_id: &str, count: u32) -> u32 {
        let mut remaining = count;
        let mut removed_total = 0;

        for stack in self.stacks.iter_mut() {
            if remaining == 0 {
                break;
            }

            if stack.item_id == item_id {
                let taken = stack.take(remaining);
                remaining -= taken;
                removed_total += taken;
            }
        }

        self.stacks.retain(|stack| !stack.is_empty());
        removed_total
    }

    /// Removes exactly `count` items, or nothing at all
    pub fn remove_exact(&mut self, item_id: &str, count: u32) -> Result<(), InventoryError> {
        let available = self.count_item(item_id);
        if available == 0 {
            return Err(InventoryError::ItemNotFound(item_id.to_string()));
        }
        if available < count {
            return Err(InventoryError::InsufficientItems {
                requested: count,
                available,
            });
        }

        self.remove_item(item_id, count);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.stacks.get(index)
    }

    /// Clears all items from the inventory
    pub fn clear(&mut self) {
        self.stacks.clear();
    }

    /// Returns an iterator over all item stacks
    pub fn iter_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.iter()
    }
}
