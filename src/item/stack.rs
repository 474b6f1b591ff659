use serde::{Deserialize, Serialize};

use super::definition::ItemDefinition;
use super::properties::ItemCategory;

/// An instance of an item with quantity
///
/// Counts are always at least 1 while the stack lives in an inventory.
/// Non-stackable stacks hold exactly one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Id of the item definition in the catalog
    pub item_id: String,

    /// Display name captured when the stack was created
    pub name: String,

    pub count: u32,

    pub stackable: bool,

    pub category: ItemCategory,
}

impl ItemStack {
    /// Creates a stack from a definition
    ///
    /// Non-stackable definitions always produce a count of 1.
    pub fn from_definition(def: &ItemDefinition, count: u32) -> Self {
        ItemStack {
            item_id: def.id.clone(),
            name: def.name.clone(),
            count: if def.stackable { count.max(1) } else { 1 },
            stackable: def.stackable,
            category: def.category,
        }
    }

    /// Returns true if this stack can absorb more of `item_id`
    pub fn can_merge_with(&self, item_id: &str) -> bool {
        self.stackable && self.item_id == item_id
    }

    /// Adds items to this stack
    pub fn add(&mut self, amount: u32) {
        self.count = self.count.saturating_add(amount);
    }

    /// Takes up to `amount` items from this stack
    ///
    /// Returns how many items were actually taken (might be less if stack is small)
    ///
    /// # Example
    /// ```
    /// use tile_rpg::item::{ItemCatalog, ItemStack};
    ///
    /// let catalog = ItemCatalog::create_default();
    /// let mut stack = ItemStack::from_definition(&catalog.resolve("bug_shell"), 5);
    /// let taken = stack.take(10);
    /// assert_eq!(taken, 5);  // Only had 5 to take
    /// assert!(stack.is_empty());
    /// ```
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.count);
        self.count -= taken;
        taken
    }

    /// Returns true if this stack is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
