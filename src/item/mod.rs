// Item system module
//
// This module provides the item layer shared by inventory, loot and saves:
// - Item definitions and their category/effect properties
// - The item catalog used to resolve ids into definitions
// - Item stacks for quantity management
// - Loot string parsing ("item_id:count" entries)

pub mod definition;
pub mod loot;
pub mod properties;
pub mod registry;
pub mod stack;

// Re-export main types for convenient access
pub use definition::ItemDefinition;
pub use loot::{parse_loot_entry, parse_loot_string, LootEntry};
pub use properties::{ConsumableEffect, ItemCategory};
pub use registry::ItemCatalog;
pub use stack::ItemStack;
