// Inventory system module
//
// This module provides player-side item storage:
// - Ordered, unbounded inventory of item stacks
// - Equipment slots (one weapon, three accessories)

pub mod equipment;
pub mod error;
pub mod inventory;

// Re-export main types
pub use equipment::{Equipment, EquipmentSlot, ACCESSORY_SLOTS};
pub use error::InventoryError;
pub use inventory::Inventory;
