use serde::{Deserialize, Serialize};

use super::error::InventoryError;

/// Number of accessory slots
pub const ACCESSORY_SLOTS: usize = 3;

/// Where an item can be equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    /// Accessory slot index (0-2)
    Accessory(usize),
}

/// Equipped item ids
///
/// Slots only reference items by id. Whether the item is actually owned is
/// checked by the caller against the inventory before equipping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub accessories: [Option<String>; ACCESSORY_SLOTS],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&str> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_deref(),
            EquipmentSlot::Accessory(i) => self.accessories.get(i)?.as_deref(),
        }
    }

    /// Puts an item into a slot, returning whatever was there before
    pub fn equip(
        &mut self,
        slot: EquipmentSlot,
        item_id: impl Into<String>,
    ) -> Result<Option<String>, InventoryError> {
        let target = self.slot_mut(slot)?;
        Ok(target.replace(item_id.into()))
    }

    /// Empties a slot, returning the item id that was in it
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Option<String>, InventoryError> {
        Ok(self.slot_mut(slot)?.take())
    }

    /// Returns true if the item is in any slot
    pub fn is_equipped(&self, item_id: &str) -> bool {
        self.weapon.as_deref() == Some(item_id)
            || self
                .accessories
                .iter()
                .any(|a| a.as_deref() == Some(item_id))
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> Result<&mut Option<String>, InventoryError> {
        match slot {
            EquipmentSlot::Weapon => Ok(&mut self.weapon),
            EquipmentSlot::Accessory(i) => self
                .accessories
                .get_mut(i)
                .ok_or(InventoryError::InvalidSlot(i)),
        }
    }
}
