use serde::{Deserialize, Serialize};

/// Category tag carried by every item and every stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Something that can be used from the inventory
    Consumable,

    /// Unlocks something; never stacks
    Key,

    /// Weapon or accessory that can be equipped
    Equipment,

    /// Anything else (loot, crafting leftovers)
    Misc,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Consumable => "consumable",
            ItemCategory::Key => "key",
            ItemCategory::Equipment => "equipment",
            ItemCategory::Misc => "misc",
        }
    }
}

/// Effects for consumable items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    /// Restore health
    Heal(i32),

    /// Restore mana
    RestoreMana(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        assert_eq!(ItemCategory::Key.name(), "key");
        assert_eq!(ItemCategory::Consumable.name(), "consumable");
    }
}
