use serde::{Deserialize, Serialize};
use super::properties::{ConsumableEffect, ItemCategory};

/// Static description of one item type, shared by every stack of it
///
/// Stacks in an inventory refer back to a definition by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Catalog key, also what saves store
    pub id: String,

    pub name: String,

    /// Description shown in the inventory overlay
    pub description: String,

    /// Non-stackable items always occupy their own stack of 1
    pub stackable: bool,

    pub category: ItemCategory,

    /// What happens when the item is used (None = not usable)
    pub effect: Option<ConsumableEffect>,
}

impl ItemDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        stackable: bool,
        category: ItemCategory,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            stackable,
            category,
            effect: None,
        }
    }

    /// Builder-style setter for the consumable effect
    pub fn with_effect(mut self, effect: ConsumableEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Returns true if the item does something when used
    pub fn is_usable(&self) -> bool {
        self.effect.is_some()
    }
}
