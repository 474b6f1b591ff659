use std::collections::HashMap;
use tracing::warn;

use super::definition::ItemDefinition;
use super::properties::{ConsumableEffect, ItemCategory};

/// Item ids starting with this prefix are keys (`key_<door>`)
pub const KEY_PREFIX: &str = "key_";

/// Central catalog of all item definitions
///
/// All item references (in inventories, loot tables, saves) are plain ids
/// that resolve through this catalog. Unlike a strict registry, unknown ids
/// still resolve: map authors can put any id into a loot table and the
/// player receives a generic stackable item named after it.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl ItemCatalog {
    /// Creates a new empty catalog
    pub fn new() -> Self {
        ItemCatalog {
            items: HashMap::new(),
        }
    }

    /// Creates a catalog with all built-in items pre-registered
    pub fn create_default() -> Self {
        let mut catalog = Self::new();
        catalog.register_base_items();
        catalog
    }

    /// Registers a new item definition
    ///
    /// Returns false (and keeps the existing entry) if the id is taken.
    pub fn register(&mut self, item: ItemDefinition) -> bool {
        if self.items.contains_key(&item.id) {
            warn!(item_id = %item.id, "Item already registered");
            return false;
        }

        self.items.insert(item.id.clone(), item);
        true
    }

    /// Gets a registered item definition by id
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Returns true if an item with this id is registered
    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Resolves any id into a definition
    ///
    /// Registered ids return their definition. `key_*` ids become
    /// non-stackable keys. Everything else becomes a generic stackable
    /// misc item whose display name is derived from the id.
    pub fn resolve(&self, id: &str) -> ItemDefinition {
        if let Some(def) = self.items.get(id) {
            return def.clone();
        }

        if let Some(door) = id.strip_prefix(KEY_PREFIX) {
            return ItemDefinition::new(
                id,
                format!("Key ({})", display_name(door)),
                "Opens something, somewhere.",
                false,
                ItemCategory::Key,
            );
        }

        ItemDefinition::new(id, display_name(id), "", true, ItemCategory::Misc)
    }

    // ======================================================================
    // Item Registration - Base Game Items
    // ======================================================================

    fn register_base_items(&mut self) {
        self.register(
            ItemDefinition::new(
                "healing_potion",
                "Healing Potion",
                "Restores 45 health when consumed.",
                true,
                ItemCategory::Consumable,
            )
            .with_effect(ConsumableEffect::Heal(45)),
        );

        self.register(
            ItemDefinition::new(
                "mana_potion",
                "Mana Potion",
                "Restores 30 mana when consumed.",
                true,
                ItemCategory::Consumable,
            )
            .with_effect(ConsumableEffect::RestoreMana(30)),
        );

        self.register(ItemDefinition::new(
            "bug_shell",
            "Bug Shell",
            "A hard, shiny shell. Dropped by bugs.",
            true,
            ItemCategory::Misc,
        ));

        self.register(ItemDefinition::new(
            "rusty_sword",
            "Rusty Sword",
            "Better than bare hands.",
            false,
            ItemCategory::Equipment,
        ));
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::create_default()
    }
}

/// "healing_potion" -> "Healing Potion"
fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_items_registered() {
        let catalog = ItemCatalog::create_default();
        let potion = catalog.get("healing_potion").unwrap();

        assert!(potion.stackable);
        assert_eq!(potion.effect, Some(ConsumableEffect::Heal(45)));
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut catalog = ItemCatalog::create_default();
        let dup = ItemDefinition::new("healing_potion", "Fake", "", false, ItemCategory::Misc);

        assert!(!catalog.register(dup));
        assert!(catalog.get("healing_potion").unwrap().stackable);
    }

    #[test]
    fn test_resolve_key_is_not_stackable() {
        let catalog = ItemCatalog::create_default();
        let key = catalog.resolve("key_old_gate");

        assert!(!key.stackable);
        assert_eq!(key.category, ItemCategory::Key);
        assert_eq!(key.name, "Key (Old Gate)");
    }

    #[test]
    fn test_resolve_unknown_is_generic() {
        let catalog = ItemCatalog::create_default();
        let gem = catalog.resolve("blue_gem");

        assert!(gem.stackable);
        assert_eq!(gem.name, "Blue Gem");
        assert!(!gem.is_usable());
    }
}
