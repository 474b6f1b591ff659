//! Central authoritative game-data store
//!
//! `GameData` owns every piece of mutable player and world state: the
//! player record, monster and NPC instance records, monster zones, chest
//! state and play statistics. Other subsystems hold ids only and go through
//! the accessors here (or the [`EntityDataStore`] trait) for every read and
//! write, which keeps save/load trivially consistent: saving is a dump of
//! this one struct.
//!
//! # Architecture
//!
//! - `player`: `PlayerRecord`, stat changes and level-up
//! - `monster`: `MonsterRecord`, `MonsterTemplate` and the overlay rules
//! - `zone`: creature home regions
//! - `properties`: typed map-authored property values
//! - `store`: the id-based accessor trait used by behaviour code
//!
//! User-facing messages produced by data changes ("Level up!") are queued
//! as notices and drained by the owner of the notification queue with
//! [`GameData::take_notices`].

pub mod monster;
pub mod player;
pub mod properties;
pub mod store;
pub mod zone;

pub use monster::{Behavior, DialogueDefaults, MonsterRecord, MonsterTemplate};
pub use player::{LevelUp, PlayerRecord, PLAYER_ID};
pub use properties::{Properties, PropertyValue};
pub use store::{EntityData, EntityDataStore, EntityField};
pub use zone::Zone;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::TILE_SIZE;
use crate::inventory::{EquipmentSlot, InventoryError};
use crate::item::{ConsumableEffect, ItemCatalog, LootEntry};
use crate::stats::{PlayerStat, StatOp};

/// Counters shown on the stats screen and kept in saves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub enemies_killed: u32,
    pub items_collected: u32,
    pub play_time_secs: f64,
    pub deaths: u32,
}

/// Persistent state of one chest event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChestRecord {
    pub is_empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub player: PlayerRecord,
    monsters: HashMap<String, MonsterRecord>,
    zones: HashMap<String, Zone>,
    chests: HashMap<String, ChestRecord>,
    pub statistics: GameStatistics,

    #[serde(skip, default = "MonsterTemplate::default_set")]
    templates: HashMap<String, MonsterTemplate>,
    #[serde(skip)]
    catalog: ItemCatalog,
    #[serde(skip)]
    notices: Vec<String>,
}

impl GameData {
    pub fn new() -> Self {
        GameData {
            player: PlayerRecord::default(),
            monsters: HashMap::new(),
            zones: HashMap::new(),
            chests: HashMap::new(),
            statistics: GameStatistics::default(),
            templates: MonsterTemplate::default_set(),
            catalog: ItemCatalog::create_default(),
            notices: Vec::new(),
        }
    }

    // ======================================================================
    // Player position
    // ======================================================================

    /// Player position in tile units
    pub fn get_player_position(&self) -> (f32, f32) {
        (self.player.x, self.player.y)
    }

    /// Player position in world pixels
    pub fn get_player_pixel_position(&self) -> (f32, f32) {
        (self.player.x * TILE_SIZE, self.player.y * TILE_SIZE)
    }

    pub fn set_player_position(&mut self, x: f32, y: f32, map_name: Option<&str>) {
        self.player.x = x;
        self.player.y = y;
        if let Some(map) = map_name {
            self.player.map_name = Some(map.to_string());
        }
    }

    // ======================================================================
    // Player stats
    // ======================================================================

    /// Reads a stat by name; unknown names log a warning and return None
    pub fn get_player_stat(&self, name: &str) -> Option<i32> {
        match name.parse::<PlayerStat>() {
            Ok(stat) => Some(self.player.stat(stat)),
            Err(err) => {
                warn!(%err, "get_player_stat failed");
                None
            }
        }
    }

    /// Changes a stat by name with a named operation
    ///
    /// Returns false (and logs) for an unknown stat or operation. The result
    /// is clamped to the stat's valid range.
    pub fn change_player_stat(&mut self, name: &str, op: &str, value: f64) -> bool {
        let stat = match name.parse::<PlayerStat>() {
            Ok(stat) => stat,
            Err(err) => {
                warn!(%err, "change_player_stat failed");
                return false;
            }
        };
        let op = match op.parse::<StatOp>() {
            Ok(op) => op,
            Err(err) => {
                warn!(%err, "change_player_stat failed");
                return false;
            }
        };

        self.change_stat(stat, op, value);
        true
    }

    /// Typed version of [`GameData::change_player_stat`], returning the new value
    pub fn change_stat(&mut self, stat: PlayerStat, op: StatOp, value: f64) -> i32 {
        let (new_value, level_up) = self.player.apply_stat_change(stat, op, value);
        if let Some(level_up) = level_up {
            self.announce_level_up(level_up);
        }
        new_value
    }

    /// Forces a level-up regardless of current exp
    pub fn level_up(&mut self) -> LevelUp {
        let level_up = self.player.level_up();
        self.announce_level_up(level_up);
        level_up
    }

    fn announce_level_up(&mut self, level_up: LevelUp) {
        info!(level = level_up.new_level, req_exp = level_up.new_req_exp, "Player levelled up");
        self.push_notice(format!("Level up! You are now level {}", level_up.new_level));
    }

    /// Returns remaining health
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let was_alive = !self.player.is_dead();
        let health = self.change_stat(PlayerStat::Health, StatOp::Subtract, amount as f64);
        if was_alive && health == 0 {
            self.statistics.deaths = self.statistics.deaths.saturating_add(1);
            info!("Player died");
        }
        health
    }

    /// Returns how much health was actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.player.health;
        self.change_stat(PlayerStat::Health, StatOp::Add, amount as f64) - before
    }

    pub fn add_exp(&mut self, amount: u32) -> Option<LevelUp> {
        let level_before = self.player.level;
        self.change_stat(PlayerStat::Exp, StatOp::Add, amount as f64);
        (self.player.level > level_before).then_some(LevelUp {
            new_level: self.player.level,
            new_req_exp: self.player.req_exp,
        })
    }

    // ======================================================================
    // Inventory
    // ======================================================================

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Adds items, resolving the id through the item catalog
    pub fn add_item(&mut self, item_id: &str, count: u32) {
        if count == 0 {
            return;
        }
        let def = self.catalog.resolve(item_id);
        self.player.inventory.add_item(&def, count);
        self.statistics.items_collected = self.statistics.items_collected.saturating_add(count);
        debug!(item_id, count, "Item added");
    }

    /// Returns false if the player had none of the item
    pub fn remove_item(&mut self, item_id: &str, count: u32) -> bool {
        let removed = self.player.inventory.remove_item(item_id, count.max(1));
        if removed == 0 {
            debug!(item_id, "remove_item: not in inventory");
        }
        removed > 0
    }

    pub fn get_item_count(&self, item_id: &str) -> u32 {
        self.player.inventory.count_item(item_id)
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.player.inventory.has_item(item_id)
    }

    /// Uses one unit of an item
    ///
    /// Returns true if the item had an effect and was consumed. Every
    /// outcome is reported as a notice.
    pub fn use_item(&mut self, item_id: &str) -> bool {
        if !self.has_item(item_id) {
            self.push_notice(format!("You don't have {item_id}"));
            return false;
        }

        let def = self.catalog.resolve(item_id);
        match def.effect {
            None => {
                self.push_notice(format!("{} can't be used", def.name));
                false
            }
            Some(ConsumableEffect::Heal(amount)) => {
                if self.player.is_full_health() {
                    self.push_notice("Already at full health");
                    return false;
                }
                let healed = self.heal(amount);
                self.remove_item(item_id, 1);
                self.push_notice(format!("Restored {healed} health"));
                true
            }
            Some(ConsumableEffect::RestoreMana(_)) => {
                self.push_notice("Nothing happens");
                false
            }
        }
    }

    /// Equips an owned item, returning whatever was in the slot
    pub fn equip(
        &mut self,
        slot: EquipmentSlot,
        item_id: &str,
    ) -> Result<Option<String>, InventoryError> {
        if !self.has_item(item_id) {
            return Err(InventoryError::ItemNotFound(item_id.to_string()));
        }
        self.player.equipment.equip(slot, item_id)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Option<String>, InventoryError> {
        self.player.equipment.unequip(slot)
    }

    // ======================================================================
    // Monsters
    // ======================================================================

    pub fn register_template(&mut self, template: MonsterTemplate) {
        self.templates
            .insert(template.monster_type.clone(), template);
    }

    /// Template for a type, or a generic one (with a warning) if unknown
    pub fn template(&self, monster_type: &str) -> MonsterTemplate {
        match self.templates.get(monster_type) {
            Some(template) => template.clone(),
            None => {
                warn!(monster_type, "No template for monster type, using generic");
                MonsterTemplate::generic(monster_type)
            }
        }
    }

    /// Builds a record from the type's template plus map-authored overrides
    pub fn create_monster_data(
        &self,
        monster_id: &str,
        name: &str,
        monster_type: &str,
        position: (f32, f32),
        properties: &Properties,
        map_name: &str,
    ) -> MonsterRecord {
        let template = self.template(monster_type);
        let mut record = MonsterRecord::from_template(&template, monster_id, name, position, map_name);
        record.apply_overrides(&template, properties);
        record
    }

    pub fn add_mob(&mut self, record: MonsterRecord) {
        self.monsters.insert(record.id.clone(), record);
    }

    pub fn remove_mob(&mut self, monster_id: &str) -> Option<MonsterRecord> {
        self.monsters.remove(monster_id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterRecord> {
        self.monsters.values()
    }

    // ======================================================================
    // Zones
    // ======================================================================

    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.id.clone(), zone);
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.get(zone_id)
    }

    pub fn zones_on_map<'a>(&'a self, map_name: &'a str) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.values().filter(move |z| z.map_name == map_name)
    }

    /// Closest zone on `map_name` whose centre is within `max_distance`
    pub fn find_nearest_zone(&self, x: f32, y: f32, map_name: &str, max_distance: f32) -> Option<&Zone> {
        self.zones
            .values()
            .filter(|zone| zone.map_name == map_name)
            .map(|zone| (zone, zone.distance_to(x, y)))
            .filter(|(_, dist)| *dist <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(zone, _)| zone)
    }

    // ======================================================================
    // Chests
    // ======================================================================

    pub fn is_chest_emptied(&self, chest_id: &str) -> bool {
        self.chests.get(chest_id).is_some_and(|c| c.is_empty)
    }

    pub fn set_chest_emptied(&mut self, chest_id: &str) {
        self.chests.entry(chest_id.to_string()).or_default().is_empty = true;
    }

    // ======================================================================
    // Notices and bookkeeping
    // ======================================================================

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    /// Drains queued user-facing messages
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn add_play_time(&mut self, dt: f32) {
        self.statistics.play_time_secs += dt as f64;
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityDataStore for GameData {
    fn get_entity_data(&self, id: &str) -> Option<EntityData<'_>> {
        if id == self.player.id {
            return Some(EntityData::Player(&self.player));
        }
        self.monsters.get(id).map(EntityData::Monster)
    }

    fn monster(&self, id: &str) -> Option<&MonsterRecord> {
        self.monsters.get(id)
    }

    fn monster_mut(&mut self, id: &str) -> Option<&mut MonsterRecord> {
        self.monsters.get_mut(id)
    }

    fn get_field(&self, id: &str, field: EntityField) -> Option<PropertyValue> {
        match self.get_entity_data(id)? {
            EntityData::Player(p) => match field {
                EntityField::X => Some(PropertyValue::Float(p.x as f64)),
                EntityField::Y => Some(PropertyValue::Float(p.y as f64)),
                EntityField::Health => Some(PropertyValue::Int(p.health as i64)),
                EntityField::MaxHealth => Some(PropertyValue::Int(p.max_health as i64)),
                EntityField::Speed => Some(PropertyValue::Float(p.speed as f64)),
                EntityField::IsAlive => Some(PropertyValue::Bool(!p.is_dead())),
                _ => None,
            },
            EntityData::Monster(m) => match field {
                EntityField::X => Some(PropertyValue::Float(m.x as f64)),
                EntityField::Y => Some(PropertyValue::Float(m.y as f64)),
                EntityField::Health => Some(PropertyValue::Int(m.health as i64)),
                EntityField::MaxHealth => Some(PropertyValue::Int(m.max_health as i64)),
                EntityField::Damage => Some(PropertyValue::Int(m.damage as i64)),
                EntityField::Speed => Some(PropertyValue::Float(m.speed as f64)),
                EntityField::ChaseSpeed => Some(PropertyValue::Float(m.chase_speed as f64)),
                EntityField::VisionRange => Some(PropertyValue::Float(m.vision_range as f64)),
                EntityField::IsAlive => Some(PropertyValue::Bool(m.is_alive)),
                EntityField::ZoneId => m.zone_id.clone().map(PropertyValue::Str),
            },
        }
    }

    fn set_field(&mut self, id: &str, field: EntityField, value: PropertyValue) -> bool {
        let Some(m) = self.monsters.get_mut(id) else {
            if id == self.player.id {
                return match (field, value.as_f64()) {
                    (EntityField::X, Some(v)) => {
                        self.player.x = v as f32;
                        true
                    }
                    (EntityField::Y, Some(v)) => {
                        self.player.y = v as f32;
                        true
                    }
                    (EntityField::Health, Some(v)) => {
                        self.change_stat(PlayerStat::Health, StatOp::Set, v);
                        true
                    }
                    _ => false,
                };
            }
            return false;
        };

        let applied = match field {
            EntityField::X => value.as_f64().map(|v| m.x = v as f32),
            EntityField::Y => value.as_f64().map(|v| m.y = v as f32),
            EntityField::Health => value
                .as_i64()
                .map(|v| m.health = (v as i32).clamp(0, m.max_health)),
            EntityField::MaxHealth => value.as_i64().map(|v| {
                m.max_health = (v as i32).max(1);
                m.health = m.health.min(m.max_health);
            }),
            EntityField::Damage => value.as_i64().map(|v| m.damage = v as i32),
            EntityField::Speed => value.as_f64().map(|v| m.speed = v as f32),
            EntityField::ChaseSpeed => value.as_f64().map(|v| m.chase_speed = v as f32),
            EntityField::VisionRange => value.as_f64().map(|v| m.vision_range = v as f32),
            EntityField::IsAlive => match value {
                PropertyValue::Bool(v) => {
                    m.is_alive = v;
                    Some(())
                }
                _ => None,
            },
            EntityField::ZoneId => value.as_str().map(|v| m.zone_id = Some(v.to_string())),
        };
        applied.is_some()
    }

    fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.get(zone_id)
    }

    fn player(&self) -> &PlayerRecord {
        &self.player
    }

    fn damage_player(&mut self, amount: i32) -> i32 {
        self.take_damage(amount)
    }

    fn reward_kill(&mut self, monster_id: &str, exp: u32, loot: &[LootEntry]) {
        self.statistics.enemies_killed = self.statistics.enemies_killed.saturating_add(1);

        let name = self
            .monsters
            .get(monster_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| monster_id.to_string());
        self.push_notice(format!("{name} defeated!"));

        self.add_exp(exp);
        for entry in loot {
            self.add_item(&entry.item_id, entry.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Rect;

    #[test]
    fn test_health_subtract_clamps_at_zero() {
        let mut data = GameData::new();
        assert!(data.change_player_stat("health", "subtract", 999.0));

        assert_eq!(data.get_player_stat("health"), Some(0));
        assert_eq!(data.take_damage(5), 0);
    }

    #[test]
    fn test_unknown_stat_or_op_fails() {
        let mut data = GameData::new();
        assert!(!data.change_player_stat("mana", "add", 1.0));
        assert!(!data.change_player_stat("health", "pow", 2.0));
        assert_eq!(data.get_player_stat("mana"), None);
        assert_eq!(data.player.health, 40);
    }

    #[test]
    fn test_divide_by_zero_keeps_value() {
        let mut data = GameData::new();
        assert!(data.change_player_stat("strength", "divide", 0.0));
        assert_eq!(data.player.strength, 5);
    }

    #[test]
    fn test_level_up_scenario() {
        let mut data = GameData::new();
        assert!(data.change_player_stat("exp", "add", 500.0));

        assert_eq!(data.player.level, 2);
        assert_eq!(data.player.exp, 0);
        assert_eq!(data.player.req_exp, 750);
        assert_eq!(data.player.max_health, 52);
        assert_eq!(data.player.strength, 6);

        let notices = data.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("level 2"));
        assert!(data.take_notices().is_empty());
    }

    #[test]
    fn test_huge_item_counts_saturate() {
        let mut data = GameData::new();
        data.add_item("bug_shell", u32::MAX);
        data.add_item("bug_shell", u32::MAX);

        assert_eq!(data.get_item_count("bug_shell"), u32::MAX);
        assert_eq!(data.statistics.items_collected, u32::MAX);
    }

    #[test]
    fn test_inventory_round_trip() {
        let mut data = GameData::new();
        data.add_item("potion", 3);
        assert!(data.remove_item("potion", 2));

        assert_eq!(data.player.inventory.len(), 1);
        assert_eq!(data.get_item_count("potion"), 1);

        assert!(data.remove_item("potion", 1));
        assert_eq!(data.get_item_count("potion"), 0);
        assert!(!data.has_item("potion"));
        assert!(!data.remove_item("potion", 1));
    }

    #[test]
    fn test_use_healing_potion() {
        let mut data = GameData::new();
        data.add_item("healing_potion", 2);

        // Full health: item kept
        assert!(!data.use_item("healing_potion"));
        assert_eq!(data.get_item_count("healing_potion"), 2);

        data.take_damage(30);
        assert!(data.use_item("healing_potion"));
        assert_eq!(data.player.health, 40);
        assert_eq!(data.get_item_count("healing_potion"), 1);
    }

    #[test]
    fn test_equip_requires_item() {
        let mut data = GameData::new();
        assert_eq!(
            data.equip(EquipmentSlot::Weapon, "rusty_sword"),
            Err(InventoryError::ItemNotFound("rusty_sword".to_string()))
        );

        data.add_item("rusty_sword", 1);
        assert_eq!(data.equip(EquipmentSlot::Weapon, "rusty_sword"), Ok(None));
    }

    #[test]
    fn test_find_nearest_zone() {
        let mut data = GameData::new();
        data.add_zone(Zone::new("near", Rect::new(0.0, 0.0, 100.0, 100.0), "forest"));
        data.add_zone(Zone::new("far", Rect::new(400.0, 0.0, 100.0, 100.0), "forest"));
        data.add_zone(Zone::new("other_map", Rect::new(40.0, 40.0, 20.0, 20.0), "cave"));

        let zone = data.find_nearest_zone(60.0, 50.0, "forest", 512.0).unwrap();
        assert_eq!(zone.id, "near");
        assert!(data.find_nearest_zone(2000.0, 2000.0, "forest", 512.0).is_none());
        assert!(data.find_nearest_zone(60.0, 50.0, "desert", 512.0).is_none());
    }

    #[test]
    fn test_create_monster_data_uses_template() {
        let data = GameData::new();
        let mut props = Properties::new();
        props.insert("damage".to_string(), PropertyValue::Int(9));

        let record = data.create_monster_data("bug_forest_0", "Bug", "bug", (10.0, 20.0), &props, "forest");
        assert_eq!(record.damage, 9);
        assert_eq!(record.health, record.max_health);
        assert_eq!(record.map_name, "forest");
        assert!(record.is_alive);
    }

    #[test]
    fn test_entity_data_dispatch() {
        let mut data = GameData::new();
        let record = data.create_monster_data("bug_forest_0", "Bug", "bug", (0.0, 0.0), &Properties::new(), "forest");
        data.add_mob(record);

        assert!(matches!(data.get_entity_data("player"), Some(EntityData::Player(_))));
        assert!(matches!(data.get_entity_data("bug_forest_0"), Some(EntityData::Monster(_))));
        assert!(data.get_entity_data("ghost").is_none());

        assert!(data.set_field("bug_forest_0", EntityField::Health, PropertyValue::Int(-5)));
        assert_eq!(
            data.get_field("bug_forest_0", EntityField::Health),
            Some(PropertyValue::Int(0))
        );
        assert!(!data.set_field("bug_forest_0", EntityField::IsAlive, PropertyValue::Int(0)));
    }

    #[test]
    fn test_registered_template_and_remove() {
        let mut data = GameData::new();
        data.register_template(MonsterTemplate {
            monster_type: "slime".to_string(),
            health: 77,
            max_health: 77,
            ..MonsterTemplate::bug()
        });

        let record = data.create_monster_data("slime_cave_0", "Slime", "slime", (0.0, 0.0), &Properties::new(), "cave");
        assert_eq!(record.max_health, 77);
        data.add_mob(record);

        let removed = data.remove_mob("slime_cave_0").unwrap();
        assert_eq!(removed.name, "Slime");
        assert!(data.monster("slime_cave_0").is_none());
        assert!(data.remove_mob("slime_cave_0").is_none());
    }

    #[test]
    fn test_reward_kill() {
        let mut data = GameData::new();
        data.reward_kill("bug_forest_0", 10, &[LootEntry::new("bug_shell", 2)]);

        assert_eq!(data.statistics.enemies_killed, 1);
        assert_eq!(data.player.exp, 10);
        assert_eq!(data.get_item_count("bug_shell"), 2);
    }

    #[test]
    fn test_chest_state() {
        let mut data = GameData::new();
        assert!(!data.is_chest_emptied("chest_1"));
        data.set_chest_emptied("chest_1");
        assert!(data.is_chest_emptied("chest_1"));
    }
}
