//! Accessor interface behaviour code uses to read and write entity data
//!
//! Creatures, events and overlays hold only ids. Every field they need is
//! fetched through this trait on each use and written back through it, so
//! there is never a second copy of a mutable field to fall out of sync.

use crate::item::LootEntry;

use super::monster::MonsterRecord;
use super::player::PlayerRecord;
use super::properties::PropertyValue;
use super::zone::Zone;

/// Result of an id lookup across the player and monster tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityData<'a> {
    Player(&'a PlayerRecord),
    Monster(&'a MonsterRecord),
}

/// Fields addressable by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityField {
    X,
    Y,
    Health,
    MaxHealth,
    Damage,
    Speed,
    ChaseSpeed,
    VisionRange,
    IsAlive,
    ZoneId,
}

pub trait EntityDataStore {
    fn get_entity_data(&self, id: &str) -> Option<EntityData<'_>>;

    fn monster(&self, id: &str) -> Option<&MonsterRecord>;

    fn monster_mut(&mut self, id: &str) -> Option<&mut MonsterRecord>;

    /// Reads a single field; None for unknown ids or fields the entity lacks
    fn get_field(&self, id: &str, field: EntityField) -> Option<PropertyValue>;

    /// Writes a single field; false for unknown ids, fields or value types
    fn set_field(&mut self, id: &str, field: EntityField, value: PropertyValue) -> bool;

    fn zone(&self, zone_id: &str) -> Option<&Zone>;

    fn player(&self) -> &PlayerRecord;

    /// Applies creature damage to the player, returning remaining health
    fn damage_player(&mut self, amount: i32) -> i32;

    /// Grants kill experience and loot to the player
    fn reward_kill(&mut self, monster_id: &str, exp: u32, loot: &[LootEntry]);
}
