//! Live creature registry
//!
//! `EntityManager` is the factory for creatures built from map spawn data
//! and the registry that iterates them every tick. Every instance is keyed
//! by its record id. The data record stays in [`GameData`] after a creature
//! dies, so a dead id is refused on every later spawn.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::collision::{CollisionLayer, Rect};
use crate::constants::ZONE_SEARCH_RADIUS;
use crate::game_data::{EntityDataStore, GameData, Properties};
use crate::timer::{TimerKey, TimerKind, Timers};

use super::appearance::{sprite_key, AnySprites, AppearanceCatalog, SpriteSource};
use super::creature::{Contact, Creature, UpdateEnv};

use rand::rngs::StdRng;

/// Everything the map knows about one creature placement
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub id: String,
    pub name: String,
    pub monster_type: String,
    /// World pixels, creature centre
    pub position: (f32, f32),
    pub properties: Properties,
    pub map_name: String,
}

/// Aggregate result of one `update_all` pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityUpdate {
    /// First NPC that currently offers dialogue to the player
    pub dialogue_candidate: Option<String>,
    /// Ids dropped from the live set this tick
    pub removed: Vec<String>,
    pub contacts: Vec<(String, Contact)>,
}

/// Shape handed to the renderer for the debug overlay
#[derive(Debug, Clone, PartialEq)]
pub enum DebugShape {
    ZoneRect { zone_id: String, rect: Rect },
    EventRect { event_id: String, rect: Rect },
    VisionCircle { entity_id: String, center: (f32, f32), radius: f32 },
    Label { position: (f32, f32), text: String },
}

pub struct EntityManager {
    creatures: HashMap<String, Creature>,
    // Spawn order, kept so iteration is deterministic
    order: Vec<String>,
    current_map: Option<String>,
    appearances: AppearanceCatalog,
    sprites: Box<dyn SpriteSource>,
}

impl EntityManager {
    pub fn new(sprites: Box<dyn SpriteSource>) -> Self {
        EntityManager {
            creatures: HashMap::new(),
            order: Vec::new(),
            current_map: None,
            appearances: AppearanceCatalog::create_default(),
            sprites,
        }
    }

    /// Manager that assumes art exists for every type
    pub fn headless() -> Self {
        Self::new(Box::new(AnySprites))
    }

    /// Spawns a creature, returning the live instance
    ///
    /// Idempotent per id. Returns None if the stored record is dead.
    pub fn spawn(&mut self, data: &mut GameData, request: SpawnRequest) -> Option<&Creature> {
        if self.creatures.contains_key(&request.id) {
            debug!(id = %request.id, "Spawn skipped, already live");
            return self.creatures.get(&request.id);
        }

        let is_alive = data.monster(&request.id).map(|r| r.is_alive);
        match is_alive {
            Some(false) => {
                debug!(id = %request.id, "Spawn refused, record is dead");
                return None;
            }
            Some(true) => {
                debug!(id = %request.id, "Reusing stored record");
            }
            None => {
                let mut record = data.create_monster_data(
                    &request.id,
                    &request.name,
                    &request.monster_type,
                    request.position,
                    &request.properties,
                    &request.map_name,
                );
                record.zone_id = data
                    .find_nearest_zone(
                        request.position.0,
                        request.position.1,
                        &request.map_name,
                        ZONE_SEARCH_RADIUS,
                    )
                    .map(|zone| zone.id.clone());
                let alive = record.is_alive;
                data.add_mob(record);
                if !alive {
                    debug!(id = %request.id, "Spawn refused, authored with no health");
                    return None;
                }
            }
        }

        let record = data.monster(&request.id)?;
        let key = sprite_key(&record.monster_type, &record.name).to_string();
        let (key, appearance) = self.appearances.resolve(&key, self.sprites.as_ref());
        let creature = Creature::new(&request.id, &record.map_name, key, appearance);

        info!(
            id = %request.id,
            monster_type = %record.monster_type,
            zone = ?record.zone_id,
            "Creature spawned"
        );
        self.order.push(request.id.clone());
        self.creatures.insert(request.id.clone(), creature);
        self.creatures.get(&request.id)
    }

    /// Updates every living creature on the current map
    ///
    /// Creatures whose record is gone or no longer alive are dropped from
    /// the live set; their records stay in `data`.
    pub fn update_all(
        &mut self,
        dt: f32,
        data: &mut GameData,
        player: Option<Rect>,
        collision: &CollisionLayer,
        timers: &mut Timers,
        rng: &mut StdRng,
    ) -> EntityUpdate {
        let mut result = EntityUpdate::default();
        let mut env = UpdateEnv {
            player,
            collision,
            timers,
            rng,
        };

        for id in &self.order {
            let Some(creature) = self.creatures.get_mut(id) else {
                continue;
            };
            if self
                .current_map
                .as_deref()
                .is_some_and(|map| map != creature.map_name())
            {
                continue;
            }
            if !creature.is_alive(data) {
                result.removed.push(id.clone());
                continue;
            }

            let tick = creature.update(dt, data, &mut env);
            if let Some(contact) = tick.contact {
                result.contacts.push((id.clone(), contact));
                if contact.killed {
                    result.removed.push(id.clone());
                }
            }
            if creature.dialogue_available() && result.dialogue_candidate.is_none() {
                result.dialogue_candidate = Some(id.clone());
            }
        }

        for id in &result.removed {
            self.remove_entity(id, env.timers);
        }
        result
    }

    /// Drops a live instance; the data record is left alone
    pub fn remove_entity(&mut self, id: &str, timers: &mut Timers) -> bool {
        timers.cancel(&TimerKey::new(id, TimerKind::Wander));
        timers.cancel(&TimerKey::new(id, TimerKind::ContactCooldown));
        self.order.retain(|other| other != id);
        let removed = self.creatures.remove(id).is_some();
        if removed {
            debug!(id, "Creature removed from live set");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Creature> {
        self.creatures.get(id)
    }

    pub fn get_entities_for_map<'a>(&'a self, map_name: &'a str) -> impl Iterator<Item = &'a Creature> + 'a {
        self.order
            .iter()
            .filter_map(|id| self.creatures.get(id))
            .filter(move |c| c.map_name() == map_name)
    }

    /// Restricts updates to creatures of one map
    pub fn set_current_map(&mut self, map_name: impl Into<String>) {
        self.current_map = Some(map_name.into());
    }

    pub fn current_map(&self) -> Option<&str> {
        self.current_map.as_deref()
    }

    /// Drops every live instance belonging to `map_name`
    pub fn clear_map(&mut self, map_name: &str, timers: &mut Timers) {
        let ids: Vec<String> = self
            .get_entities_for_map(map_name)
            .map(|c| c.id().to_string())
            .collect();
        for id in ids {
            self.remove_entity(&id, timers);
        }
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Zone rectangles, vision radii and state labels for the current map
    pub fn debug_overlay(&self, data: &GameData, enabled: bool) -> Vec<DebugShape> {
        let Some(map) = self.current_map.as_deref() else {
            return Vec::new();
        };
        if !enabled {
            return Vec::new();
        }

        let mut shapes: Vec<DebugShape> = data
            .zones_on_map(map)
            .map(|zone| DebugShape::ZoneRect {
                zone_id: zone.id.clone(),
                rect: zone.rect.normalized(),
            })
            .collect();

        for creature in self.get_entities_for_map(map) {
            let Some(record) = data.monster(creature.id()) else {
                continue;
            };
            shapes.push(DebugShape::VisionCircle {
                entity_id: record.id.clone(),
                center: record.position(),
                radius: record.vision_range,
            });
            shapes.push(DebugShape::Label {
                position: record.position(),
                text: creature.debug_label(data),
            });
        }
        shapes
    }
}
