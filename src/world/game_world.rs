// GameWorld struct and map management
//
// GameWorld owns everything that belongs to the currently loaded map: the
// wall layer, the live creatures and the event triggers. Persistent state
// lives in GameData and countdowns in the shared Timers service; both are
// passed in by the caller.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collision::{Collidable, CollisionLayer, Rect};
use crate::entity::{Contact, DebugShape, Direction, EntityManager};
use crate::events::{EventManager, EventOutcome, TeleportRequest};
use crate::game_data::GameData;
use crate::map::{MapError, MapLoader, MapSource};
use crate::timer::{TimerKind, Timers};

use super::body::PlayerBody;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("no map is loaded")]
    NoMapLoaded,
}

/// What happened during one world tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldTick {
    /// Event outcomes the caller has to act on; teleports are handled here
    pub outcomes: Vec<EventOutcome>,
    pub dialogue_candidate: Option<String>,
    pub contacts: Vec<(String, Contact)>,
    pub teleported: bool,
    pub player_dead: bool,
}

pub struct GameWorld {
    maps: Box<dyn MapSource>,
    pub entities: EntityManager,
    pub events: EventManager,
    collision: CollisionLayer,
    bounds: Rect,
    current_map: Option<String>,
    rng: StdRng,
    pub ghost_mode: bool,
}

impl GameWorld {
    pub fn new(maps: Box<dyn MapSource>, entities: EntityManager) -> Self {
        Self::with_rng(maps, entities, StdRng::from_entropy())
    }

    /// Deterministic world for replays and tests
    pub fn with_seed(maps: Box<dyn MapSource>, entities: EntityManager, seed: u64) -> Self {
        Self::with_rng(maps, entities, StdRng::seed_from_u64(seed))
    }

    fn with_rng(maps: Box<dyn MapSource>, entities: EntityManager, rng: StdRng) -> Self {
        GameWorld {
            maps,
            entities,
            events: EventManager::new(),
            collision: CollisionLayer::new("", Vec::new()),
            bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
            current_map: None,
            rng,
            ghost_mode: false,
        }
    }

    pub fn current_map(&self) -> Option<&str> {
        self.current_map.as_deref()
    }

    pub fn collision(&self) -> &CollisionLayer {
        &self.collision
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Loads `name` and makes it the current map
    ///
    /// The map file is parsed before anything is torn down, so a failed
    /// load leaves the previous map untouched.
    pub fn load_map(&mut self, name: &str, data: &mut GameData, timers: &mut Timers) -> Result<(), WorldError> {
        let loaded = MapLoader::load(self.maps.as_ref(), name)?;

        if let Some(previous) = self.current_map.take() {
            self.entities.clear_map(&previous, timers);
            debug!(map = %previous, "Unloaded map");
        }
        timers.cancel_kind(TimerKind::EventCooldown);

        for zone in loaded.zones {
            data.add_zone(zone);
        }
        self.events.load_events(loaded.events, data);
        self.events.bind_markers(&loaded.chest_markers);

        self.entities.set_current_map(name);
        let mut spawned = 0;
        for request in loaded.spawns {
            if self.entities.spawn(data, request).is_some() {
                spawned += 1;
            }
        }

        self.collision = loaded.collision;
        self.bounds = loaded.bounds;
        self.current_map = Some(name.to_string());
        let (x, y) = data.get_player_position();
        data.set_player_position(x, y, Some(name));

        info!(map = name, creatures = spawned, "Entered map");
        Ok(())
    }

    /// Reloads the current map, e.g. after restoring a save
    pub fn reload_current_map(&mut self, data: &mut GameData, timers: &mut Timers) -> Result<(), WorldError> {
        let name = self.current_map.clone().ok_or(WorldError::NoMapLoaded)?;
        self.load_map(&name, data, timers)
    }

    /// Moves the player to a tile position, changing map first if asked
    ///
    /// On a failed map load the player stays where they were.
    pub fn teleport_to(
        &mut self,
        request: &TeleportRequest,
        data: &mut GameData,
        timers: &mut Timers,
    ) -> Result<(), WorldError> {
        if let Some(map) = request.target_map.as_deref() {
            self.load_map(map, data, timers)?;
        }
        data.set_player_position(request.x, request.y, request.target_map.as_deref());
        data.push_notice(format!("Teleported to ({}, {})", request.x, request.y));
        info!(x = request.x, y = request.y, map = ?request.target_map, "Player teleported");
        Ok(())
    }

    pub fn player_body(&self, data: &GameData) -> PlayerBody {
        PlayerBody::from_data(data)
    }

    /// One frame of player movement against the wall layer
    pub fn move_player(&mut self, data: &mut GameData, direction: Direction, dt: f32) -> bool {
        let mut body = PlayerBody::from_data(data);
        let speed = data.player.speed as f32;
        let moved = body.step(direction, speed, dt, &self.collision, self.ghost_mode);
        if moved {
            body.store(data);
        }
        moved
    }

    /// Zone, vision and trigger outlines for the area overlay
    pub fn debug_shapes(&self, data: &GameData, enabled: bool) -> Vec<DebugShape> {
        let mut shapes = self.entities.debug_overlay(data, enabled);
        if enabled {
            shapes.extend(self.events.events().iter().map(|event| DebugShape::EventRect {
                event_id: event.id.clone(),
                rect: event.rect,
            }));
        }
        shapes
    }

    /// Runs creatures, then events, for the current map
    pub fn tick(&mut self, dt: f32, data: &mut GameData, timers: &mut Timers, select_pressed: bool) -> WorldTick {
        let mut result = WorldTick::default();
        if self.current_map.is_none() {
            return result;
        }

        let player_rect = PlayerBody::from_data(data).bounds();
        let update = self.entities.update_all(
            dt,
            data,
            Some(player_rect),
            &self.collision,
            timers,
            &mut self.rng,
        );
        result.dialogue_candidate = update.dialogue_candidate;
        result.contacts = update.contacts;

        self.events.update(timers);
        let outcomes = self.events.check_collisions(&player_rect, select_pressed, data, timers);
        for outcome in outcomes {
            match outcome {
                EventOutcome::Teleport(request) => {
                    match self.teleport_to(&request, data, timers) {
                        Ok(()) => {
                            // Anything else that fired belongs to the map we just left
                            let stale = result.outcomes.len();
                            result.outcomes.clear();
                            result.teleported = true;
                            debug!(stale, "Dropped outcomes from previous map");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "Teleport failed");
                            data.push_notice("The way is blocked");
                        }
                    }
                }
                other => result.outcomes.push(other),
            }
        }

        data.add_play_time(dt);
        result.player_dead = data.player.is_dead();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MemoryMapSource;

    // 5x5 map with 64px tiles: height 320px, editor y 0 is world y 320
    const FOREST: &str = r#"{
        "width": 5, "height": 5, "tilewidth": 64, "tileheight": 64,
        "layers": [
            {"type": "tilelayer", "name": "collisions", "width": 5, "height": 5,
             "data": [0,0,0,0,1, 0,0,0,0,1, 0,0,0,0,1, 0,0,0,0,1, 0,0,0,0,1]},
            {"type": "objectgroup", "name": "events", "objects": [
                {"id": 1, "name": "Door", "type": "teleport", "x": 0, "y": 0, "width": 64, "height": 64,
                 "properties": [{"name": "id", "type": "string", "value": "to_cave"},
                                {"name": "target_map", "type": "string", "value": "cave"},
                                {"name": "target_x", "type": "int", "value": 2},
                                {"name": "target_y", "type": "int", "value": 2}]},
                {"id": 2, "name": "Broken", "type": "teleport", "x": 0, "y": 256, "width": 64, "height": 64,
                 "properties": [{"name": "target_map", "type": "string", "value": "nowhere"}]}
            ]},
            {"type": "objectgroup", "name": "entities", "objects": [
                {"id": 3, "point": true, "x": 160, "y": 160}
            ]}
        ]
    }"#;

    const CAVE: &str = r#"{
        "width": 4, "height": 4, "tilewidth": 64, "tileheight": 64,
        "layers": [
            {"type": "objectgroup", "name": "entities", "objects": [
                {"id": 1, "name": "Hermit", "type": "npc", "point": true, "x": 32, "y": 32}
            ]}
        ]
    }"#;

    // Locked chest and door share the top-left tile; the chest is listed first
    const JUNCTION: &str = r#"{
        "width": 5, "height": 5, "tilewidth": 64, "tileheight": 64,
        "layers": [
            {"type": "objectgroup", "name": "events", "objects": [
                {"id": 1, "name": "Chest", "type": "chest", "x": 0, "y": 0, "width": 64, "height": 64,
                 "properties": [{"name": "id", "type": "string", "value": "junction_chest"},
                                {"name": "lock", "type": "string", "value": "<>"}]},
                {"id": 2, "name": "Door", "type": "teleport", "x": 0, "y": 0, "width": 64, "height": 64,
                 "properties": [{"name": "id", "type": "string", "value": "to_cave"},
                                {"name": "target_map", "type": "string", "value": "cave"},
                                {"name": "target_x", "type": "int", "value": 2},
                                {"name": "target_y", "type": "int", "value": 2}]}
            ]}
        ]
    }"#;

    fn world() -> GameWorld {
        let mut maps = MemoryMapSource::new();
        maps.insert("forest", FOREST);
        maps.insert("junction", JUNCTION);
        maps.insert("cave", CAVE);
        GameWorld::with_seed(Box::new(maps), EntityManager::headless(), 7)
    }

    #[test]
    fn test_load_map_spawns_and_sets_player_map() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();

        world.load_map("forest", &mut data, &mut timers).unwrap();

        assert_eq!(world.current_map(), Some("forest"));
        assert_eq!(data.player.map_name.as_deref(), Some("forest"));
        assert_eq!(world.entities.len(), 1);
        assert_eq!(world.collision().walls().len(), 5);
        assert_eq!(world.events.events().len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_previous_map() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("forest", &mut data, &mut timers).unwrap();

        let err = world.load_map("nowhere", &mut data, &mut timers).unwrap_err();
        assert!(matches!(err, WorldError::Map(MapError::NotFound { .. })));
        assert_eq!(world.current_map(), Some("forest"));
        assert_eq!(world.entities.len(), 1);
    }

    #[test]
    fn test_teleport_trigger_changes_map() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("forest", &mut data, &mut timers).unwrap();
        // Standing on the door in the top-left tile
        data.set_player_position(0.5, 4.5, None);

        let tick = world.tick(1.0 / 60.0, &mut data, &mut timers, false);

        assert!(tick.teleported);
        assert_eq!(world.current_map(), Some("cave"));
        assert_eq!(data.get_player_position(), (2.0, 2.0));
        assert_eq!(data.player.map_name.as_deref(), Some("cave"));
        // Forest creatures left the live set, the cave hermit joined it
        assert_eq!(world.entities.len(), 1);
        assert!(world.entities.get("npc_cave_0").is_some());
        assert!(data.take_notices().iter().any(|n| n == "Teleported to (2, 2)"));
    }

    #[test]
    fn test_teleport_to_missing_map_leaves_player() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("forest", &mut data, &mut timers).unwrap();
        data.set_player_position(0.5, 0.5, None);

        let tick = world.tick(1.0 / 60.0, &mut data, &mut timers, false);

        assert!(!tick.teleported);
        assert_eq!(world.current_map(), Some("forest"));
        assert_eq!(data.get_player_position(), (0.5, 0.5));
        assert!(data.take_notices().iter().any(|n| n == "The way is blocked"));
    }

    #[test]
    fn test_teleport_drops_outcomes_from_old_map() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("junction", &mut data, &mut timers).unwrap();
        data.set_player_position(0.5, 4.5, None);

        let tick = world.tick(1.0 / 60.0, &mut data, &mut timers, true);

        assert!(tick.teleported);
        assert_eq!(world.current_map(), Some("cave"));
        assert!(tick.outcomes.is_empty());
        assert!(world.events.get("junction_chest").is_none());
    }

    #[test]
    fn test_move_player_respects_walls_unless_ghost() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("forest", &mut data, &mut timers).unwrap();
        // Body right edge at 3.5 * 64 + 24 = 248, wall column starts at 256
        data.set_player_position(3.5, 2.5, None);

        assert!(!world.move_player(&mut data, Direction::Right, 1.0 / 60.0));
        assert_eq!(data.get_player_position(), (3.5, 2.5));

        world.ghost_mode = true;
        assert!(world.move_player(&mut data, Direction::Right, 1.0 / 60.0));
        assert!(data.get_player_position().0 > 3.5);
    }

    #[test]
    fn test_debug_shapes_include_triggers() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();
        world.load_map("forest", &mut data, &mut timers).unwrap();

        assert!(world.debug_shapes(&data, false).is_empty());
        let shapes = world.debug_shapes(&data, true);
        let triggers = shapes
            .iter()
            .filter(|s| matches!(s, DebugShape::EventRect { .. }))
            .count();
        assert_eq!(triggers, 2);
        assert!(shapes.iter().any(|s| matches!(s, DebugShape::VisionCircle { .. })));
    }

    #[test]
    fn test_reload_without_map_fails() {
        let mut world = world();
        let mut data = GameData::new();
        let mut timers = Timers::new();

        assert!(matches!(
            world.reload_current_map(&mut data, &mut timers),
            Err(WorldError::NoMapLoaded)
        ));
    }
}
