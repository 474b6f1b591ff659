// GameContext - everything the states share
//
// The context is built once by the driver and handed by reference to every
// state callback. It owns the persistent GameData, the loaded world, the
// timer service and the notification queue, plus input and save plumbing.

use std::path::PathBuf;

use tracing::info;

use crate::config::GameConfig;
use crate::constants::NOTIFICATION_SECS;
use crate::entity::{EntityManager, SpriteDirectory};
use crate::error::GameError;
use crate::game_data::GameData;
use crate::input_system::{InputState, KeyBindings};
use crate::map::FileMapSource;
use crate::notifications::NotificationQueue;
use crate::save::SaveManager;
use crate::timer::{TimerKey, Timers};
use crate::world::GameWorld;

/// Where a new game starts, in tile units
#[derive(Debug, Clone, PartialEq)]
pub struct StartPoint {
    pub map: String,
    pub x: f32,
    pub y: f32,
}

/// Runtime toggles driven by hotkeys and the cheat console
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Creature state labels and vision radii
    pub debug: bool,
    /// Zone and trigger outlines
    pub show_areas: bool,
    pub cheat_mode: bool,
}

pub struct GameContext {
    pub data: GameData,
    pub world: GameWorld,
    pub timers: Timers,
    pub notifications: NotificationQueue,
    pub bindings: KeyBindings,
    pub input: InputState,
    pub flags: DebugFlags,
    pub saves: SaveManager,
    start: StartPoint,
}

impl GameContext {
    pub fn new(world: GameWorld, saves: SaveManager, bindings: KeyBindings, start: StartPoint) -> Self {
        GameContext {
            data: GameData::new(),
            world,
            timers: Timers::new(),
            notifications: NotificationQueue::new(),
            bindings,
            input: InputState::new(),
            flags: DebugFlags::default(),
            saves,
            start,
        }
    }

    /// Builds the file-backed context described by `config`
    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        let mut saves = SaveManager::new(&config.save_dir)?;
        saves.set_save_slot(config.save_slot);
        let bindings = KeyBindings::load(&config.key_bindings_path);

        let entities = EntityManager::new(Box::new(SpriteDirectory::new(&config.sprites_dir)));
        let world = GameWorld::new(Box::new(FileMapSource::new(&config.maps_dir)), entities);
        let start = StartPoint {
            map: config.start_map.clone(),
            x: config.start_x,
            y: config.start_y,
        };

        let mut context = GameContext::new(world, saves, bindings, start);
        context.flags.cheat_mode = config.cheat_mode;
        Ok(context)
    }

    pub fn start(&self) -> &StartPoint {
        &self.start
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notifications.notify(text, NOTIFICATION_SECS);
    }

    /// Fresh GameData on the start map
    ///
    /// If the start map cannot be loaded the previous session is kept.
    pub fn new_game(&mut self) -> Result<(), GameError> {
        let mut data = GameData::new();
        let mut timers = Timers::new();
        data.set_player_position(self.start.x, self.start.y, Some(&self.start.map));

        self.world.load_map(&self.start.map, &mut data, &mut timers)?;
        self.data = data;
        self.timers = timers;
        self.input.release_all();
        info!(map = %self.start.map, "New game started");
        Ok(())
    }

    pub fn save_game(&mut self) -> Result<PathBuf, GameError> {
        let path = self.saves.save_game(&self.data)?;
        self.notify("Game saved");
        Ok(path)
    }

    /// Restores the current slot and reloads its map
    ///
    /// Returns false when the slot is empty. A save whose map fails to load
    /// is rejected and the running session is left as it was.
    pub fn load_game(&mut self) -> Result<bool, GameError> {
        let Some(mut data) = self.saves.load_game()? else {
            self.notify("No save found");
            return Ok(false);
        };

        let map = data
            .player
            .map_name
            .clone()
            .unwrap_or_else(|| self.start.map.clone());
        let mut timers = Timers::new();
        self.world.load_map(&map, &mut data, &mut timers)?;

        self.data = data;
        self.timers = timers;
        self.input.release_all();
        info!(map = %map, level = self.data.player.level, "Game loaded");
        self.notify("Game loaded");
        Ok(true)
    }

    pub fn toggle_ghost(&mut self) -> bool {
        self.world.ghost_mode = !self.world.ghost_mode;
        let on = self.world.ghost_mode;
        self.notify(if on { "Ghost mode on" } else { "Ghost mode off" });
        on
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.flags.debug = !self.flags.debug;
        let on = self.flags.debug;
        self.notify(if on { "Debug mode on" } else { "Debug mode off" });
        on
    }

    pub fn toggle_show_areas(&mut self) -> bool {
        self.flags.show_areas = !self.flags.show_areas;
        let on = self.flags.show_areas;
        self.notify(if on { "Areas shown" } else { "Areas hidden" });
        on
    }

    /// Moves notices posted to GameData into the on-screen queue
    pub fn flush_notices(&mut self) {
        for text in self.data.take_notices() {
            self.notifications.notify(text, NOTIFICATION_SECS);
        }
    }

    /// Last step of every frame: notices, timers, notification lifetimes
    ///
    /// Returns the timers that expired this frame.
    pub fn end_frame(&mut self, dt: f32) -> Vec<TimerKey> {
        self.flush_notices();
        let expired = self.timers.tick(dt);
        if !expired.is_empty() {
            tracing::trace!(count = expired.len(), "Timers expired");
        }
        self.notifications.update(dt);
        self.input.end_frame();
        expired
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_new_game_loads_start_map() {
        let (ctx, _dir) = running_context();

        assert_eq!(ctx.world.current_map(), Some("town"));
        assert_eq!(ctx.data.get_player_position(), (1.5, 1.5));
        assert!(ctx.world.entities.get("npc_town_0").is_some());
    }

    #[test]
    fn test_save_then_load_restores_data() {
        let (mut ctx, _dir) = running_context();
        ctx.data.add_item("healing_potion", 2);
        ctx.data.set_player_position(3.0, 3.0, None);
        ctx.save_game().unwrap();

        ctx.data.remove_item("healing_potion", 2);
        assert!(ctx.load_game().unwrap());
        assert_eq!(ctx.data.get_item_count("healing_potion"), 2);
        assert_eq!(ctx.data.get_player_position(), (3.0, 3.0));
        assert_eq!(ctx.world.current_map(), Some("town"));
    }

    #[test]
    fn test_load_empty_slot_keeps_session() {
        let (mut ctx, _dir) = running_context();
        ctx.data.add_item("healing_potion", 1);

        assert!(!ctx.load_game().unwrap());
        assert_eq!(ctx.data.get_item_count("healing_potion"), 1);
        assert!(ctx.notifications.messages().any(|n| n.text == "No save found"));
    }

    #[test]
    fn test_end_frame_moves_notices_to_queue() {
        let (mut ctx, _dir) = running_context();
        ctx.notifications.clear();
        ctx.data.push_notice("+1 Healing Potion");

        ctx.end_frame(0.016);
        assert_eq!(ctx.notifications.latest().map(|n| n.text.as_str()), Some("+1 Healing Potion"));
    }

    #[test]
    fn test_toggles_flip_flags() {
        let (mut ctx, _dir) = test_context();

        assert!(ctx.toggle_ghost());
        assert!(ctx.world.ghost_mode);
        assert!(!ctx.toggle_ghost());
        assert!(ctx.toggle_show_areas());
        assert!(ctx.toggle_debug());
        assert!(ctx.flags.show_areas && ctx.flags.debug);
    }
}
