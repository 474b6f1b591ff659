//! The running game
//!
//! Each update moves the player from the held direction, then ticks the
//! world (creatures first, events second). Event outcomes that need a
//! screen of their own, such as a locked chest or an NPC conversation, are
//! turned into overlay pushes.

use tracing::{debug, info};

use crate::constants::SCREEN_HEIGHT;
use crate::context::GameContext;
use crate::events::EventOutcome;
use crate::game_data::EntityDataStore;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

#[derive(Debug, Default)]
pub struct GameplayState {
    /// `select` pressed since the last update
    select_queued: bool,
    dialogue_candidate: Option<String>,
}

impl GameplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialogue_candidate(&self) -> Option<&str> {
        self.dialogue_candidate.as_deref()
    }

    fn cheat_hotkey(action: GameAction, ctx: &mut GameContext) -> Transition {
        match action {
            GameAction::CheatConsole => return Transition::Push(StateId::CheatConsole, EnterArgs::None),
            GameAction::GhostMode => {
                ctx.toggle_ghost();
            }
            GameAction::DebugMode => {
                ctx.toggle_debug();
            }
            GameAction::ShowAreaMode => {
                ctx.toggle_show_areas();
            }
            _ => {}
        }
        Transition::None
    }
}

impl GameState for GameplayState {
    fn id(&self) -> StateId {
        StateId::Gameplay
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _args: EnterArgs) {
        self.select_queued = false;
        self.dialogue_candidate = None;
        ctx.input.release_all();
    }

    fn on_pause(&mut self, ctx: &mut GameContext) {
        self.select_queued = false;
        ctx.input.release_all();
    }

    fn update(&mut self, dt: f32, ctx: &mut GameContext) -> Transition {
        if let Some(direction) = ctx.input.direction() {
            ctx.world.move_player(&mut ctx.data, direction, dt);
        }

        let select = std::mem::take(&mut self.select_queued);
        let tick = ctx.world.tick(dt, &mut ctx.data, &mut ctx.timers, select);
        self.dialogue_candidate = tick.dialogue_candidate;

        if tick.player_dead {
            info!(deaths = ctx.data.statistics.deaths, "Player died, back to lobby");
            ctx.notify("You died");
            return Transition::Switch(StateId::Lobby);
        }

        for outcome in tick.outcomes {
            match outcome {
                EventOutcome::LockPicking { chest_id } => {
                    return Transition::Push(StateId::LockPicking, EnterArgs::LockPicking { chest_id });
                }
                EventOutcome::Triggered { event_id, tag } => info!(%event_id, %tag, "Trigger fired"),
                other => debug!(?other, "Event outcome"),
            }
        }

        if select {
            if let Some(npc_id) = self.dialogue_candidate.clone() {
                return Transition::Push(StateId::Dialogue, EnterArgs::Dialogue { npc_id });
            }
        }
        Transition::None
    }

    fn draw(&self, ctx: &GameContext, layer: &mut DrawLayer) {
        let Some(map) = ctx.world.current_map() else {
            return;
        };

        for (marker, open) in ctx.world.events.marker_states() {
            let key = if open { "chest_open" } else { "chest_closed" };
            layer.sprite(key, marker.center.0, marker.center.1, 0);
        }

        for creature in ctx.world.entities.get_entities_for_map(map) {
            if let Some(record) = ctx.data.monster(creature.id()) {
                layer.sprite(creature.sprite_key(), record.x, record.y, creature.frame());
            }
        }

        let body = ctx.world.player_body(&ctx.data);
        layer.sprite("player", body.x, body.y, 0);

        if let Some(chest) = ctx.world.events.events().iter().find(|e| e.highlighted) {
            let (x, y) = chest.center();
            layer.text("Press select to open", x, y + 48.0, 14);
        }
        if self.dialogue_candidate.is_some() {
            layer.text("Press select to talk", body.x, body.y + 48.0, 14);
        }

        for shape in ctx.world.debug_shapes(&ctx.data, ctx.flags.show_areas || ctx.flags.debug) {
            layer.shape(shape);
        }

        let player = &ctx.data.player;
        layer.text(
            format!("HP {}/{}  LV {}", player.health, player.max_health, player.level),
            16.0,
            SCREEN_HEIGHT - 24.0,
            16,
        );
        if ctx.flags.debug {
            let (tx, ty) = ctx.data.get_player_position();
            layer.text(format!("{map} ({tx:.1}, {ty:.1})"), 16.0, SCREEN_HEIGHT - 48.0, 12);
        }
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        let Some(action) = key.action else {
            return Transition::None;
        };
        match action {
            GameAction::Escape => Transition::Push(StateId::Pause, EnterArgs::None),
            GameAction::Stats => Transition::Push(StateId::Stats, EnterArgs::None),
            GameAction::Inventory => Transition::Push(StateId::Inventory, EnterArgs::None),
            GameAction::Select => {
                self.select_queued = true;
                Transition::None
            }
            _ if ctx.flags.cheat_mode => Self::cheat_hotkey(action, ctx),
            _ => Transition::None,
        }
    }
}
