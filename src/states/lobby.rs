//! Title screen: new game, continue, quit

use tracing::{info, warn};

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::menu::{Menu, MenuItem};
use super::{EnterArgs, GameState, StateId, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyOption {
    NewGame,
    Continue,
    Quit,
}

impl LobbyOption {
    const ALL: [LobbyOption; 3] = [LobbyOption::NewGame, LobbyOption::Continue, LobbyOption::Quit];

    fn label(&self) -> &'static str {
        match self {
            LobbyOption::NewGame => "NEW GAME",
            LobbyOption::Continue => "CONTINUE",
            LobbyOption::Quit => "QUIT",
        }
    }
}

pub struct LobbyState {
    menu: Menu,
}

impl LobbyState {
    pub fn new() -> Self {
        let items = LobbyOption::ALL.iter().map(|o| MenuItem::new(o.label())).collect();
        LobbyState {
            menu: Menu::new("TILE RPG", items),
        }
    }

    pub fn selected_option(&self) -> LobbyOption {
        LobbyOption::ALL
            .get(self.menu.selected_index())
            .copied()
            .unwrap_or(LobbyOption::Quit)
    }

    fn confirm(&mut self, ctx: &mut GameContext) -> Transition {
        match self.selected_option() {
            LobbyOption::NewGame => match ctx.new_game() {
                Ok(()) => Transition::Switch(StateId::Gameplay),
                Err(e) => {
                    warn!(error = %e, "Could not start a new game");
                    ctx.notify("The world could not be loaded");
                    Transition::None
                }
            },
            LobbyOption::Continue => match ctx.load_game() {
                Ok(true) => Transition::Switch(StateId::Gameplay),
                Ok(false) => Transition::None,
                Err(e) => {
                    warn!(error = %e, "Could not continue");
                    ctx.notify("The save could not be loaded");
                    Transition::None
                }
            },
            LobbyOption::Quit => Transition::Quit,
        }
    }
}

impl Default for LobbyState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for LobbyState {
    fn id(&self) -> StateId {
        StateId::Lobby
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _args: EnterArgs) {
        self.menu.reset();
        let has_save = ctx.saves.save_exists(ctx.saves.get_save_slot());
        self.menu.set_enabled(1, has_save);
        info!(has_save, "Entered lobby");
    }

    fn draw(&self, _ctx: &GameContext, layer: &mut DrawLayer) {
        self.menu.draw(layer);
        layer.text("Based on real events", SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 80.0, 18);
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        match key.action {
            Some(GameAction::Up) => self.menu.select_previous(),
            Some(GameAction::Down) => self.menu.select_next(),
            Some(GameAction::Select) => return self.confirm(ctx),
            Some(GameAction::Escape) => return Transition::Quit,
            _ => {}
        }
        Transition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::test_context;

    fn press(key: &str, ctx: &GameContext) -> KeyPress {
        KeyPress::new(key, &ctx.bindings)
    }

    #[test]
    fn test_continue_disabled_without_save() {
        let (mut ctx, _dir) = test_context();
        let mut lobby = LobbyState::new();
        lobby.on_enter(&mut ctx, EnterArgs::None);

        lobby.on_key_press(&press("DOWN", &ctx), &mut ctx);
        assert_eq!(lobby.selected_option(), LobbyOption::Quit);
    }

    #[test]
    fn test_new_game_switches_to_gameplay() {
        let (mut ctx, _dir) = test_context();
        let mut lobby = LobbyState::new();
        lobby.on_enter(&mut ctx, EnterArgs::None);

        let transition = lobby.on_key_press(&press("ENTER", &ctx), &mut ctx);
        assert_eq!(transition, Transition::Switch(StateId::Gameplay));
        assert_eq!(ctx.world.current_map(), Some("town"));
    }

    #[test]
    fn test_continue_loads_existing_save() {
        let (mut ctx, _dir) = test_context();
        ctx.new_game().unwrap();
        ctx.data.add_item("healing_potion", 4);
        ctx.save_game().unwrap();
        ctx.data = crate::game_data::GameData::new();

        let mut lobby = LobbyState::new();
        lobby.on_enter(&mut ctx, EnterArgs::None);
        lobby.on_key_press(&press("DOWN", &ctx), &mut ctx);
        assert_eq!(lobby.selected_option(), LobbyOption::Continue);

        let transition = lobby.on_key_press(&press("ENTER", &ctx), &mut ctx);
        assert_eq!(transition, Transition::Switch(StateId::Gameplay));
        assert_eq!(ctx.data.get_item_count("healing_potion"), 4);
    }

    #[test]
    fn test_escape_quits() {
        let (mut ctx, _dir) = test_context();
        let mut lobby = LobbyState::new();
        assert_eq!(lobby.on_key_press(&press("ESCAPE", &ctx), &mut ctx), Transition::Quit);
    }
}
