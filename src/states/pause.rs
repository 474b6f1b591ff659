//! Pause Menu
//!
//! Provides the in-game pause overlay with four options:
//! - Resume: closes the overlay
//! - Save: writes the current slot and stays open
//! - Load: restores the current slot and returns to the game
//! - Exit to lobby: abandons the session

use tracing::warn;

use crate::context::GameContext;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::menu::{Menu, MenuItem};
use super::{EnterArgs, GameState, StateId, Transition};

/// Options in the pause menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOption {
    Resume,
    Save,
    Load,
    ExitToLobby,
}

impl PauseOption {
    const ALL: [PauseOption; 4] = [
        PauseOption::Resume,
        PauseOption::Save,
        PauseOption::Load,
        PauseOption::ExitToLobby,
    ];

    fn label(&self) -> &'static str {
        match self {
            PauseOption::Resume => "RESUME",
            PauseOption::Save => "SAVE",
            PauseOption::Load => "LOAD",
            PauseOption::ExitToLobby => "EXIT TO LOBBY",
        }
    }
}

pub struct PauseState {
    menu: Menu,
}

impl PauseState {
    pub fn new() -> Self {
        let items = PauseOption::ALL.iter().map(|o| MenuItem::new(o.label())).collect();
        PauseState {
            menu: Menu::new("PAUSE", items),
        }
    }

    /// Get selected option
    pub fn selected_option(&self) -> PauseOption {
        match self.menu.selected_index() {
            0 => PauseOption::Resume,
            1 => PauseOption::Save,
            2 => PauseOption::Load,
            3 => PauseOption::ExitToLobby,
            _ => PauseOption::Resume, // Default to resume if out of bounds
        }
    }

    fn confirm(&mut self, ctx: &mut GameContext) -> Transition {
        match self.selected_option() {
            PauseOption::Resume => Transition::Pop,
            PauseOption::Save => {
                if let Err(e) = ctx.save_game() {
                    warn!(error = %e, "Save failed");
                    ctx.notify("Save failed");
                }
                Transition::None
            }
            PauseOption::Load => match ctx.load_game() {
                Ok(true) => Transition::Pop,
                Ok(false) => Transition::None,
                Err(e) => {
                    warn!(error = %e, "Load failed");
                    ctx.notify("The save could not be loaded");
                    Transition::None
                }
            },
            PauseOption::ExitToLobby => Transition::Switch(StateId::Lobby),
        }
    }
}

impl Default for PauseState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for PauseState {
    fn id(&self) -> StateId {
        StateId::Pause
    }

    fn on_enter(&mut self, _ctx: &mut GameContext, _args: EnterArgs) {
        self.menu.reset();
    }

    fn draw(&self, _ctx: &GameContext, layer: &mut DrawLayer) {
        self.menu.draw(layer);
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        match key.action {
            Some(GameAction::Up) => self.menu.select_previous(),
            Some(GameAction::Down) => self.menu.select_next(),
            Some(GameAction::Select) => return self.confirm(ctx),
            Some(GameAction::Escape) => return Transition::Pop,
            _ => {}
        }
        Transition::None
    }
}
