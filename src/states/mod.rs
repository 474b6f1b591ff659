//! Game flow: one base state plus a stack of modal overlays
//!
//! Every screen is a [`GameState`] registered once with the
//! [`GameStateManager`]. States never call the manager directly; each
//! callback returns a [`Transition`] which the manager applies after the
//! callback finishes.
//!
//! - base states: `lobby`, `gameplay`
//! - overlays: `pause`, `inventory`, `stats`, `dialogue`, `cheat_console`,
//!   `lock_picking`

pub mod cheat_console;
pub mod dialogue;
pub mod draw;
pub mod gameplay;
pub mod inventory;
pub mod lobby;
pub mod lock_picking;
pub mod manager;
pub mod menu;
pub mod pause;
pub mod stats;

use std::fmt;
use std::str::FromStr;

use crate::context::GameContext;
use crate::input_system::KeyPress;

pub use cheat_console::{CheatCommand, CheatConsoleState, CheatError};
pub use dialogue::{DialogueCatalog, DialogueState};
pub use draw::{DrawCommand, DrawLayer, DrawList};
pub use gameplay::GameplayState;
pub use inventory::InventoryState;
pub use lobby::LobbyState;
pub use lock_picking::{LockPickingState, LockStatus};
pub use manager::GameStateManager;
pub use menu::{Menu, MenuItem};
pub use pause::PauseState;
pub use stats::{StatsSnapshot, StatsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Lobby,
    Gameplay,
    Pause,
    Inventory,
    Stats,
    Dialogue,
    CheatConsole,
    LockPicking,
}

impl StateId {
    pub const ALL: [StateId; 8] = [
        StateId::Lobby,
        StateId::Gameplay,
        StateId::Pause,
        StateId::Inventory,
        StateId::Stats,
        StateId::Dialogue,
        StateId::CheatConsole,
        StateId::LockPicking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StateId::Lobby => "lobby",
            StateId::Gameplay => "gameplay",
            StateId::Pause => "pause",
            StateId::Inventory => "inventory",
            StateId::Stats => "stats",
            StateId::Dialogue => "dialogue",
            StateId::CheatConsole => "cheat_console",
            StateId::LockPicking => "lock_picking",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("unknown state: {s}"))
    }
}

/// Data handed to `on_enter`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EnterArgs {
    #[default]
    None,
    LockPicking {
        chest_id: String,
    },
    Dialogue {
        npc_id: String,
    },
}

/// What the manager should do once a callback returns
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Transition {
    #[default]
    None,
    Switch(StateId),
    Push(StateId, EnterArgs),
    Pop,
    Quit,
}

/// One screen of the game
///
/// The same instance is reused across activations, so `on_enter` is where a
/// state resets itself.
pub trait GameState {
    fn id(&self) -> StateId;

    fn on_enter(&mut self, _ctx: &mut GameContext, _args: EnterArgs) {}

    fn on_exit(&mut self, _ctx: &mut GameContext) {}

    /// Another overlay was pushed on top of this state
    fn on_pause(&mut self, _ctx: &mut GameContext) {}

    /// The overlay above this state was popped
    fn on_resume(&mut self, _ctx: &mut GameContext) {}

    fn update(&mut self, _dt: f32, _ctx: &mut GameContext) -> Transition {
        Transition::None
    }

    fn draw(&self, ctx: &GameContext, layer: &mut DrawLayer);

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition;

    fn on_key_release(&mut self, _key: &KeyPress, _ctx: &mut GameContext) {}
}

/// All eight states, ready to register
pub fn default_states() -> Vec<Box<dyn GameState>> {
    vec![
        Box::new(LobbyState::new()),
        Box::new(GameplayState::new()),
        Box::new(PauseState::new()),
        Box::new(InventoryState::new()),
        Box::new(StatsState::new()),
        Box::new(DialogueState::new(DialogueCatalog::create_default())),
        Box::new(CheatConsoleState::new()),
        Box::new(LockPickingState::new()),
    ]
}
