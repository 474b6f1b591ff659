//! Character sheet overlay
//!
//! The numbers are captured when the overlay opens and do not change while
//! it is shown.

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::game_data::GameData;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub level: i32,
    pub exp: i32,
    pub req_exp: i32,
    pub health: i32,
    pub max_health: i32,
    pub speed: i32,
    pub strength: i32,
}

impl StatsSnapshot {
    pub fn capture(data: &GameData) -> Self {
        let player = &data.player;
        StatsSnapshot {
            level: player.level,
            exp: player.exp,
            req_exp: player.req_exp,
            health: player.health,
            max_health: player.max_health,
            speed: player.speed,
            strength: player.strength,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Level: {}", self.level),
            format!("Exp: {} / {}", self.exp, self.req_exp),
            format!("Health: {} / {}", self.health, self.max_health),
            format!("Speed: {}", self.speed),
            format!("Strength: {}", self.strength),
        ]
    }
}

#[derive(Debug, Default)]
pub struct StatsState {
    snapshot: StatsSnapshot,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &StatsSnapshot {
        &self.snapshot
    }
}

impl GameState for StatsState {
    fn id(&self) -> StateId {
        StateId::Stats
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _args: EnterArgs) {
        self.snapshot = StatsSnapshot::capture(&ctx.data);
    }

    fn draw(&self, ctx: &GameContext, layer: &mut DrawLayer) {
        let x = SCREEN_WIDTH * 0.3;
        let mut y = SCREEN_HEIGHT * 0.8;
        layer.text(&ctx.data.player.name, x, y, 28);
        for line in self.snapshot.lines() {
            y -= 36.0;
            layer.text(line, x, y, 20);
        }
    }

    fn on_key_press(&mut self, key: &KeyPress, _ctx: &mut GameContext) -> Transition {
        match key.action {
            Some(GameAction::Stats | GameAction::Escape) => Transition::Pop,
            _ => Transition::None,
        }
    }
}
