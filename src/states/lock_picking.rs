//! Lock-picking minigame
//!
//! `left` and `right` feed `<` and `>` to the chest's lock. A wrong symbol
//! resets the attempt. Once the lock opens the overlay stays up for
//! [`LOCK_PICK_CLOSE_DELAY`] seconds so the result can be read, then closes
//! itself.

use tracing::{info, warn};

use crate::collision::Rect;
use crate::constants::{LOCK_PICK_CLOSE_DELAY, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::entity::Direction;
use crate::events::LockAttempt;
use crate::input_system::{GameAction, KeyPress};
use crate::timer::{Countdown, TimerKey, TimerKind};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockStatus {
    #[default]
    Picking,
    Failed,
    Unlocked,
}

impl LockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LockStatus::Picking => "picking",
            LockStatus::Failed => "failed",
            LockStatus::Unlocked => "unlocked",
        }
    }
}

#[derive(Debug, Default)]
pub struct LockPickingState {
    chest_id: Option<String>,
    entered: String,
    status: LockStatus,
    closing: bool,
}

impl LockPickingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    fn close_timer(chest_id: &str) -> TimerKey {
        TimerKey::new(chest_id, TimerKind::OverlayClose)
    }

    fn submit(&mut self, direction: Direction, ctx: &mut GameContext) -> Transition {
        if self.status == LockStatus::Unlocked {
            return Transition::None;
        }
        let (Some(chest_id), Some(symbol)) = (self.chest_id.clone(), direction.lock_symbol()) else {
            return Transition::None;
        };

        match ctx.world.events.submit_lock_symbol(&chest_id, symbol, &mut ctx.data) {
            Some(LockAttempt::Progress(entered)) => {
                self.entered = entered;
                self.status = LockStatus::Picking;
            }
            Some(LockAttempt::Failed) => {
                self.entered.clear();
                self.status = LockStatus::Failed;
            }
            Some(LockAttempt::Opened) => {
                info!(%chest_id, "Lock picked");
                self.entered.clear();
                self.status = LockStatus::Unlocked;
                self.closing = true;
                ctx.timers
                    .register(Self::close_timer(&chest_id), Countdown::seconds(LOCK_PICK_CLOSE_DELAY));
                ctx.flush_notices();
            }
            None => {
                warn!(%chest_id, "Chest vanished during lock pick");
                return Transition::Pop;
            }
        }
        Transition::None
    }
}

impl GameState for LockPickingState {
    fn id(&self) -> StateId {
        StateId::LockPicking
    }

    fn on_enter(&mut self, _ctx: &mut GameContext, args: EnterArgs) {
        self.entered.clear();
        self.status = LockStatus::Picking;
        self.closing = false;
        self.chest_id = match args {
            EnterArgs::LockPicking { chest_id } => Some(chest_id),
            other => {
                warn!(?other, "Lock picking opened without a chest");
                None
            }
        };
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        if let Some(chest_id) = self.chest_id.take() {
            if self.status != LockStatus::Unlocked {
                ctx.world.events.cancel_lock_pick(&chest_id);
            }
            ctx.timers.cancel(&Self::close_timer(&chest_id));
        }
    }

    fn update(&mut self, _dt: f32, ctx: &mut GameContext) -> Transition {
        let Some(chest_id) = &self.chest_id else {
            return Transition::Pop;
        };
        if ctx.world.events.get(chest_id).and_then(|e| e.chest()).is_none() {
            warn!(%chest_id, "Chest no longer on the map");
            return Transition::Pop;
        }
        if self.closing && !ctx.timers.is_running(&Self::close_timer(chest_id)) {
            return Transition::Pop;
        }
        Transition::None
    }

    fn draw(&self, ctx: &GameContext, layer: &mut DrawLayer) {
        let width = SCREEN_WIDTH * 0.4;
        let height = SCREEN_HEIGHT * 0.3;
        let left = (SCREEN_WIDTH - width) / 2.0;
        let bottom = (SCREEN_HEIGHT - height) / 2.0;
        layer.panel(Rect::new(left, bottom, width, height), 220);

        let length = self
            .chest_id
            .as_deref()
            .and_then(|id| ctx.world.events.get(id))
            .and_then(|event| event.chest())
            .map_or(0, |chest| chest.lock_sequence.chars().count());
        let slots: String = (0..length)
            .map(|i| self.entered.chars().nth(i).unwrap_or('_'))
            .collect();

        let center = SCREEN_WIDTH / 2.0;
        layer.text("LOCKED", center, bottom + height - 40.0, 24);
        layer.highlighted_text(slots, center, bottom + height / 2.0, 32);
        layer.text(self.status.label(), center, bottom + 24.0, 16);
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        match key.action {
            Some(GameAction::Left) => self.submit(Direction::Left, ctx),
            Some(GameAction::Right) => self.submit(Direction::Right, ctx),
            Some(GameAction::Escape) => {
                if self.status != LockStatus::Unlocked {
                    if let Some(chest_id) = &self.chest_id {
                        ctx.world.events.cancel_lock_pick(chest_id);
                    }
                    ctx.notify("Lock picking cancelled");
                }
                Transition::Pop
            }
            _ => Transition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::running_context;

    fn open(ctx: &mut GameContext) -> LockPickingState {
        let mut state = LockPickingState::new();
        state.on_enter(
            ctx,
            EnterArgs::LockPicking {
                chest_id: "town_chest".to_string(),
            },
        );
        state
    }

    fn press(state: &mut LockPickingState, key: &str, ctx: &mut GameContext) -> Transition {
        let key = KeyPress::new(key, &ctx.bindings);
        state.on_key_press(&key, ctx)
    }

    #[test]
    fn test_wrong_symbol_resets() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);

        press(&mut state, "RIGHT", &mut ctx);
        assert_eq!(state.status(), LockStatus::Failed);
        assert_eq!(state.entered(), "");

        press(&mut state, "LEFT", &mut ctx);
        assert_eq!(state.status(), LockStatus::Picking);
        assert_eq!(state.entered(), "<");
    }

    #[test]
    fn test_unlock_closes_after_delay() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);

        press(&mut state, "LEFT", &mut ctx);
        press(&mut state, "RIGHT", &mut ctx);
        assert_eq!(state.status(), LockStatus::Unlocked);
        assert!(ctx.data.is_chest_emptied("town_chest"));
        assert_eq!(ctx.data.get_item_count("healing_potion"), 1);

        assert_eq!(state.update(0.5, &mut ctx), Transition::None);
        ctx.end_frame(0.5);
        assert_eq!(state.update(0.6, &mut ctx), Transition::None);
        ctx.end_frame(0.6);
        assert_eq!(state.update(0.0, &mut ctx), Transition::Pop);
    }

    #[test]
    fn test_escape_cancels_attempt() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);

        press(&mut state, "LEFT", &mut ctx);
        assert_eq!(press(&mut state, "ESCAPE", &mut ctx), Transition::Pop);
        let chest = ctx.world.events.get("town_chest").and_then(|e| e.chest()).unwrap();
        assert_eq!(chest.attempt(), "");
        assert!(!ctx.data.is_chest_emptied("town_chest"));
    }

    #[test]
    fn test_missing_chest_pops() {
        let (mut ctx, _dir) = running_context();
        let mut state = LockPickingState::new();
        state.on_enter(&mut ctx, EnterArgs::None);
        assert_eq!(state.update(0.1, &mut ctx), Transition::Pop);
    }

    #[test]
    fn test_pops_when_chest_left_behind() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);
        assert_eq!(state.update(0.1, &mut ctx), Transition::None);

        ctx.world.load_map("field", &mut ctx.data, &mut ctx.timers).unwrap();
        assert_eq!(state.update(0.1, &mut ctx), Transition::Pop);
    }
}
