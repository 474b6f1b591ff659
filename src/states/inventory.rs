use crate::collision::Rect;
use crate::constants::{INVENTORY_COLUMNS, INVENTORY_ROWS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

const CELL_SIZE: f32 = 64.0;
const CELL_GAP: f32 = 8.0;

/// Grid view over the player's inventory
///
/// The cursor walks a fixed grid of slots; slots past the last stack are
/// drawn empty. Using an item goes through the data store so every outcome
/// ends up as a notification.
#[derive(Debug, Default)]
pub struct InventoryState {
    selected: usize,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn slot_count() -> usize {
        INVENTORY_COLUMNS * INVENTORY_ROWS
    }

    fn move_cursor(&mut self, delta: isize) {
        let target = self.selected as isize + delta;
        if target >= 0 && (target as usize) < Self::slot_count() {
            self.selected = target as usize;
        }
    }

    fn cell_origin(index: usize) -> (f32, f32) {
        let column = (index % INVENTORY_COLUMNS) as f32;
        let row = (index / INVENTORY_COLUMNS) as f32;
        let width = INVENTORY_COLUMNS as f32 * (CELL_SIZE + CELL_GAP);
        let left = (SCREEN_WIDTH - width) / 2.0;
        let top = SCREEN_HEIGHT * 0.8;
        (left + column * (CELL_SIZE + CELL_GAP), top - (row + 1.0) * (CELL_SIZE + CELL_GAP))
    }

    fn use_selected(&self, ctx: &mut GameContext) {
        let Some(item_id) = ctx.data.player.inventory.get(self.selected).map(|s| s.item_id.clone()) else {
            return;
        };
        ctx.data.use_item(&item_id);
        ctx.flush_notices();
    }
}

impl GameState for InventoryState {
    fn id(&self) -> StateId {
        StateId::Inventory
    }

    fn on_enter(&mut self, _ctx: &mut GameContext, _args: EnterArgs) {
        self.selected = 0;
    }

    fn draw(&self, ctx: &GameContext, layer: &mut DrawLayer) {
        layer.panel(Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT), 180);
        layer.text("INVENTORY", SCREEN_WIDTH / 2.0, SCREEN_HEIGHT * 0.85, 28);

        let inventory = &ctx.data.player.inventory;
        for index in 0..Self::slot_count() {
            let (x, y) = Self::cell_origin(index);
            let alpha = if index == self.selected { 255 } else { 120 };
            layer.panel(Rect::new(x, y, CELL_SIZE, CELL_SIZE), alpha);
            if let Some(stack) = inventory.get(index) {
                layer.sprite(&stack.item_id, x + CELL_SIZE / 2.0, y + CELL_SIZE / 2.0, 0);
                if stack.count > 1 {
                    layer.text(stack.count.to_string(), x + CELL_SIZE - 10.0, y + 10.0, 12);
                }
            }
        }

        if let Some(stack) = inventory.get(self.selected) {
            let def = ctx.data.catalog().resolve(&stack.item_id);
            let y = SCREEN_HEIGHT * 0.12;
            layer.highlighted_text(format!("{} x{}", stack.name, stack.count), SCREEN_WIDTH / 2.0, y + 28.0, 20);
            layer.text(def.description, SCREEN_WIDTH / 2.0, y, 16);
        }
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        let columns = INVENTORY_COLUMNS as isize;
        match key.action {
            Some(GameAction::Left) => self.move_cursor(-1),
            Some(GameAction::Right) => self.move_cursor(1),
            Some(GameAction::Up) => self.move_cursor(-columns),
            Some(GameAction::Down) => self.move_cursor(columns),
            Some(GameAction::Select) => self.use_selected(ctx),
            Some(GameAction::Inventory | GameAction::Escape) => return Transition::Pop,
            _ => {}
        }
        Transition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::test_context;
    use crate::stats::{PlayerStat, StatOp};

    fn press(state: &mut InventoryState, key: &str, ctx: &mut GameContext) -> Transition {
        let key = KeyPress::new(key, &ctx.bindings);
        state.on_key_press(&key, ctx)
    }

    #[test]
    fn test_cursor_stays_inside_grid() {
        let (mut ctx, _dir) = test_context();
        let mut state = InventoryState::new();

        press(&mut state, "LEFT", &mut ctx);
        press(&mut state, "UP", &mut ctx);
        assert_eq!(state.selected(), 0);

        press(&mut state, "DOWN", &mut ctx);
        press(&mut state, "RIGHT", &mut ctx);
        assert_eq!(state.selected(), INVENTORY_COLUMNS + 1);

        for _ in 0..10 {
            press(&mut state, "DOWN", &mut ctx);
        }
        assert_eq!(state.selected(), INVENTORY_COLUMNS * (INVENTORY_ROWS - 1) + 1);
    }

    #[test]
    fn test_select_uses_potion() {
        let (mut ctx, _dir) = test_context();
        ctx.data.add_item("healing_potion", 2);
        ctx.data.change_stat(PlayerStat::Health, StatOp::Subtract, 10.0);
        let mut state = InventoryState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        press(&mut state, "ENTER", &mut ctx);
        assert_eq!(ctx.data.get_item_count("healing_potion"), 1);
        assert!(ctx.notifications.latest().is_some());
    }

    #[test]
    fn test_select_on_empty_slot_does_nothing() {
        let (mut ctx, _dir) = test_context();
        let mut state = InventoryState::new();
        assert_eq!(press(&mut state, "ENTER", &mut ctx), Transition::None);
        assert!(ctx.notifications.latest().is_none());
    }

    #[test]
    fn test_inventory_key_closes() {
        let (mut ctx, _dir) = test_context();
        let mut state = InventoryState::new();
        assert_eq!(press(&mut state, "I", &mut ctx), Transition::Pop);
        assert_eq!(press(&mut state, "ESCAPE", &mut ctx), Transition::Pop);
    }
}
