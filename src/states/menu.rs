//! Base Menu Component
//!
//! Vertical list of options with a wrapping selection, shared by the lobby
//! and the pause overlay. The menu only keeps selection state and emits draw
//! commands; what an option does is up to the owning state.

use crate::collision::Rect;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::draw::DrawLayer;

const MENU_WIDTH: f32 = 500.0;
const ITEM_SPACING: f32 = 60.0;
const OVERLAY_ALPHA: u8 = 180;

/// A menu item with text and enabled state
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub text: String,
    /// Disabled items are drawn but skipped by navigation
    pub enabled: bool,
}

impl MenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        MenuItem {
            text: text.into(),
            enabled: true,
        }
    }
}

/// A stateful list menu
///
/// # Example
///
/// ```rust
/// use tile_rpg::states::{Menu, MenuItem};
///
/// let mut menu = Menu::new("PAUSE", vec![MenuItem::new("RESUME"), MenuItem::new("EXIT")]);
/// menu.select_next();
/// assert_eq!(menu.selected_index(), 1);
/// menu.select_next();
/// assert_eq!(menu.selected_index(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    selected_index: usize,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        let mut menu = Menu {
            title: title.into(),
            items,
            selected_index: 0,
        };
        menu.reset();
        menu
    }

    /// Back to the first enabled item
    pub fn reset(&mut self) {
        self.selected_index = self.items.iter().position(|item| item.enabled).unwrap_or(0);
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.enabled = enabled;
        }
        if !self.items.get(self.selected_index).is_some_and(|item| item.enabled) {
            self.reset();
        }
    }

    /// Move selection up (wraps to bottom)
    pub fn select_previous(&mut self) {
        self.step(self.items.len().saturating_sub(1));
    }

    /// Move selection down (wraps to top)
    pub fn select_next(&mut self) {
        self.step(1);
    }

    fn step(&mut self, offset: usize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let mut index = self.selected_index;
        for _ in 0..len {
            index = (index + offset) % len;
            if self.items[index].enabled {
                self.selected_index = index;
                return;
            }
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Darkened backdrop, centred title and one line per item
    pub fn draw(&self, layer: &mut DrawLayer) {
        layer.panel(Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT), OVERLAY_ALPHA);

        let height = ITEM_SPACING * (self.items.len() as f32 + 2.0);
        let left = (SCREEN_WIDTH - MENU_WIDTH) / 2.0;
        let bottom = (SCREEN_HEIGHT - height) / 2.0;
        layer.panel(Rect::new(left, bottom, MENU_WIDTH, height), 255);

        let top = bottom + height - ITEM_SPACING;
        layer.text(&self.title, SCREEN_WIDTH / 2.0, top, 32);
        for (i, item) in self.items.iter().enumerate() {
            let y = top - ITEM_SPACING * (i as f32 + 1.0);
            if i == self.selected_index {
                layer.highlighted_text(&item.text, SCREEN_WIDTH / 2.0, y, 24);
            } else {
                layer.text(&item.text, SCREEN_WIDTH / 2.0, y, 20);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::{DrawCommand, StateId};

    fn menu() -> Menu {
        Menu::new("LOBBY", vec![MenuItem::new("NEW GAME"), MenuItem::new("CONTINUE"), MenuItem::new("QUIT")])
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut menu = menu();
        menu.select_previous();
        assert_eq!(menu.selected_index(), 2);
        menu.select_next();
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_disabled_items_are_skipped() {
        let mut menu = menu();
        menu.set_enabled(1, false);

        menu.select_next();
        assert_eq!(menu.selected_index(), 2);
        menu.select_previous();
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_empty_menu_does_not_panic() {
        let mut menu = Menu::new("EMPTY", Vec::new());
        menu.select_next();
        menu.select_previous();
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_draw_highlights_selection() {
        let mut menu = menu();
        menu.select_next();
        let mut layer = DrawLayer::new(StateId::Lobby);
        menu.draw(&mut layer);

        let highlighted: Vec<&str> = layer
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, highlighted: true, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(highlighted, vec!["CONTINUE"]);
    }
}
