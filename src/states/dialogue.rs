//! NPC conversation overlay

use std::collections::HashMap;

use tracing::{info, warn};

use crate::collision::Rect;
use crate::constants::{MENU_KEY_COOLDOWN, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::game_data::EntityDataStore;
use crate::input_system::{GameAction, KeyPress};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

const FALLBACK_LINE: &str = "...";

/// Lines of text keyed by topic
#[derive(Debug, Clone, Default)]
pub struct DialogueCatalog {
    topics: HashMap<String, Vec<String>>,
}

impl DialogueCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_default() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "greeting",
            vec![
                "Hello, traveller.".to_string(),
                "The woods are full of bugs these days.".to_string(),
                "Mind the chests. Some of them are locked.".to_string(),
            ],
        );
        catalog
    }

    pub fn insert(&mut self, topic: impl Into<String>, lines: Vec<String>) {
        self.topics.insert(topic.into(), lines);
    }

    /// Lines for a topic, or a single placeholder line when it is unknown
    pub fn lines(&self, topic: &str) -> Vec<String> {
        match self.topics.get(topic) {
            Some(lines) if !lines.is_empty() => lines.clone(),
            _ => vec![FALLBACK_LINE.to_string()],
        }
    }
}

pub struct DialogueState {
    catalog: DialogueCatalog,
    speaker: String,
    lines: Vec<String>,
    index: usize,
    /// Seconds before `select` is accepted again
    cooldown: f32,
}

impl DialogueState {
    pub fn new(catalog: DialogueCatalog) -> Self {
        DialogueState {
            catalog,
            speaker: String::new(),
            lines: Vec::new(),
            index: 0,
            cooldown: 0.0,
        }
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.index).map(String::as_str)
    }

    fn advance(&mut self) -> Transition {
        if self.cooldown > 0.0 {
            return Transition::None;
        }
        self.cooldown = MENU_KEY_COOLDOWN;
        self.index += 1;
        if self.index >= self.lines.len() {
            Transition::Pop
        } else {
            Transition::None
        }
    }
}

impl GameState for DialogueState {
    fn id(&self) -> StateId {
        StateId::Dialogue
    }

    fn on_enter(&mut self, ctx: &mut GameContext, args: EnterArgs) {
        self.index = 0;
        self.cooldown = MENU_KEY_COOLDOWN;

        let record = match &args {
            EnterArgs::Dialogue { npc_id } => ctx.data.monster(npc_id),
            _ => None,
        };
        match record {
            Some(record) => {
                self.speaker = record.name.clone();
                let topic = record.active_topic.as_deref().unwrap_or_default();
                self.lines = self.catalog.lines(topic);
                info!(speaker = %self.speaker, topic, "Dialogue started");
            }
            None => {
                warn!(?args, "Dialogue opened without a known speaker");
                self.speaker.clear();
                self.lines = vec![FALLBACK_LINE.to_string()];
            }
        }
    }

    fn update(&mut self, dt: f32, _ctx: &mut GameContext) -> Transition {
        self.cooldown = (self.cooldown - dt).max(0.0);
        Transition::None
    }

    fn draw(&self, _ctx: &GameContext, layer: &mut DrawLayer) {
        let width = SCREEN_WIDTH * 0.6;
        let height = SCREEN_HEIGHT * 0.25;
        let left = (SCREEN_WIDTH - width) / 2.0;
        let bottom = SCREEN_HEIGHT * 0.05;
        layer.panel(Rect::new(left, bottom, width, height), 220);
        layer.highlighted_text(&self.speaker, left + 24.0, bottom + height - 32.0, 20);
        if let Some(line) = self.current_line() {
            layer.text(line, left + 24.0, bottom + height - 72.0, 18);
        }
    }

    fn on_key_press(&mut self, key: &KeyPress, _ctx: &mut GameContext) -> Transition {
        match key.action {
            Some(GameAction::Select) => self.advance(),
            Some(GameAction::Escape) => Transition::Pop,
            _ => Transition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::running_context;

    fn open(ctx: &mut GameContext) -> DialogueState {
        let mut state = DialogueState::new(DialogueCatalog::create_default());
        state.on_enter(
            ctx,
            EnterArgs::Dialogue {
                npc_id: "npc_town_0".to_string(),
            },
        );
        state
    }

    fn select(state: &mut DialogueState, ctx: &mut GameContext) -> Transition {
        let key = KeyPress::new("ENTER", &ctx.bindings);
        state.on_key_press(&key, ctx)
    }

    #[test]
    fn test_catalog_fallback() {
        let catalog = DialogueCatalog::create_default();
        assert_eq!(catalog.lines("missing"), vec!["...".to_string()]);
        assert_eq!(catalog.lines("greeting").len(), 3);
    }

    #[test]
    fn test_lines_come_from_active_topic() {
        let (mut ctx, _dir) = running_context();
        let state = open(&mut ctx);
        assert_eq!(state.speaker(), "Elder");
        assert_eq!(state.current_line(), Some("Hello, traveller."));
    }

    #[test]
    fn test_select_respects_cooldown() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);

        select(&mut state, &mut ctx);
        assert_eq!(state.current_line(), Some("Hello, traveller."));

        state.update(0.2, &mut ctx);
        select(&mut state, &mut ctx);
        assert_eq!(state.current_line(), Some("The woods are full of bugs these days."));
    }

    #[test]
    fn test_pops_after_last_line() {
        let (mut ctx, _dir) = running_context();
        let mut state = open(&mut ctx);

        let mut last = Transition::None;
        for _ in 0..3 {
            state.update(0.2, &mut ctx);
            last = select(&mut state, &mut ctx);
        }
        assert_eq!(last, Transition::Pop);
    }

    #[test]
    fn test_unknown_speaker_gets_placeholder() {
        let (mut ctx, _dir) = running_context();
        let mut state = DialogueState::new(DialogueCatalog::create_default());
        state.on_enter(
            &mut ctx,
            EnterArgs::Dialogue {
                npc_id: "ghost".to_string(),
            },
        );
        assert_eq!(state.current_line(), Some("..."));
    }
}
