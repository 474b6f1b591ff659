//! Cheat console overlay
//!
//! Commands are typed into a buffer and executed on `select`. The reply is
//! typed out one character at a time; once it is fully shown the console
//! closes itself.
//!
//! Grammar:
//!
//! ```text
//! SAVE | LOAD | DEBUG | GHOST | AREAS | GODMOD | GOODBYE
//! TP_<x>_<y>[_<map>]
//! ```

use std::collections::VecDeque;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::collision::Rect;
use crate::constants::{CONSOLE_HISTORY_LEN, CONSOLE_TYPE_INTERVAL, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::context::GameContext;
use crate::events::TeleportRequest;
use crate::input_system::{typed_char, GameAction, KeyPress};
use crate::stats::{PlayerStat, StatOp};

use super::draw::DrawLayer;
use super::{EnterArgs, GameState, StateId, Transition};

const PROMPT: &str = "The god is listening...";
const MAX_LOG_LINES: usize = 26;
const GOD_HEALTH: f64 = 9999.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheatError {
    #[error("where should I send you?")]
    Arity(usize),

    #[error("I don't understand")]
    NotANumber(String),

    #[error("unknown command {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheatCommand {
    Save,
    Load,
    Debug,
    Ghost,
    Areas,
    GodMode,
    Goodbye,
    Teleport { x: i32, y: i32, map: Option<String> },
}

impl CheatCommand {
    pub fn parse(input: &str) -> Result<Self, CheatError> {
        let input = input.trim();
        let command = match input {
            "SAVE" => CheatCommand::Save,
            "LOAD" => CheatCommand::Load,
            "DEBUG" => CheatCommand::Debug,
            "GHOST" => CheatCommand::Ghost,
            "AREAS" => CheatCommand::Areas,
            "GODMOD" => CheatCommand::GodMode,
            "GOODBYE" => CheatCommand::Goodbye,
            _ if input.starts_with("TP_") => Self::parse_teleport(input)?,
            _ => return Err(CheatError::Unknown(input.to_string())),
        };
        Ok(command)
    }

    fn parse_teleport(input: &str) -> Result<Self, CheatError> {
        let parts: Vec<&str> = input.split('_').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(CheatError::Arity(parts.len() - 1));
        }
        let coord = |s: &str| s.parse::<i32>().map_err(|_| CheatError::NotANumber(s.to_string()));
        let x = coord(parts[1])?;
        let y = coord(parts[2])?;
        let map = parts.get(3).map(|m| m.to_lowercase());
        Ok(CheatCommand::Teleport { x, y, map })
    }
}

impl FromStr for CheatCommand {
    type Err = CheatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub struct CheatConsoleState {
    buffer: String,
    /// Newest first
    history: VecDeque<String>,
    history_cursor: Option<usize>,
    /// Reply lines waiting to be typed; the front one is in progress
    pending: VecDeque<String>,
    typed: usize,
    log: VecDeque<String>,
    type_timer: f32,
    closing: bool,
}

impl CheatConsoleState {
    pub fn new() -> Self {
        CheatConsoleState {
            buffer: String::new(),
            history: VecDeque::with_capacity(CONSOLE_HISTORY_LEN),
            history_cursor: None,
            pending: VecDeque::new(),
            typed: 0,
            log: VecDeque::new(),
            type_timer: 0.0,
            closing: false,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Fully typed reply lines, oldest first
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// The part of the current reply line typed so far
    pub fn typing(&self) -> Option<String> {
        self.pending.front().map(|line| line.chars().take(self.typed).collect())
    }

    fn say(&mut self, lines: &[&str]) {
        self.pending.extend(lines.iter().map(|l| l.to_string()));
    }

    fn push_log(&mut self, line: String) {
        self.log.push_back(line);
        while self.log.len() > MAX_LOG_LINES {
            self.log.pop_front();
        }
    }

    fn remember(&mut self, command: String) {
        self.history.retain(|c| *c != command);
        self.history.push_front(command);
        self.history.truncate(CONSOLE_HISTORY_LEN);
        self.history_cursor = None;
    }

    fn history_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = self.history_cursor.map_or(0, |c| (c + 1).min(self.history.len() - 1));
        self.history_cursor = Some(next);
        self.buffer = self.history[next].clone();
    }

    fn history_newer(&mut self) {
        match self.history_cursor {
            Some(0) | None => {
                self.history_cursor = None;
                self.buffer.clear();
            }
            Some(c) => {
                self.history_cursor = Some(c - 1);
                self.buffer = self.history[c - 1].clone();
            }
        }
    }

    fn submit(&mut self, ctx: &mut GameContext) {
        if self.buffer.is_empty() {
            return;
        }
        let input = std::mem::take(&mut self.buffer);
        self.push_log(format!("> {input}"));
        info!(command = %input, "Cheat command");

        match CheatCommand::parse(&input) {
            Ok(command) => self.execute(command, ctx),
            Err(CheatError::Unknown(_)) => self.say(&["You're right!", "Here is the answer:", "..."]),
            Err(e) => {
                warn!(command = %input, error = %e, "Malformed cheat command");
                let reply = e.to_string();
                self.say(&[reply.as_str(), "..."]);
            }
        }
        self.remember(input);
        self.closing = true;
    }

    fn execute(&mut self, command: CheatCommand, ctx: &mut GameContext) {
        match command {
            CheatCommand::Save => match ctx.save_game() {
                Ok(_) => self.say(&["Saving..."]),
                Err(e) => {
                    warn!(error = %e, "Cheat save failed");
                    self.say(&["The scrolls refuse to be written"]);
                }
            },
            CheatCommand::Load => match ctx.load_game() {
                Ok(true) => self.say(&["Loading..."]),
                Ok(false) => self.say(&["There is nothing to load"]),
                Err(e) => {
                    warn!(error = %e, "Cheat load failed");
                    self.say(&["The scrolls are unreadable"]);
                }
            },
            CheatCommand::Debug => {
                if ctx.toggle_debug() {
                    self.say(&["Hmmm", "Something is glitching...", "Look!"]);
                } else {
                    self.say(&["Ok", "That's enough for you!"]);
                }
            }
            CheatCommand::Ghost => {
                if ctx.toggle_ghost() {
                    self.say(&["Who needs walls?", "You are a ghost now"]);
                } else {
                    self.say(&["Had enough of wandering?", "..."]);
                }
            }
            CheatCommand::Areas => {
                if ctx.toggle_show_areas() {
                    self.say(&["Abracadabra", "Look into the unknown."]);
                } else {
                    self.say(&["And now...", "you are a normal person"]);
                }
            }
            CheatCommand::GodMode => {
                ctx.data.change_stat(PlayerStat::MaxHealth, StatOp::Set, GOD_HEALTH);
                let health = ctx.data.change_stat(PlayerStat::Health, StatOp::Set, GOD_HEALTH);
                let line = format!("HP = {health}");
                self.say(&["Remember who the god is here!", line.as_str(), "Now nothing can kill you"]);
            }
            CheatCommand::Goodbye => {
                ctx.flags.cheat_mode = false;
                self.say(&["Had your fun?", "Bye then.."]);
            }
            CheatCommand::Teleport { x, y, map } => {
                let request = TeleportRequest::new(x as f32, y as f32, map.clone());
                match ctx.world.teleport_to(&request, &mut ctx.data, &mut ctx.timers) {
                    Ok(()) => {
                        let line = match &map {
                            Some(map) => format!("x:{x}, y:{y}, map:{map}"),
                            None => format!("x:{x}, y:{y}"),
                        };
                        self.say(&["New coordinates granted!", line.as_str()]);
                    }
                    Err(e) => {
                        warn!(error = %e, "Cheat teleport failed");
                        self.say(&["That place does not exist", "..."]);
                    }
                }
            }
        }
    }

    /// Types one character of the pending reply
    fn type_step(&mut self) {
        let Some(line) = self.pending.front() else {
            return;
        };
        if self.typed < line.chars().count() {
            self.typed += 1;
            return;
        }
        if let Some(done) = self.pending.pop_front() {
            self.push_log(done);
        }
        self.typed = 0;
    }
}

impl Default for CheatConsoleState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for CheatConsoleState {
    fn id(&self) -> StateId {
        StateId::CheatConsole
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _args: EnterArgs) {
        self.buffer.clear();
        self.history_cursor = None;
        self.pending.clear();
        self.typed = 0;
        self.log.clear();
        self.type_timer = 0.0;
        self.closing = false;
        ctx.input.release_all();
    }

    fn update(&mut self, dt: f32, _ctx: &mut GameContext) -> Transition {
        if self.pending.is_empty() {
            self.type_timer = 0.0;
        } else {
            self.type_timer += dt;
            while self.type_timer >= CONSOLE_TYPE_INTERVAL && !self.pending.is_empty() {
                self.type_timer -= CONSOLE_TYPE_INTERVAL;
                self.type_step();
            }
        }

        if self.closing && self.pending.is_empty() {
            return Transition::Pop;
        }
        Transition::None
    }

    fn draw(&self, _ctx: &GameContext, layer: &mut DrawLayer) {
        let width = SCREEN_WIDTH * 0.5;
        let left = SCREEN_WIDTH - width;
        layer.panel(Rect::new(left, 0.0, width, SCREEN_HEIGHT), 230);

        let x = left + 24.0;
        let mut y = SCREEN_HEIGHT - 40.0;
        layer.text(PROMPT, x, y, 16);
        for line in self.log() {
            y -= 22.0;
            layer.text(line, x, y, 14);
        }
        if let Some(partial) = self.typing() {
            layer.text(partial, x, y - 22.0, 14);
        }
        layer.highlighted_text(format!("> {}|", self.buffer), x, 24.0, 18);
    }

    fn on_key_press(&mut self, key: &KeyPress, ctx: &mut GameContext) -> Transition {
        if key.is(GameAction::Escape) || key.is(GameAction::CheatConsole) {
            return Transition::Pop;
        }
        if self.closing {
            return Transition::None;
        }
        if key.is(GameAction::Select) {
            self.submit(ctx);
            return Transition::None;
        }
        if let Some(c) = typed_char(&key.key) {
            self.buffer.push(c);
            self.history_cursor = None;
            return Transition::None;
        }
        match key.key.as_str() {
            "UP" => self.history_older(),
            "DOWN" => self.history_newer(),
            "BACKSPACE" => {
                self.buffer.pop();
            }
            _ => {}
        }
        Transition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::running_context;

    fn type_text(state: &mut CheatConsoleState, text: &str, ctx: &mut GameContext) {
        for c in text.chars() {
            let key = match c {
                '_' => "SPACE".to_string(),
                c => c.to_string(),
            };
            let press = KeyPress::new(key, &ctx.bindings);
            state.on_key_press(&press, ctx);
        }
    }

    fn press(state: &mut CheatConsoleState, key: &str, ctx: &mut GameContext) -> Transition {
        let press = KeyPress::new(key, &ctx.bindings);
        state.on_key_press(&press, ctx)
    }

    fn run_until_closed(state: &mut CheatConsoleState, ctx: &mut GameContext) -> bool {
        for _ in 0..1000 {
            if state.update(CONSOLE_TYPE_INTERVAL, ctx) == Transition::Pop {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(CheatCommand::parse("GODMOD"), Ok(CheatCommand::GodMode));
        assert_eq!("GHOST".parse::<CheatCommand>(), Ok(CheatCommand::Ghost));
        assert_eq!(
            CheatCommand::parse("FLY"),
            Err(CheatError::Unknown("FLY".to_string()))
        );
    }

    #[test]
    fn test_parse_teleport() {
        assert_eq!(
            CheatCommand::parse("TP_3_4"),
            Ok(CheatCommand::Teleport { x: 3, y: 4, map: None })
        );
        assert_eq!(
            CheatCommand::parse("TP_1_2_FIELD"),
            Ok(CheatCommand::Teleport {
                x: 1,
                y: 2,
                map: Some("field".to_string())
            })
        );
        assert_eq!(CheatCommand::parse("TP_3"), Err(CheatError::Arity(1)));
        assert_eq!(CheatCommand::parse("TP_1_2_A_B"), Err(CheatError::Arity(4)));
        assert_eq!(
            CheatCommand::parse("TP_X_2"),
            Err(CheatError::NotANumber("X".to_string()))
        );
    }

    #[test]
    fn test_godmode_sets_health() {
        let (mut ctx, _dir) = running_context();
        let mut state = CheatConsoleState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        type_text(&mut state, "GODMOD", &mut ctx);
        assert_eq!(state.buffer(), "GODMOD");
        press(&mut state, "ENTER", &mut ctx);

        assert_eq!(ctx.data.player.max_health, 9999);
        assert_eq!(ctx.data.player.health, 9999);
        assert!(run_until_closed(&mut state, &mut ctx));
        assert!(state.log().any(|l| l == "HP = 9999"));
    }

    #[test]
    fn test_teleport_to_other_map() {
        let (mut ctx, _dir) = running_context();
        let mut state = CheatConsoleState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        type_text(&mut state, "TP_2_3_FIELD", &mut ctx);
        press(&mut state, "ENTER", &mut ctx);

        assert_eq!(ctx.world.current_map(), Some("field"));
        assert_eq!(ctx.data.get_player_position(), (2.0, 3.0));
    }

    #[test]
    fn test_malformed_teleport_does_not_move() {
        let (mut ctx, _dir) = running_context();
        let before = ctx.data.get_player_position();
        let mut state = CheatConsoleState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        type_text(&mut state, "TP_2", &mut ctx);
        press(&mut state, "ENTER", &mut ctx);

        assert_eq!(ctx.data.get_player_position(), before);
        assert!(run_until_closed(&mut state, &mut ctx));
        assert!(state.log().any(|l| l == "where should I send you?"));
    }

    #[test]
    fn test_backspace_and_history() {
        let (mut ctx, _dir) = running_context();
        let mut state = CheatConsoleState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        type_text(&mut state, "GHOSTX", &mut ctx);
        press(&mut state, "BACKSPACE", &mut ctx);
        press(&mut state, "ENTER", &mut ctx);
        assert!(ctx.world.ghost_mode);
        assert!(run_until_closed(&mut state, &mut ctx));

        state.on_enter(&mut ctx, EnterArgs::None);
        press(&mut state, "UP", &mut ctx);
        assert_eq!(state.buffer(), "GHOST");
        press(&mut state, "DOWN", &mut ctx);
        assert_eq!(state.buffer(), "");
    }

    #[test]
    fn test_goodbye_disables_cheats() {
        let (mut ctx, _dir) = running_context();
        ctx.flags.cheat_mode = true;
        let mut state = CheatConsoleState::new();
        state.on_enter(&mut ctx, EnterArgs::None);

        type_text(&mut state, "GOODBYE", &mut ctx);
        press(&mut state, "ENTER", &mut ctx);
        assert!(!ctx.flags.cheat_mode);
    }

    #[test]
    fn test_escape_closes() {
        let (mut ctx, _dir) = running_context();
        let mut state = CheatConsoleState::new();
        assert_eq!(press(&mut state, "ESCAPE", &mut ctx), Transition::Pop);
        assert_eq!(press(&mut state, "F2", &mut ctx), Transition::Pop);
    }
}
