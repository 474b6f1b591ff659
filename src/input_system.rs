//! Logical actions and key bindings
//!
//! Physical keys are identified by name (`"W"`, `"ENTER"`, `"NUM_0"`). The
//! platform layer forwards press/release events by name; this module maps
//! them to [`GameAction`]s through the user's [`KeyBindings`].
//!
//! # Bindings file
//!
//! A JSON object from action name to a list of key names:
//!
//! ```json
//! { "up": ["W", "UP"], "select": ["ENTER"] }
//! ```
//!
//! Each action is validated on its own. A missing action, a value that is
//! not a list, or a list containing non-strings falls back to that action's
//! default only. A missing file is created with the defaults.
//!
//! # Direction handling
//!
//! Only one movement direction is active at a time. Pressing a direction
//! replaces the active one; releasing it falls back to any other direction
//! still held.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::entity::Direction;

/// Actions the player can perform
///
/// These decouple physical keys from what the game does with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameAction {
    // === Movement ===
    Up,
    Down,
    Left,
    Right,

    // === Menus ===
    Select,
    Escape,
    Stats,
    Inventory,

    // === Cheats ===
    CheatConsole,
    GhostMode,
    DebugMode,
    ShowAreaMode,
}

impl GameAction {
    pub const ALL: [GameAction; 12] = [
        GameAction::Up,
        GameAction::Down,
        GameAction::Left,
        GameAction::Right,
        GameAction::Select,
        GameAction::Escape,
        GameAction::Stats,
        GameAction::Inventory,
        GameAction::CheatConsole,
        GameAction::GhostMode,
        GameAction::DebugMode,
        GameAction::ShowAreaMode,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GameAction::Up => "up",
            GameAction::Down => "down",
            GameAction::Left => "left",
            GameAction::Right => "right",
            GameAction::Select => "select",
            GameAction::Escape => "escape",
            GameAction::Stats => "stats",
            GameAction::Inventory => "inventory",
            GameAction::CheatConsole => "cheat_console",
            GameAction::GhostMode => "ghost_mode",
            GameAction::DebugMode => "debug_mode",
            GameAction::ShowAreaMode => "show_area_mode",
        }
    }

    /// Built-in keys for the action
    pub fn default_keys(&self) -> &'static [&'static str] {
        match self {
            GameAction::Up => &["W", "UP"],
            GameAction::Down => &["S", "DOWN"],
            GameAction::Left => &["A", "LEFT"],
            GameAction::Right => &["D", "RIGHT"],
            GameAction::Select => &["ENTER"],
            GameAction::Escape => &["ESCAPE"],
            GameAction::Stats => &["B"],
            GameAction::Inventory => &["I"],
            GameAction::CheatConsole => &["F2"],
            GameAction::GhostMode => &["NUM_0"],
            GameAction::DebugMode => &["NUM_1"],
            GameAction::ShowAreaMode => &["NUM_2"],
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            GameAction::Up => Some(Direction::Up),
            GameAction::Down => Some(Direction::Down),
            GameAction::Left => Some(Direction::Left),
            GameAction::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameAction {
    type Err = KeyBindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| KeyBindingError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum KeyBindingError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("key '{key}' is not bound to '{action}'")]
    NotBound { action: GameAction, key: String },
    #[error("failed to write key bindings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode key bindings: {0}")]
    Json(#[from] serde_json::Error),
}

const SPECIAL_KEYS: &[&str] = &[
    "SPACE", "ENTER", "ESCAPE", "TAB", "BACKSPACE", "DELETE", "INSERT", "HOME", "END", "PAGEUP",
    "PAGEDOWN", "UP", "DOWN", "LEFT", "RIGHT", "LSHIFT", "RSHIFT", "LCTRL", "RCTRL", "LALT", "RALT",
    "CAPSLOCK", "NUMLOCK", "SCROLLLOCK", "`", "-", "=", "[", "]", "\\", ";", "'", ",", ".", "/",
];

/// Returns true for key names the platform layer can report
pub fn is_known_key(name: &str) -> bool {
    let single_alnum = name.len() == 1 && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let numpad = name
        .strip_prefix("NUM_")
        .is_some_and(|d| d.len() == 1 && d.chars().all(|c| c.is_ascii_digit()));
    let function = name
        .strip_prefix('F')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=12).contains(&n));

    single_alnum || numpad || function || SPECIAL_KEYS.contains(&name)
}

/// Character a key types into a text field, if any
///
/// Letters and digits type themselves (numpad digits included) and SPACE
/// types an underscore.
pub fn typed_char(key: &str) -> Option<char> {
    let key = key.strip_prefix("NUM_").unwrap_or(key);
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase()),
        _ if key == "SPACE" => Some('_'),
        _ => None,
    }
}

/// Action name → key names
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: BTreeMap<GameAction, Vec<String>>,
}

impl KeyBindings {
    pub fn defaults() -> Self {
        let bindings = GameAction::ALL
            .into_iter()
            .map(|action| {
                let keys = action.default_keys().iter().map(|k| k.to_string()).collect();
                (action, keys)
            })
            .collect();
        KeyBindings { bindings }
    }

    /// Builds bindings from a parsed file, validating each action on its own
    pub fn from_json(value: &Value) -> Self {
        let mut bindings = Self::defaults();
        let Some(object) = value.as_object() else {
            warn!("Key bindings file is not an object, using defaults");
            return bindings;
        };

        for action in GameAction::ALL {
            match object.get(action.name()) {
                None => warn!(%action, "Action missing from key bindings, using default"),
                Some(Value::Array(items)) => {
                    let keys: Option<Vec<String>> = items
                        .iter()
                        .map(|v| v.as_str().map(str::to_string))
                        .collect();
                    match keys {
                        Some(keys) => {
                            for key in keys.iter().filter(|k| !is_known_key(k)) {
                                warn!(%action, key = %key, "Unknown key name in bindings");
                            }
                            bindings.bindings.insert(action, keys);
                        }
                        None => warn!(%action, "Non-string key in bindings, using default"),
                    }
                }
                Some(_) => warn!(%action, "Bindings entry is not a list, using default"),
            }
        }
        bindings
    }

    /// Loads bindings from `path`
    ///
    /// A missing file is created with the defaults. An unreadable or
    /// malformed file logs a warning and yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "Key bindings not found, writing defaults");
            let defaults = Self::defaults();
            if let Err(err) = defaults.save(path) {
                warn!(%err, "Could not write default key bindings");
            }
            return defaults;
        }

        let parsed = fs::read_to_string(path)
            .map_err(KeyBindingError::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(KeyBindingError::from));
        match parsed {
            Ok(value) => {
                info!(path = %path.display(), "Key bindings loaded");
                Self::from_json(&value)
            }
            Err(err) => {
                warn!(%err, "Key bindings unreadable, using defaults");
                Self::defaults()
            }
        }
    }

    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .bindings
            .iter()
            .map(|(action, keys)| {
                let keys = keys.iter().cloned().map(Value::String).collect();
                (action.name().to_string(), Value::Array(keys))
            })
            .collect();
        Value::Object(object)
    }

    pub fn save(&self, path: &Path) -> Result<(), KeyBindingError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.to_json())?)?;
        debug!(path = %path.display(), "Key bindings saved");
        Ok(())
    }

    pub fn keys_for(&self, action: GameAction) -> &[String] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First action bound to `key`
    pub fn action_for_key(&self, key: &str) -> Option<GameAction> {
        self.bindings
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| k == key))
            .map(|(action, _)| *action)
    }

    /// Adds `key` to `action`, removing it from any other action first
    pub fn rebind(&mut self, action: GameAction, key: &str) -> Result<(), KeyBindingError> {
        if !is_known_key(key) {
            return Err(KeyBindingError::UnknownKey(key.to_string()));
        }

        for (other, keys) in self.bindings.iter_mut() {
            if *other != action && keys.iter().any(|k| k == key) {
                warn!(key, from = %other, to = %action, "Key binding conflict, moving key");
                keys.retain(|k| k != key);
            }
        }

        let keys = self.bindings.entry(action).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
        Ok(())
    }

    pub fn remove_binding(&mut self, action: GameAction, key: &str) -> Result<(), KeyBindingError> {
        let keys = self.bindings.entry(action).or_default();
        let before = keys.len();
        keys.retain(|k| k != key);
        if keys.len() == before {
            return Err(KeyBindingError::NotBound {
                action,
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// A key press as delivered to game states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub action: Option<GameAction>,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, bindings: &KeyBindings) -> Self {
        let key = key.into();
        let action = bindings.action_for_key(&key);
        KeyPress { key, action }
    }

    pub fn is(&self, action: GameAction) -> bool {
        self.action == Some(action)
    }
}

/// Held keys and the single active movement direction
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    direction: Option<GameAction>,
    pressed_this_frame: HashSet<GameAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_press(&mut self, key: &str, bindings: &KeyBindings) -> KeyPress {
        self.held.insert(key.to_string());
        let press = KeyPress::new(key, bindings);

        if let Some(action) = press.action {
            if action.direction().is_some() {
                self.direction = Some(action);
            }
            self.pressed_this_frame.insert(action);
        }
        press
    }

    pub fn on_key_release(&mut self, key: &str, bindings: &KeyBindings) {
        self.held.remove(key);

        let released = bindings.action_for_key(key);
        if released.is_some() && released == self.direction && !self.is_held(released, bindings) {
            self.direction = [GameAction::Up, GameAction::Down, GameAction::Left, GameAction::Right]
                .into_iter()
                .find(|d| self.is_held(Some(*d), bindings));
        }
    }

    fn is_held(&self, action: Option<GameAction>, bindings: &KeyBindings) -> bool {
        action.is_some_and(|a| bindings.keys_for(a).iter().any(|k| self.held.contains(k)))
    }

    /// True while any key bound to `action` is held
    pub fn is_active(&self, action: GameAction, bindings: &KeyBindings) -> bool {
        match action.direction() {
            Some(_) => self.direction == Some(action),
            None => self.is_held(Some(action), bindings),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction.and_then(|a| a.direction())
    }

    /// Consumes a press of `action` made this frame
    pub fn take_pressed(&mut self, action: GameAction) -> bool {
        self.pressed_this_frame.remove(&action)
    }

    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }

    /// Forgets every held key (used when focus moves to an overlay)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.direction = None;
        self.pressed_this_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_per_action_fallback() {
        let value = json!({
            "up": ["I"],
            "down": "S",
            "left": ["A", 5],
            "select": ["SPACE", "ENTER"]
        });
        let bindings = KeyBindings::from_json(&value);

        assert_eq!(bindings.keys_for(GameAction::Up), ["I".to_string()]);
        assert_eq!(bindings.keys_for(GameAction::Down), ["S", "DOWN"]);
        assert_eq!(bindings.keys_for(GameAction::Left), ["A", "LEFT"]);
        assert_eq!(bindings.keys_for(GameAction::Select), ["SPACE", "ENTER"]);
        assert_eq!(bindings.keys_for(GameAction::CheatConsole), ["F2"]);
    }

    #[test]
    fn test_rebind_moves_conflicting_key() {
        let mut bindings = KeyBindings::defaults();
        bindings.rebind(GameAction::Select, "W").unwrap();

        assert_eq!(bindings.keys_for(GameAction::Up), ["UP"]);
        assert_eq!(bindings.action_for_key("W"), Some(GameAction::Select));
        assert!(matches!(
            bindings.rebind(GameAction::Select, "MOUSE4"),
            Err(KeyBindingError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_remove_binding() {
        let mut bindings = KeyBindings::defaults();
        assert!(bindings.remove_binding(GameAction::Up, "W").is_ok());
        assert!(matches!(
            bindings.remove_binding(GameAction::Up, "W"),
            Err(KeyBindingError::NotBound { .. })
        ));
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings").join("key_bindings.json");

        let bindings = KeyBindings::load(&path);
        assert_eq!(bindings, KeyBindings::defaults());
        assert!(path.exists());

        let mut custom = KeyBindings::defaults();
        custom.rebind(GameAction::Stats, "F5").unwrap();
        custom.save(&path).unwrap();
        assert_eq!(KeyBindings::load(&path).action_for_key("F5"), Some(GameAction::Stats));
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key_bindings.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(KeyBindings::load(&path), KeyBindings::defaults());
    }

    #[test]
    fn test_single_direction_with_fallback() {
        let bindings = KeyBindings::defaults();
        let mut input = InputState::new();

        input.on_key_press("W", &bindings);
        input.on_key_press("D", &bindings);
        assert_eq!(input.direction(), Some(Direction::Right));
        assert!(!input.is_active(GameAction::Up, &bindings));

        input.on_key_release("D", &bindings);
        assert_eq!(input.direction(), Some(Direction::Up));

        input.on_key_release("W", &bindings);
        assert_eq!(input.direction(), None);
    }

    #[test]
    fn test_pressed_this_frame() {
        let bindings = KeyBindings::defaults();
        let mut input = InputState::new();
        let press = input.on_key_press("ENTER", &bindings);

        assert!(press.is(GameAction::Select));
        assert!(input.take_pressed(GameAction::Select));
        assert!(!input.take_pressed(GameAction::Select));
        assert!(input.is_active(GameAction::Select, &bindings));
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(typed_char("T"), Some('T'));
        assert_eq!(typed_char("NUM_7"), Some('7'));
        assert_eq!(typed_char("SPACE"), Some('_'));
        assert_eq!(typed_char("ENTER"), None);
        assert!(is_known_key("F12"));
        assert!(!is_known_key("F13"));
    }
}
