//! Chest events and the lock-picking protocol
//!
//! A chest is either unlocked (opens on interaction) or locked behind a
//! sequence of direction symbols such as `"<><>>"`. Each lock-pick input
//! appends one symbol to the attempt buffer:
//!
//! - buffer is no longer a prefix of the lock → buffer cleared, `Failed`
//! - buffer equals the lock → `Opened`
//! - otherwise → `Progress`
//!
//! There is no partial credit: one wrong symbol restarts the whole attempt.

use tracing::{debug, info};

use crate::game_data::GameData;
use crate::item::LootEntry;

/// Result of submitting one lock-pick symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockAttempt {
    /// Correct so far; carries the buffer entered
    Progress(String),
    /// Wrong symbol; the buffer was reset
    Failed,
    /// Full sequence entered
    Opened,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChestEvent {
    pub lock_sequence: String,
    pub loot: Vec<LootEntry>,
    pub is_empty: bool,
    attempt: String,
}

impl ChestEvent {
    pub fn new(lock_sequence: impl Into<String>, loot: Vec<LootEntry>) -> Self {
        ChestEvent {
            lock_sequence: lock_sequence.into(),
            loot,
            is_empty: false,
            attempt: String::new(),
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.lock_sequence.is_empty()
    }

    /// Symbols entered so far in the current attempt
    pub fn attempt(&self) -> &str {
        &self.attempt
    }

    pub fn reset_attempt(&mut self) {
        self.attempt.clear();
    }

    pub fn check_lock_attempt(&mut self, symbol: char) -> LockAttempt {
        self.attempt.push(symbol);

        if !self.lock_sequence.starts_with(self.attempt.as_str()) {
            debug!(attempt = %self.attempt, "Lock pick failed");
            self.attempt.clear();
            return LockAttempt::Failed;
        }
        if self.attempt == self.lock_sequence {
            self.attempt.clear();
            return LockAttempt::Opened;
        }
        LockAttempt::Progress(self.attempt.clone())
    }

    /// Transfers the loot into the player's inventory and marks the chest
    /// permanently empty in `data`
    ///
    /// Returns false (and changes nothing) if it was already empty.
    pub fn open(&mut self, chest_id: &str, data: &mut GameData) -> bool {
        if self.is_empty {
            return false;
        }

        for entry in &self.loot {
            let name = data.catalog().resolve(&entry.item_id).name;
            data.add_item(&entry.item_id, entry.count);
            data.push_notice(format!("+{} {}", entry.count, name));
        }

        self.is_empty = true;
        self.attempt.clear();
        data.set_chest_emptied(chest_id);
        info!(chest_id, items = self.loot.len(), "Chest opened");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_sequence_success() {
        let mut chest = ChestEvent::new("<>", Vec::new());

        assert_eq!(chest.check_lock_attempt('<'), LockAttempt::Progress("<".to_string()));
        assert_eq!(chest.check_lock_attempt('>'), LockAttempt::Opened);
    }

    #[test]
    fn test_wrong_symbol_resets_buffer() {
        let mut chest = ChestEvent::new("<>", Vec::new());

        assert_eq!(chest.check_lock_attempt('>'), LockAttempt::Failed);
        assert_eq!(chest.attempt(), "");

        // A failed attempt restarts from scratch
        chest.check_lock_attempt('<');
        assert_eq!(chest.check_lock_attempt('<'), LockAttempt::Failed);
        assert_eq!(chest.attempt(), "");
    }

    #[test]
    fn test_open_transfers_loot_once() {
        let mut data = GameData::new();
        let mut chest = ChestEvent::new(
            "",
            vec![LootEntry::new("healing_potion", 2), LootEntry::new("key_gate", 1)],
        );

        assert!(chest.open("chest_0_forest", &mut data));
        assert_eq!(data.get_item_count("healing_potion"), 2);
        assert!(data.has_item("key_gate"));
        assert!(data.is_chest_emptied("chest_0_forest"));
        assert_eq!(data.take_notices().len(), 2);

        assert!(!chest.open("chest_0_forest", &mut data));
        assert_eq!(data.get_item_count("healing_potion"), 2);
    }

    #[test]
    fn test_loot_respects_stackability() {
        let mut data = GameData::new();
        data.add_item("healing_potion", 1);
        let mut chest = ChestEvent::new(
            "",
            vec![LootEntry::new("healing_potion", 2), LootEntry::new("rusty_sword", 2)],
        );

        chest.open("c", &mut data);

        // Potions merge into one stack, swords get one stack each
        assert_eq!(data.player.inventory.len(), 3);
        assert_eq!(data.get_item_count("healing_potion"), 3);
    }
}
