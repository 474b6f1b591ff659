//! Loot table strings
//!
//! Map authors write loot tables as comma-separated `item_id:count` entries,
//! e.g. `"healing_potion:2,bug_shell"`. A bare id means a count of one.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    pub count: u32,
}

impl LootEntry {
    pub fn new(item_id: impl Into<String>, count: u32) -> Self {
        LootEntry {
            item_id: item_id.into(),
            count,
        }
    }
}

/// Parses a single `item_id[:count]` entry
///
/// Returns None for an empty id or a count that is not a positive integer.
pub fn parse_loot_entry(entry: &str) -> Option<LootEntry> {
    let entry = entry.trim();
    let (id, count) = match entry.split_once(':') {
        Some((id, count)) => (id.trim(), count.trim().parse::<u32>().ok()?),
        None => (entry, 1),
    };

    if id.is_empty() || count == 0 {
        return None;
    }
    Some(LootEntry::new(id, count))
}

/// Parses a whole loot string, skipping malformed entries with a warning
pub fn parse_loot_string(loot: &str) -> Vec<LootEntry> {
    loot.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let parsed = parse_loot_entry(entry);
            if parsed.is_none() {
                warn!(entry, "Skipping malformed loot entry");
            }
            parsed
        })
        .collect()
}
