//! Save data types
//!
//! The save file is a small versioned envelope around the full game data.
//! Everything inside `data` is an opaque dump; only the envelope is
//! inspected on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_data::GameData;

/// The root save file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub metadata: SaveMetadata,
    pub data: GameData,
}

/// Metadata about the save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub game_version: String,
    /// Local time of the save, RFC 3339
    pub saved_at: String,
    pub player_name: String,
    pub player_level: i32,
    pub map_name: Option<String>,
    pub playtime_seconds: u64,
    pub save_slot: u8,
}

impl SaveMetadata {
    pub fn describe(data: &GameData, slot: u8) -> Self {
        SaveMetadata {
            game_version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: chrono::Local::now().to_rfc3339(),
            player_name: data.player.name.clone(),
            player_level: data.player.level,
            map_name: data.player.map_name.clone(),
            playtime_seconds: data.statistics.play_time_secs as u64,
            save_slot: slot,
        }
    }
}

/// Error types for save/load operations
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode save data: {0}")]
    Encode(bincode::Error),

    #[error("Corrupted save data: {0}")]
    Decode(bincode::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save version: {0}")]
    InvalidVersion(u32),

    #[error("Invalid save slot: {0} (expected 1-{max})", max = MAX_SAVE_SLOT)]
    InvalidSlot(u8),
}

/// Current save file version
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Highest usable save slot
pub const MAX_SAVE_SLOT: u8 = 5;
