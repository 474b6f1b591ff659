//! Save manager for handling save/load operations
//!
//! This module provides the SaveManager struct which handles:
//! - Saving game data to slot files
//! - Loading game data from slot files
//! - JSON export for debugging
//! - Save slot listing

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::types::*;
use crate::game_data::GameData;

pub struct SaveManager {
    save_directory: PathBuf,
    current_save_slot: u8,
}

/// Summary of one occupied slot, for the lobby's continue option
#[derive(Debug, Clone)]
pub struct SaveSlotInfo {
    pub slot: u8,
    pub metadata: SaveMetadata,
}

impl SaveManager {
    /// Creates a new SaveManager with the given save directory
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(save_directory: impl AsRef<Path>) -> Result<Self, SaveError> {
        let save_dir = save_directory.as_ref().to_path_buf();

        if !save_dir.exists() {
            fs::create_dir_all(&save_dir)?;
        }

        Ok(SaveManager {
            save_directory: save_dir,
            current_save_slot: 1,
        })
    }

    /// Sets the current save slot (1-5)
    pub fn set_save_slot(&mut self, slot: u8) {
        self.current_save_slot = slot.clamp(1, MAX_SAVE_SLOT);
    }

    /// Gets the current save slot
    pub fn get_save_slot(&self) -> u8 {
        self.current_save_slot
    }

    pub fn save_directory(&self) -> &Path {
        &self.save_directory
    }

    pub fn slot_path(&self, slot: u8) -> PathBuf {
        self.save_directory.join(format!("slot_{}.sav", slot))
    }

    /// Saves the game data to the current slot
    pub fn save_game(&self, data: &GameData) -> Result<PathBuf, SaveError> {
        self.save_to_slot(data, self.current_save_slot)
    }

    pub fn save_to_slot(&self, data: &GameData, slot: u8) -> Result<PathBuf, SaveError> {
        check_slot(slot)?;
        let filepath = self.slot_path(slot);

        let save_file = SaveFile {
            version: CURRENT_SAVE_VERSION,
            metadata: SaveMetadata::describe(data, slot),
            data: data.clone(),
        };
        let bytes = bincode::serialize(&save_file).map_err(SaveError::Encode)?;
        fs::write(&filepath, bytes)?;

        info!(path = %filepath.display(), "Game saved");
        Ok(filepath)
    }

    /// Loads the current slot
    ///
    /// A missing file is not an error: it logs a warning and returns None so
    /// the caller keeps its defaults. A corrupt or newer-version file is.
    pub fn load_game(&self) -> Result<Option<GameData>, SaveError> {
        self.load_from_slot(self.current_save_slot)
    }

    pub fn load_from_slot(&self, slot: u8) -> Result<Option<GameData>, SaveError> {
        check_slot(slot)?;
        let filepath = self.slot_path(slot);

        match self.read_save_file(&filepath)? {
            Some(save_file) => {
                info!(path = %filepath.display(), "Game loaded");
                Ok(Some(save_file.data))
            }
            None => {
                warn!(path = %filepath.display(), "Save file not found, keeping defaults");
                Ok(None)
            }
        }
    }

    fn read_save_file(&self, filepath: &Path) -> Result<Option<SaveFile>, SaveError> {
        if !filepath.exists() {
            return Ok(None);
        }

        let bytes = fs::read(filepath)?;
        let save_file: SaveFile = bincode::deserialize(&bytes).map_err(SaveError::Decode)?;

        // Version check
        if save_file.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::InvalidVersion(save_file.version));
        }

        Ok(Some(save_file))
    }

    /// Writes a human-readable JSON dump of the game data
    pub fn export_json(&self, data: &GameData, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "Game data exported");
        Ok(())
    }

    /// Lists occupied slots, skipping unreadable files
    pub fn list_saves(&self) -> Vec<SaveSlotInfo> {
        (1..=MAX_SAVE_SLOT)
            .filter_map(|slot| match self.read_save_file(&self.slot_path(slot)) {
                Ok(Some(save_file)) => Some(SaveSlotInfo {
                    slot,
                    metadata: save_file.metadata,
                }),
                Ok(None) => None,
                Err(err) => {
                    warn!(slot, %err, "Skipping unreadable save slot");
                    None
                }
            })
            .collect()
    }

    /// Check if a save file exists for a given slot
    pub fn save_exists(&self, slot: u8) -> bool {
        self.slot_path(slot).exists()
    }
}

fn check_slot(slot: u8) -> Result<(), SaveError> {
    if (1..=MAX_SAVE_SLOT).contains(&slot) {
        Ok(())
    } else {
        Err(SaveError::InvalidSlot(slot))
    }
}
