//! Save/Load system
//!
//! This module persists the whole [`GameData`](crate::game_data::GameData)
//! store as one opaque binary blob per slot:
//! - bincode-encoded save files (`slot_<n>.sav`)
//! - Multiple save slots (1-5)
//! - A pretty JSON export of the same data for debugging
//!
//! # Architecture
//!
//! - `types`: Save file envelope and error types
//! - `manager`: SaveManager for file operations
//!
//! # Example Usage
//!
//! ```ignore
//! let mut save_manager = SaveManager::new("~/.tile_rpg/saves")?;
//!
//! save_manager.save_game(&game_data)?;
//!
//! // Missing file is not an error: defaults stay in place
//! if let Some(loaded) = save_manager.load_game()? {
//!     game_data = loaded;
//! }
//! ```

pub mod manager;
pub mod types;

// Re-export commonly used types
pub use manager::{SaveManager, SaveSlotInfo};
pub use types::*;
