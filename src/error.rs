use thiserror::Error;

use crate::config::ConfigError;
use crate::input_system::KeyBindingError;
use crate::inventory::InventoryError;
use crate::map::MapError;
use crate::save::SaveError;
use crate::states::CheatError;
use crate::stats::StatError;
use crate::world::WorldError;

/// Any failure the game can surface to its driver
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    KeyBinding(#[from] KeyBindingError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Stat(#[from] StatError),
    #[error(transparent)]
    Cheat(#[from] CheatError),
}

pub type GameResult<T> = Result<T, GameError>;
