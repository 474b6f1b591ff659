//! Simulation core of a top-down tile RPG
//!
//! [`context::GameContext`] bundles the persistent [`game_data::GameData`]
//! with the loaded [`world::GameWorld`], and [`states::GameStateManager`]
//! drives one base state plus a stack of modal overlays over it. Rendering
//! and input devices stay outside: states emit [`states::DrawList`]s and
//! consume key names.

pub mod collision;
pub mod config;
pub mod constants;
pub mod context;
pub mod entity;
pub mod error;
pub mod events;
pub mod game_data;
pub mod input_system;
pub mod inventory;
pub mod item;
pub mod map;
pub mod notifications;
pub mod save;
pub mod states;
pub mod stats;
pub mod timer;
pub mod world;

pub use context::GameContext;
pub use error::{GameError, GameResult};
pub use states::GameStateManager;
