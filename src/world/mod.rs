// World module - the loaded map and everything living on it
//
// This module contains:
// - game_world.rs: GameWorld, map loading, teleportation and the per-tick
//   ordering of entity and event updates
// - body.rs: the player's collision body and wall-rollback movement

pub mod body;
pub mod game_world;

pub use body::PlayerBody;
pub use game_world::{GameWorld, WorldError, WorldTick};
