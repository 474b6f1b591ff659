//! Map loading
//!
//! `format` mirrors the Tiled JSON document; `loader` turns it into the
//! events, zones, spawns and collision geometry the world runs on.

pub mod format;
pub mod loader;

pub use format::{Layer, TiledMap, TiledObject, TiledProperty};
pub use loader::{FileMapSource, LoadedMap, MapError, MapLoader, MapSource, MemoryMapSource};
