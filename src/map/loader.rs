//! Translates a Tiled document into simulation data
//!
//! Editor coordinates have a top-left origin with y pointing down; the
//! world has a bottom-left origin with y pointing up. Every coordinate is
//! scaled so one editor tile becomes `TILE_SIZE` world pixels and then
//! flipped with `world_y = map_height - editor_y`.
//!
//! Layers consumed (names are case-insensitive):
//!
//! | layer        | kind    | produces                         |
//! |--------------|---------|----------------------------------|
//! | `events`     | objects | [`GameEvent`]s                   |
//! | `zones`      | objects | [`Zone`]s                        |
//! | `entities`   | objects | [`SpawnRequest`]s                |
//! | `collisions` | tiles   | wall rectangles                  |
//! | `containers` | tiles   | chest marker centres             |
//!
//! `ground` and `walls` are visual only and left to the renderer.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collision::{CollisionLayer, Rect};
use crate::constants::TILE_SIZE;
use crate::entity::SpawnRequest;
use crate::events::GameEvent;
use crate::game_data::Zone;

use super::format::{Layer, ObjectGroup, TileLayer, TiledMap, TiledObject};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map '{name}' not found at {path}")]
    NotFound { name: String, path: PathBuf },
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("map '{name}' is not valid Tiled JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("map '{0}' has a zero tile size")]
    InvalidTileSize(String),
}

/// Where map documents come from
pub trait MapSource {
    fn load(&self, name: &str) -> Result<TiledMap, MapError>;
}

/// Reads `<maps_dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileMapSource {
    maps_dir: PathBuf,
}

impl FileMapSource {
    pub fn new(maps_dir: impl AsRef<Path>) -> Self {
        FileMapSource {
            maps_dir: maps_dir.as_ref().to_path_buf(),
        }
    }

    pub fn map_path(&self, name: &str) -> PathBuf {
        self.maps_dir.join(format!("{name}.json"))
    }
}

impl MapSource for FileMapSource {
    fn load(&self, name: &str) -> Result<TiledMap, MapError> {
        let path = self.map_path(name);
        if !path.exists() {
            return Err(MapError::NotFound {
                name: name.to_string(),
                path,
            });
        }
        let text = fs::read_to_string(&path)?;
        parse_map(name, &text)
    }
}

/// Map documents held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryMapSource {
    maps: HashMap<String, String>,
}

impl MemoryMapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.maps.insert(name.into(), json.into());
    }
}

impl MapSource for MemoryMapSource {
    fn load(&self, name: &str) -> Result<TiledMap, MapError> {
        match self.maps.get(name) {
            Some(text) => parse_map(name, text),
            None => Err(MapError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
            }),
        }
    }
}

fn parse_map(name: &str, text: &str) -> Result<TiledMap, MapError> {
    serde_json::from_str(text).map_err(|source| MapError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Everything one map contributes to the world
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub name: String,
    /// Whole map in world pixels
    pub bounds: Rect,
    pub collision: CollisionLayer,
    pub events: Vec<GameEvent>,
    pub zones: Vec<Zone>,
    pub spawns: Vec<SpawnRequest>,
    pub chest_markers: Vec<(f32, f32)>,
}

pub struct MapLoader<'a> {
    name: &'a str,
    map: &'a TiledMap,
    scale: f32,
    height_px: f32,
}

impl<'a> MapLoader<'a> {
    pub fn new(name: &'a str, map: &'a TiledMap) -> Result<Self, MapError> {
        if map.tilewidth == 0 || map.tileheight == 0 {
            return Err(MapError::InvalidTileSize(name.to_string()));
        }
        let scale = TILE_SIZE / map.tilewidth as f32;
        Ok(MapLoader {
            name,
            map,
            scale,
            height_px: map.height as f32 * map.tileheight as f32 * scale,
        })
    }

    /// Loads `name` from `source` and builds it
    pub fn load(source: &dyn MapSource, name: &str) -> Result<LoadedMap, MapError> {
        let map = source.load(name)?;
        let loaded = MapLoader::new(name, &map)?.build();
        info!(
            map = name,
            events = loaded.events.len(),
            zones = loaded.zones.len(),
            spawns = loaded.spawns.len(),
            walls = loaded.collision.walls().len(),
            "Map loaded"
        );
        Ok(loaded)
    }

    pub fn build(&self) -> LoadedMap {
        let mut loaded = LoadedMap {
            name: self.name.to_string(),
            bounds: Rect::new(
                0.0,
                0.0,
                self.map.width as f32 * TILE_SIZE,
                self.map.height as f32 * TILE_SIZE,
            ),
            collision: CollisionLayer::new(self.name, Vec::new()),
            events: Vec::new(),
            zones: Vec::new(),
            spawns: Vec::new(),
            chest_markers: Vec::new(),
        };
        let mut walls = Vec::new();

        for layer in &self.map.layers {
            let Some(layer_name) = layer.name().map(str::to_ascii_lowercase) else {
                continue;
            };
            match (layer, layer_name.as_str()) {
                (Layer::ObjectGroup(group), "events") => loaded.events = self.events(group),
                (Layer::ObjectGroup(group), "zones") => loaded.zones = self.zones(group),
                (Layer::ObjectGroup(group), "entities") => loaded.spawns = self.spawns(group),
                (Layer::TileLayer(tiles), "collisions") => walls.extend(tile_rects(tiles)),
                (Layer::TileLayer(tiles), "containers") => {
                    loaded.chest_markers = tile_rects(tiles).map(|r| r.center()).collect();
                }
                _ => debug!(map = self.name, layer = %layer_name, "Layer not used by the simulation"),
            }
        }

        loaded.collision = CollisionLayer::new(self.name, walls);
        loaded
    }

    /// Editor box to world rectangle, kept as (left, top, width, -height)
    fn world_rect(&self, object: &TiledObject) -> Rect {
        let (left, top, width, height) = object.editor_bounds();
        Rect::new(
            left * self.scale,
            self.height_px - top * self.scale,
            width * self.scale,
            -height * self.scale,
        )
    }

    fn world_point(&self, object: &TiledObject) -> (f32, f32) {
        (object.x * self.scale, self.height_px - object.y * self.scale)
    }

    fn events(&self, group: &ObjectGroup) -> Vec<GameEvent> {
        group
            .objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                let properties = object.property_bag();
                let event_type = object.kind().unwrap_or_else(|| "trigger".to_string());
                let id = properties
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{event_type}_{index}_{}", self.name));
                let name = if object.name.is_empty() { "!" } else { object.name.as_str() };
                GameEvent::from_type(id, name, &event_type, self.world_rect(object), properties, self.name)
            })
            .collect()
    }

    fn zones(&self, group: &ObjectGroup) -> Vec<Zone> {
        group
            .objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                let properties = object.property_bag();
                let id = properties
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("zone_{}_{index}", self.name));
                let mut zone = Zone::new(id, self.world_rect(object), self.name);
                zone.properties = properties;
                zone
            })
            .collect()
    }

    fn spawns(&self, group: &ObjectGroup) -> Vec<SpawnRequest> {
        let mut spawns = Vec::new();
        for (index, object) in group.objects.iter().enumerate() {
            if !object.point && object.polygon.is_none() && (object.width > 0.0 || object.height > 0.0) {
                warn!(map = self.name, object = object.id, "Entity is not a point object, using its corner");
            }
            let monster_type = object.kind().unwrap_or_else(|| "bug".to_string());
            let name = if object.name.is_empty() {
                monster_type.clone()
            } else {
                object.name.clone()
            };
            spawns.push(SpawnRequest {
                id: format!("{monster_type}_{}_{index}", self.name),
                name,
                monster_type,
                position: self.world_point(object),
                properties: object.property_bag(),
                map_name: self.name.to_string(),
            });
        }
        spawns
    }
}

/// World rectangles of every non-empty tile in a tile layer
fn tile_rects(layer: &TileLayer) -> impl Iterator<Item = Rect> + '_ {
    let columns = layer.width.max(1) as usize;
    let rows = layer.height as f32;
    layer
        .data
        .iter()
        .enumerate()
        .filter(|(_, gid)| **gid != 0)
        .map(move |(i, _)| {
            let col = (i % columns) as f32;
            let row = (i / columns) as f32;
            Rect::new(col * TILE_SIZE, (rows - 1.0 - row) * TILE_SIZE, TILE_SIZE, TILE_SIZE)
        })
}
