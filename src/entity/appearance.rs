//! Per-type creature appearance
//!
//! Sprite sheets are loaded by the renderer. The simulation only needs to
//! know the sprite size (which is also the creature's collision box) and
//! the walk-animation speed. A type whose sprites are missing falls back to
//! the `default` appearance; creature creation never fails because of art.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Key of the fallback appearance
pub const DEFAULT_APPEARANCE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub width: f32,
    pub height: f32,
    /// Seconds between walk frames
    pub animation_speed: f32,
}

impl Appearance {
    pub const fn new(width: f32, height: f32, animation_speed: f32) -> Self {
        Appearance {
            width,
            height,
            animation_speed,
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance::new(64.0, 64.0, 0.4)
    }
}

/// Answers whether sprite art exists for a key
pub trait SpriteSource {
    fn has_sprites(&self, key: &str) -> bool;
}

/// Sprites live in `<root>/<key>/` directories
#[derive(Debug, Clone)]
pub struct SpriteDirectory {
    root: PathBuf,
}

impl SpriteDirectory {
    pub fn new(root: impl AsRef<Path>) -> Self {
        SpriteDirectory {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl SpriteSource for SpriteDirectory {
    fn has_sprites(&self, key: &str) -> bool {
        self.root.join(key).is_dir()
    }
}

/// Accepts every key (headless runs and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySprites;

impl SpriteSource for AnySprites {
    fn has_sprites(&self, _key: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct AppearanceCatalog {
    entries: HashMap<String, Appearance>,
}

impl AppearanceCatalog {
    pub fn create_default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(DEFAULT_APPEARANCE.to_string(), Appearance::default());
        entries.insert("bug".to_string(), Appearance::new(16.0, 16.0, 0.6));
        entries.insert("Elder".to_string(), Appearance::new(63.0, 63.0, 0.4));
        entries.insert("Trader".to_string(), Appearance::new(16.0, 16.0, 0.5));
        AppearanceCatalog { entries }
    }

    pub fn insert(&mut self, key: impl Into<String>, appearance: Appearance) {
        self.entries.insert(key.into(), appearance);
    }

    /// Table lookup with fallback to the default entry
    pub fn get(&self, key: &str) -> Appearance {
        self.entries
            .get(key)
            .or_else(|| self.entries.get(DEFAULT_APPEARANCE))
            .copied()
            .unwrap_or_default()
    }

    /// Resolves the sprite key actually used and its appearance
    ///
    /// If the source has no art for `key`, logs a warning and returns the
    /// default appearance instead.
    pub fn resolve(&self, key: &str, sprites: &dyn SpriteSource) -> (String, Appearance) {
        if sprites.has_sprites(key) {
            (key.to_string(), self.get(key))
        } else {
            warn!(sprite_key = key, "Creature sprites missing, using default appearance");
            (DEFAULT_APPEARANCE.to_string(), self.get(DEFAULT_APPEARANCE))
        }
    }
}

impl Default for AppearanceCatalog {
    fn default() -> Self {
        Self::create_default()
    }
}

/// NPCs are drawn by name, everything else by type
pub fn sprite_key<'a>(monster_type: &'a str, name: &'a str) -> &'a str {
    if monster_type == "npc" { name } else { monster_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_falls_back_to_default() {
        let catalog = AppearanceCatalog::create_default();
        assert_eq!(catalog.get("bug"), Appearance::new(16.0, 16.0, 0.6));
        assert_eq!(catalog.get("dragon"), Appearance::default());
    }

    #[test]
    fn test_missing_sprites_use_default() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bug")).unwrap();
        let sprites = SpriteDirectory::new(dir.path());
        let catalog = AppearanceCatalog::create_default();

        let (key, appearance) = catalog.resolve("bug", &sprites);
        assert_eq!(key, "bug");
        assert_eq!(appearance.width, 16.0);

        let (key, appearance) = catalog.resolve("slime", &sprites);
        assert_eq!(key, DEFAULT_APPEARANCE);
        assert_eq!(appearance, Appearance::default());
    }

    #[test]
    fn test_sprite_key() {
        assert_eq!(sprite_key("npc", "Elder"), "Elder");
        assert_eq!(sprite_key("bug", "Beetle"), "bug");
    }
}
