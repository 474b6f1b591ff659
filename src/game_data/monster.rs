//! Monster and NPC records
//!
//! A [`MonsterRecord`] is built by copying a [`MonsterTemplate`] for the
//! creature's type and then overlaying the map-authored property bag.
//!
//! # Overlay rules
//!
//! - Only keys on the template's allow-list touch typed fields
//! - Unknown keys are kept untouched in the record's `extra` side-table
//! - Dialogue keys are only accepted when the template supports dialogue
//! - If the overlay does not set `health`, health starts at `max_health`
//! - `loot` is a loot string (`"item:count,item"`) replacing the template's

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::item::{parse_loot_string, LootEntry};
use super::properties::{Properties, PropertyValue};

/// How a creature reacts to seeing the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Attacks on sight
    Aggressive,
    /// Never attacks; may offer dialogue
    Passive,
}

impl FromStr for Behavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Ok(Behavior::Aggressive),
            "passive" => Ok(Behavior::Passive),
            other => Err(format!("unknown behavior '{other}'")),
        }
    }
}

/// Dialogue defaults carried by dialogue-capable templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueDefaults {
    pub can_dialogue: bool,
    pub active_topic: String,
}

/// Default-value prototype for one creature type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub monster_type: String,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub speed: f32,
    pub chase_speed: f32,
    pub vision_range: f32,
    pub behavior: Behavior,
    pub loot: Vec<LootEntry>,
    pub dialogue: Option<DialogueDefaults>,
}

/// Property keys a map may override on any template
const OVERLAY_KEYS: &[&str] = &[
    "name",
    "health",
    "max_health",
    "damage",
    "speed",
    "chase_speed",
    "vision_range",
    "behavior",
    "loot",
];

/// Extra keys accepted when the template supports dialogue
const DIALOGUE_KEYS: &[&str] = &["can_dialogue", "active_topic"];

impl MonsterTemplate {
    pub fn bug() -> Self {
        MonsterTemplate {
            monster_type: "bug".to_string(),
            health: 30,
            max_health: 30,
            damage: 5,
            speed: 1.0,
            chase_speed: 1.5,
            vision_range: 200.0,
            behavior: Behavior::Aggressive,
            loot: vec![LootEntry::new("bug_shell", 1)],
            dialogue: None,
        }
    }

    pub fn npc() -> Self {
        MonsterTemplate {
            monster_type: "npc".to_string(),
            health: 100,
            max_health: 100,
            damage: 0,
            speed: 0.5,
            chase_speed: 0.5,
            vision_range: 150.0,
            behavior: Behavior::Passive,
            loot: Vec::new(),
            dialogue: Some(DialogueDefaults {
                can_dialogue: true,
                active_topic: "greeting".to_string(),
            }),
        }
    }

    /// Template for a type nobody registered, shaped like a bug
    pub fn generic(monster_type: &str) -> Self {
        MonsterTemplate {
            monster_type: monster_type.to_string(),
            loot: Vec::new(),
            ..Self::bug()
        }
    }

    /// Built-in templates keyed by type
    pub fn default_set() -> HashMap<String, MonsterTemplate> {
        [Self::bug(), Self::npc()]
            .into_iter()
            .map(|t| (t.monster_type.clone(), t))
            .collect()
    }

    /// Returns true if map authors may override `key` on this template
    pub fn allows(&self, key: &str) -> bool {
        OVERLAY_KEYS.contains(&key) || (self.dialogue.is_some() && DIALOGUE_KEYS.contains(&key))
    }
}

/// Live data of one monster or NPC instance
///
/// Position is in world pixels (creature centre).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub id: String,
    pub monster_type: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub speed: f32,
    pub chase_speed: f32,
    pub vision_range: f32,
    pub behavior: Behavior,
    pub is_alive: bool,
    pub zone_id: Option<String>,
    pub map_name: String,
    pub loot: Vec<LootEntry>,
    pub can_dialogue: bool,
    pub active_topic: Option<String>,
    /// Map-authored keys outside the template's allow-list
    pub extra: Properties,
}

impl MonsterRecord {
    /// Copies a template into a fresh record
    pub fn from_template(
        template: &MonsterTemplate,
        id: impl Into<String>,
        name: impl Into<String>,
        position: (f32, f32),
        map_name: impl Into<String>,
    ) -> Self {
        let (can_dialogue, active_topic) = match &template.dialogue {
            Some(d) => (d.can_dialogue, Some(d.active_topic.clone())),
            None => (false, None),
        };

        MonsterRecord {
            id: id.into(),
            monster_type: template.monster_type.clone(),
            name: name.into(),
            x: position.0,
            y: position.1,
            health: template.health,
            max_health: template.max_health,
            damage: template.damage,
            speed: template.speed,
            chase_speed: template.chase_speed,
            vision_range: template.vision_range,
            behavior: template.behavior,
            is_alive: true,
            zone_id: None,
            map_name: map_name.into(),
            loot: template.loot.clone(),
            can_dialogue,
            active_topic,
            extra: Properties::new(),
        }
    }

    /// Applies a map-authored property bag on top of the template values
    pub fn apply_overrides(&mut self, template: &MonsterTemplate, properties: &Properties) {
        let mut health_overridden = false;

        for (key, value) in properties {
            if !template.allows(key) {
                self.extra.insert(key.clone(), value.clone());
                continue;
            }

            let applied = match key.as_str() {
                "name" => value.as_str().map(|v| self.name = v.to_string()),
                "health" => value.as_i64().map(|v| {
                    self.health = saturate_i32(v);
                    health_overridden = true;
                }),
                "max_health" => value.as_i64().map(|v| self.max_health = saturate_i32(v).max(1)),
                "damage" => value.as_i64().map(|v| self.damage = saturate_i32(v).max(0)),
                "speed" => value.as_f64().map(|v| self.speed = v as f32),
                "chase_speed" => value.as_f64().map(|v| self.chase_speed = v as f32),
                "vision_range" => value.as_f64().map(|v| self.vision_range = v as f32),
                "behavior" => value
                    .as_str()
                    .and_then(|v| v.parse::<Behavior>().ok())
                    .map(|v| self.behavior = v),
                "loot" => value.as_str().map(|v| self.loot = parse_loot_string(v)),
                "can_dialogue" => value.as_bool().map(|v| self.can_dialogue = v),
                "active_topic" => match value {
                    PropertyValue::Str(v) => {
                        self.active_topic = Some(v.clone());
                        Some(())
                    }
                    _ => None,
                },
                _ => None,
            };

            if applied.is_none() {
                warn!(monster_id = %self.id, key, %value, "Ignoring property with wrong value type");
            }
        }

        if !health_overridden {
            self.health = self.max_health;
        }
        self.health = self.health.clamp(0, self.max_health);
        self.is_alive = self.health > 0;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Passive and dialogue-capable
    pub fn offers_dialogue(&self) -> bool {
        self.behavior == Behavior::Passive && self.can_dialogue
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
