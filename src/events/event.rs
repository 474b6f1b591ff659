use tracing::{debug, info};

use crate::collision::Rect;
use crate::game_data::{GameData, Properties};
use crate::item::parse_loot_string;
use crate::timer::{TimerKey, TimerKind};

use super::chest::ChestEvent;
use super::teleport::{TeleportEvent, TeleportRequest};

/// Variant-specific state of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Chest(ChestEvent),
    Teleport(TeleportEvent),
    /// Any other map-authored trigger, identified by its type tag
    Generic { tag: String },
}

impl EventKind {
    pub fn tag(&self) -> &str {
        match self {
            EventKind::Chest(_) => "chest",
            EventKind::Teleport(_) => "teleport",
            EventKind::Generic { tag } => tag,
        }
    }
}

/// What an activation asks the caller to do next
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Locked chest: open the lock-picking overlay for it
    LockPicking { chest_id: String },
    ChestOpened { chest_id: String },
    AlreadyEmpty { chest_id: String },
    Teleport(TeleportRequest),
    Triggered { event_id: String, tag: String },
}

/// A map-authored spatial trigger
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    pub id: String,
    pub name: String,
    /// Activation area in world pixels, normalised
    pub rect: Rect,
    pub properties: Properties,
    pub map_name: String,
    /// Set on activation, cleared once the cooldown runs out
    pub activated: bool,
    /// A chest the player is close enough to open
    pub highlighted: bool,
    pub kind: EventKind,
}

impl GameEvent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rect: Rect,
        properties: Properties,
        map_name: impl Into<String>,
        kind: EventKind,
    ) -> Self {
        GameEvent {
            id: id.into(),
            name: name.into(),
            rect: rect.normalized(),
            properties,
            map_name: map_name.into(),
            activated: false,
            highlighted: false,
            kind,
        }
    }

    /// Builds the variant named by `event_type` from the property bag
    ///
    /// Chests read `lock` and `loot`, teleports read `target_map`,
    /// `target_x` and `target_y`. Unknown types become generic triggers.
    pub fn from_type(
        id: impl Into<String>,
        name: impl Into<String>,
        event_type: &str,
        rect: Rect,
        properties: Properties,
        map_name: impl Into<String>,
    ) -> Self {
        let kind = match event_type.to_ascii_lowercase().as_str() {
            "chest" => {
                let lock = properties
                    .get("lock")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .trim()
                    .to_string();
                let loot = properties
                    .get("loot")
                    .and_then(|v| v.as_str())
                    .map(parse_loot_string)
                    .unwrap_or_default();
                EventKind::Chest(ChestEvent::new(lock, loot))
            }
            "teleport" => EventKind::Teleport(TeleportEvent::from_properties(&properties)),
            other => EventKind::Generic {
                tag: other.to_string(),
            },
        };
        GameEvent::new(id, name, rect, properties, map_name, kind)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect.center()
    }

    pub fn is_chest(&self) -> bool {
        matches!(self.kind, EventKind::Chest(_))
    }

    pub fn chest(&self) -> Option<&ChestEvent> {
        match &self.kind {
            EventKind::Chest(chest) => Some(chest),
            _ => None,
        }
    }

    pub fn chest_mut(&mut self) -> Option<&mut ChestEvent> {
        match &mut self.kind {
            EventKind::Chest(chest) => Some(chest),
            _ => None,
        }
    }

    pub fn cooldown_key(&self) -> TimerKey {
        TimerKey::new(self.id.as_str(), TimerKind::EventCooldown)
    }

    /// Runs the variant's activation
    pub fn activate(&mut self, data: &mut GameData) -> EventOutcome {
        let id = self.id.clone();
        match &mut self.kind {
            EventKind::Chest(chest) => {
                if chest.is_empty {
                    data.push_notice("The chest is empty!");
                    return EventOutcome::AlreadyEmpty { chest_id: id };
                }
                if chest.is_locked() {
                    chest.reset_attempt();
                    info!(chest_id = %id, "Chest is locked");
                    return EventOutcome::LockPicking { chest_id: id };
                }
                chest.open(&id, data);
                EventOutcome::ChestOpened { chest_id: id }
            }
            EventKind::Teleport(teleport) => {
                info!(event_id = %id, target = ?teleport.target_map, x = teleport.target_x, y = teleport.target_y, "Teleport triggered");
                EventOutcome::Teleport(teleport.request())
            }
            EventKind::Generic { tag } => {
                debug!(event_id = %id, tag = %tag, "Trigger activated");
                EventOutcome::Triggered {
                    event_id: id,
                    tag: tag.clone(),
                }
            }
        }
    }
}
