//! Spatial trigger system
//!
//! Activation is driven from exactly one place, [`EventManager::check_collisions`].
//! Two gates apply independently:
//!
//! - rectangle overlap between the actor box and the event rectangle
//! - a circular proximity gate (`INTERACTION_RADIUS`) between the actor's
//!   centre and the event's centre
//!
//! Chests need both gates plus a `select` press. Teleports and generic
//! triggers fire on overlap alone. After any activation the event ignores
//! further activations for `EVENT_COOLDOWN_TICKS` ticks; the countdown lives
//! in the shared [`Timers`] service.

use tracing::{debug, info};

use crate::collision::{aabb_intersect, distance, Rect};
use crate::constants::{CHEST_MARKER_RADIUS, EVENT_COOLDOWN_TICKS, INTERACTION_RADIUS};
use crate::game_data::GameData;
use crate::timer::{Countdown, Timers};

use super::chest::LockAttempt;
use super::event::{EventKind, EventOutcome, GameEvent};

/// A chest sprite placed on the `containers` tile layer
#[derive(Debug, Clone, PartialEq)]
pub struct ChestMarker {
    pub center: (f32, f32),
    /// Nearest chest event, if one lies within range
    pub chest_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct EventManager {
    events: Vec<GameEvent>,
    markers: Vec<ChestMarker>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded events, restoring emptied chests from `data`
    pub fn load_events(&mut self, events: Vec<GameEvent>, data: &GameData) {
        self.events = events;
        self.markers.clear();

        for event in &mut self.events {
            let id = event.id.clone();
            if let Some(chest) = event.chest_mut() {
                if data.is_chest_emptied(&id) {
                    chest.is_empty = true;
                    debug!(chest_id = %id, "Restored emptied chest");
                }
            }
        }
        info!(count = self.events.len(), "Events loaded");
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn get(&self, event_id: &str) -> Option<&GameEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn get_mut(&mut self, event_id: &str) -> Option<&mut GameEvent> {
        self.events.iter_mut().find(|e| e.id == event_id)
    }

    /// Syncs each event's `activated` flag with its cooldown timer
    pub fn update(&mut self, timers: &Timers) {
        for event in &mut self.events {
            if event.activated && !timers.is_running(&event.cooldown_key()) {
                event.activated = false;
            }
        }
    }

    /// Tests the actor box against every event and runs activations
    pub fn check_collisions(
        &mut self,
        actor: &Rect,
        select_pressed: bool,
        data: &mut GameData,
        timers: &mut Timers,
    ) -> Vec<EventOutcome> {
        let actor_center = actor.center();
        let mut outcomes = Vec::new();

        for event in &mut self.events {
            event.highlighted = false;
            if !aabb_intersect(actor, &event.rect) {
                continue;
            }

            let close_enough = distance(actor_center, event.center()) <= INTERACTION_RADIUS;
            let fires = match event.kind {
                EventKind::Chest(_) => {
                    event.highlighted = close_enough;
                    close_enough && select_pressed
                }
                EventKind::Teleport(_) | EventKind::Generic { .. } => true,
            };
            if !fires {
                continue;
            }

            let key = event.cooldown_key();
            if timers.is_running(&key) {
                continue;
            }

            outcomes.push(event.activate(data));
            event.activated = true;
            timers.register(key, Countdown::ticks(EVENT_COOLDOWN_TICKS));
        }
        outcomes
    }

    /// Closest chest event to a point within `max_distance`
    pub fn find_nearest_chest(&self, x: f32, y: f32, max_distance: f32) -> Option<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.is_chest())
            .map(|e| (e, distance((x, y), e.center())))
            .filter(|(_, d)| *d <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    /// Binds chest sprites to the nearest chest event within three tiles
    pub fn bind_markers(&mut self, centers: &[(f32, f32)]) {
        self.markers = centers
            .iter()
            .map(|&center| ChestMarker {
                center,
                chest_id: self
                    .find_nearest_chest(center.0, center.1, CHEST_MARKER_RADIUS)
                    .map(|e| e.id.clone()),
            })
            .collect();
    }

    /// Each marker with whether its chest is open
    pub fn marker_states(&self) -> Vec<(&ChestMarker, bool)> {
        self.markers
            .iter()
            .map(|marker| {
                let open = marker
                    .chest_id
                    .as_deref()
                    .and_then(|id| self.get(id))
                    .and_then(GameEvent::chest)
                    .is_some_and(|chest| chest.is_empty);
                (marker, open)
            })
            .collect()
    }

    /// Feeds one lock-pick symbol to a chest, opening it on success
    ///
    /// Returns None if `chest_id` is not a loaded chest.
    pub fn submit_lock_symbol(&mut self, chest_id: &str, symbol: char, data: &mut GameData) -> Option<LockAttempt> {
        let chest = self.get_mut(chest_id)?.chest_mut()?;
        let attempt = chest.check_lock_attempt(symbol);
        if attempt == LockAttempt::Opened {
            chest.open(chest_id, data);
        }
        Some(attempt)
    }

    /// Abandons an in-progress lock pick
    pub fn cancel_lock_pick(&mut self, chest_id: &str) {
        if let Some(chest) = self.get_mut(chest_id).and_then(GameEvent::chest_mut) {
            chest.reset_attempt();
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.markers.clear();
    }
}
