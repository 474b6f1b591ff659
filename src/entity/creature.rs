//! Creature behaviour state machine
//!
//! Each live creature is a thin behavioural shell around an id. All of its
//! gameplay fields (position, health, speeds, zone, loot) live in the data
//! store and are read fresh through [`EntityDataStore`] every tick.
//!
//! # Transitions
//!
//! Evaluated once per tick, first match wins:
//!
//! 1. Player within `vision_range` and behaviour `aggressive` → `Chase`
//! 2. Player within `vision_range`, `passive` and dialogue-capable → `Idle`
//!    with the dialogue flag raised
//! 3. Creature outside its zone → `Return`
//! 4. Otherwise → `Idle` (wander)
//!
//! There is no line-of-sight test. Movement is cardinal only and a step
//! that would hit a wall is rolled back entirely.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::collision::{aabb_intersect, distance, CollisionLayer, Rect};
use crate::constants::{
    CONTACT_COOLDOWN_SECS, KILL_EXP_REWARD, REFERENCE_FPS, WANDER_MAX_SECS, WANDER_MIN_SECS,
};
use crate::game_data::{Behavior, EntityDataStore, EntityField, PropertyValue, Zone};
use crate::timer::{Countdown, TimerKey, TimerKind, Timers};

use super::animation::DirectionalAnimator;
use super::appearance::Appearance;
use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    Chase,
    Return,
}

impl BehaviorState {
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Chase => "chase",
            BehaviorState::Return => "return",
        }
    }
}

/// World-side collaborators a creature needs for one update
pub struct UpdateEnv<'a> {
    /// Player body, None when there is no player to react to
    pub player: Option<Rect>,
    pub collision: &'a CollisionLayer,
    pub timers: &'a mut Timers,
    pub rng: &'a mut StdRng,
}

/// Outcome of one combat exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub damage_to_player: i32,
    pub damage_to_creature: i32,
    pub killed: bool,
}

/// What happened to a creature during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatureTick {
    pub state: BehaviorState,
    pub moving: Option<Direction>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone)]
pub struct Creature {
    id: String,
    map_name: String,
    sprite_key: String,
    appearance: Appearance,
    state: BehaviorState,
    dialogue_available: bool,
    wander: Option<Direction>,
    animator: DirectionalAnimator,
}

impl Creature {
    pub fn new(
        id: impl Into<String>,
        map_name: impl Into<String>,
        sprite_key: impl Into<String>,
        appearance: Appearance,
    ) -> Self {
        Creature {
            id: id.into(),
            map_name: map_name.into(),
            sprite_key: sprite_key.into(),
            appearance,
            state: BehaviorState::Idle,
            dialogue_available: false,
            wander: None,
            animator: DirectionalAnimator::new(appearance.animation_speed),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn sprite_key(&self) -> &str {
        &self.sprite_key
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Raised while a passive, dialogue-capable creature sees the player
    pub fn dialogue_available(&self) -> bool {
        self.dialogue_available
    }

    pub fn facing(&self) -> Direction {
        self.animator.facing()
    }

    /// Sprite frame index for the renderer
    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    /// Collision box centred on the creature's stored position
    pub fn bounds<S: EntityDataStore + ?Sized>(&self, store: &S) -> Option<Rect> {
        let record = store.monster(&self.id)?;
        Some(Rect::from_center(
            record.x,
            record.y,
            self.appearance.width,
            self.appearance.height,
        ))
    }

    pub fn is_alive<S: EntityDataStore + ?Sized>(&self, store: &S) -> bool {
        store.monster(&self.id).is_some_and(|r| r.is_alive)
    }

    /// Runs one behaviour tick
    pub fn update<S: EntityDataStore + ?Sized>(
        &mut self,
        dt: f32,
        store: &mut S,
        env: &mut UpdateEnv<'_>,
    ) -> CreatureTick {
        let Some(record) = store.monster(&self.id) else {
            return self.tick(None, None);
        };
        if !record.is_alive {
            return self.tick(None, None);
        }

        let pos = record.position();
        let behavior = record.behavior;
        let vision_range = record.vision_range;
        let speed = record.speed;
        let chase_speed = record.chase_speed;
        let offers_dialogue = record.offers_dialogue();
        let zone: Option<Zone> = record
            .zone_id
            .as_deref()
            .and_then(|zone_id| store.zone(zone_id))
            .cloned();

        let sees_player = env
            .player
            .is_some_and(|p| distance(pos, p.center()) <= vision_range);
        let in_zone = zone.as_ref().is_none_or(|z| z.contains(pos.0, pos.1));
        self.dialogue_available = false;

        let moving = match (sees_player, env.player) {
            (true, Some(player)) if behavior == Behavior::Aggressive => {
                self.state = BehaviorState::Chase;
                let (px, py) = player.center();
                let direction = Direction::cardinal_toward(px - pos.0, py - pos.1);
                self.try_move(store, env.collision, pos, direction, chase_speed * dt * REFERENCE_FPS)
                    .then_some(direction)
            }
            (true, Some(_)) if behavior == Behavior::Passive && offers_dialogue => {
                self.state = BehaviorState::Idle;
                self.dialogue_available = true;
                self.wander_step(dt, store, env, pos, speed, zone.as_ref())
            }
            _ => match zone.as_ref() {
                Some(zone) if !in_zone => {
                    self.state = BehaviorState::Return;
                    let (cx, cy) = zone.center();
                    let direction = Direction::cardinal_toward(cx - pos.0, cy - pos.1);
                    let moved = self.try_move(store, env.collision, pos, direction, speed * dt * REFERENCE_FPS);
                    if self.inside(store, Some(zone)) {
                        self.state = BehaviorState::Idle;
                    }
                    moved.then_some(direction)
                }
                _ => {
                    self.state = BehaviorState::Idle;
                    self.wander_step(dt, store, env, pos, speed, zone.as_ref())
                }
            },
        };

        let contact = self.check_contact(store, env, behavior);
        self.animator.update(dt, moving);
        self.tick(moving, contact)
    }

    fn tick(&self, moving: Option<Direction>, contact: Option<Contact>) -> CreatureTick {
        CreatureTick {
            state: self.state,
            moving,
            contact,
        }
    }

    /// Moves one step unless the new box would overlap a wall
    fn try_move<S: EntityDataStore + ?Sized>(
        &self,
        store: &mut S,
        collision: &CollisionLayer,
        from: (f32, f32),
        direction: Direction,
        step: f32,
    ) -> bool {
        let (dx, dy) = direction.delta(step);
        let (nx, ny) = (from.0 + dx, from.1 + dy);
        let next = Rect::from_center(nx, ny, self.appearance.width, self.appearance.height);

        if collision.collides(&next) {
            return false;
        }

        store.set_field(&self.id, EntityField::X, PropertyValue::Float(nx as f64));
        store.set_field(&self.id, EntityField::Y, PropertyValue::Float(ny as f64));
        true
    }

    fn inside<S: EntityDataStore + ?Sized>(&self, store: &S, zone: Option<&Zone>) -> bool {
        match (zone, store.monster(&self.id)) {
            (Some(zone), Some(record)) => zone.contains(record.x, record.y),
            _ => true,
        }
    }

    /// Wander in the held direction, picking a new one when the timer expires
    fn wander_step<S: EntityDataStore + ?Sized>(
        &mut self,
        dt: f32,
        store: &mut S,
        env: &mut UpdateEnv<'_>,
        pos: (f32, f32),
        speed: f32,
        zone: Option<&Zone>,
    ) -> Option<Direction> {
        let key = TimerKey::new(self.id.as_str(), TimerKind::Wander);
        if !env.timers.is_running(&key) {
            // Index 4 means "stay put"
            let choice = env.rng.gen_range(0..5);
            self.wander = Direction::ALL.get(choice).copied();
            let hold = env.rng.gen_range(WANDER_MIN_SECS..=WANDER_MAX_SECS);
            env.timers.register(key, Countdown::seconds(hold));
        }

        let direction = self.wander?;
        let moved = self.try_move(store, env.collision, pos, direction, speed * dt * REFERENCE_FPS);

        if !self.inside(store, zone) {
            self.state = BehaviorState::Return;
        }
        moved.then_some(direction)
    }

    fn check_contact<S: EntityDataStore + ?Sized>(
        &self,
        store: &mut S,
        env: &mut UpdateEnv<'_>,
        behavior: Behavior,
    ) -> Option<Contact> {
        if behavior != Behavior::Aggressive {
            return None;
        }
        let player = env.player?;
        let bounds = self.bounds(store)?;
        if !aabb_intersect(&bounds, &player) {
            return None;
        }

        let key = TimerKey::new(self.id.as_str(), TimerKind::ContactCooldown);
        if env.timers.is_running(&key) {
            return None;
        }
        env.timers.register(key, Countdown::seconds(CONTACT_COOLDOWN_SECS));

        Some(self.resolve_contact(store, env.timers))
    }

    /// Symmetric damage exchange with the player
    fn resolve_contact<S: EntityDataStore + ?Sized>(&self, store: &mut S, timers: &mut Timers) -> Contact {
        let (damage, health, loot) = match store.monster(&self.id) {
            Some(record) => (record.damage, record.health, record.loot.clone()),
            None => {
                return Contact {
                    damage_to_player: 0,
                    damage_to_creature: 0,
                    killed: false,
                };
            }
        };
        let strength = store.player().strength;

        store.damage_player(damage);
        let new_health = (health - strength).max(0);
        store.set_field(&self.id, EntityField::Health, PropertyValue::Int(new_health as i64));
        debug!(creature = %self.id, damage, strength, new_health, "Combat exchange");

        let killed = new_health <= 0;
        if killed {
            store.set_field(&self.id, EntityField::IsAlive, PropertyValue::Bool(false));
            store.reward_kill(&self.id, KILL_EXP_REWARD, &loot);
            timers.cancel(&TimerKey::new(self.id.as_str(), TimerKind::Wander));
            info!(creature = %self.id, "Creature killed");
        }

        Contact {
            damage_to_player: damage,
            damage_to_creature: strength,
            killed,
        }
    }

    /// One-line description for the debug overlay
    pub fn debug_label<S: EntityDataStore + ?Sized>(&self, store: &S) -> String {
        match store.monster(&self.id) {
            Some(record) => format!(
                "{:?} {}({}): {}",
                record.behavior,
                record.name,
                record.zone_id.as_deref().unwrap_or("-"),
                self.state.name()
            ),
            None => self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::{GameData, Properties};
    use rand::SeedableRng;

    fn spawn(data: &mut GameData, id: &str, monster_type: &str, pos: (f32, f32), zone: Option<Zone>) -> Creature {
        let mut record = data.create_monster_data(id, "Mob", monster_type, pos, &Properties::new(), "forest");
        if let Some(zone) = zone {
            record.zone_id = Some(zone.id.clone());
            data.add_zone(zone);
        }
        data.add_mob(record);
        Creature::new(id, "forest", monster_type, Appearance::new(16.0, 16.0, 0.6))
    }

    fn run(
        creature: &mut Creature,
        data: &mut GameData,
        player: Option<Rect>,
        walls: &CollisionLayer,
        timers: &mut Timers,
    ) -> CreatureTick {
        let mut rng = StdRng::seed_from_u64(7);
        let mut env = UpdateEnv {
            player,
            collision: walls,
            timers,
            rng: &mut rng,
        };
        creature.update(1.0 / 60.0, data, &mut env)
    }

    #[test]
    fn test_aggressive_chases_along_larger_axis() {
        let mut data = GameData::new();
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (100.0, 100.0), None);
        let player = Rect::from_center(200.0, 120.0, 48.0, 48.0);

        let tick = run(&mut bug, &mut data, Some(player), &CollisionLayer::default(), &mut Timers::new());

        assert_eq!(tick.state, BehaviorState::Chase);
        assert_eq!(tick.moving, Some(Direction::Right));
        let record = data.monster("bug_forest_0").unwrap();
        assert!((record.x - 101.5).abs() < 1e-4);
        assert_eq!(record.y, 100.0);
    }

    #[test]
    fn test_blocked_move_is_rolled_back() {
        let mut data = GameData::new();
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (100.0, 100.0), None);
        let player = Rect::from_center(200.0, 100.0, 48.0, 48.0);
        let walls = CollisionLayer::new("forest", vec![Rect::new(109.0, 0.0, 64.0, 400.0)]);

        let tick = run(&mut bug, &mut data, Some(player), &walls, &mut Timers::new());

        assert_eq!(tick.state, BehaviorState::Chase);
        assert_eq!(data.monster("bug_forest_0").unwrap().position(), (100.0, 100.0));
    }

    #[test]
    fn test_blocked_creature_stops_walking() {
        let mut data = GameData::new();
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (100.0, 100.0), None);
        let player = Rect::from_center(200.0, 100.0, 48.0, 48.0);
        let walls = CollisionLayer::new("forest", vec![Rect::new(109.0, 0.0, 64.0, 400.0)]);
        let mut timers = Timers::new();

        for _ in 0..30 {
            let tick = run(&mut bug, &mut data, Some(player), &walls, &mut timers);
            assert_eq!(tick.moving, None);
        }
        assert_eq!(bug.facing(), Direction::Down);
        assert_eq!(bug.frame(), Direction::Down.base_frame());
    }

    #[test]
    fn test_passive_npc_offers_dialogue() {
        let mut data = GameData::new();
        let mut npc = spawn(&mut data, "npc_forest_0", "npc", (100.0, 100.0), None);
        let player = Rect::from_center(150.0, 100.0, 48.0, 48.0);

        let tick = run(&mut npc, &mut data, Some(player), &CollisionLayer::default(), &mut Timers::new());

        assert_eq!(tick.state, BehaviorState::Idle);
        assert!(npc.dialogue_available());
        assert!(tick.contact.is_none());
    }

    #[test]
    fn test_outside_zone_returns() {
        let mut data = GameData::new();
        let zone = Zone::new("zone_0", Rect::new(0.0, 640.0, 128.0, -128.0), "forest");
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (400.0, 576.0), Some(zone));

        let tick = run(&mut bug, &mut data, None, &CollisionLayer::default(), &mut Timers::new());

        assert_eq!(tick.state, BehaviorState::Return);
        assert_eq!(tick.moving, Some(Direction::Left));
        assert!(data.monster("bug_forest_0").unwrap().x < 400.0);
    }

    #[test]
    fn test_idle_in_zone_wanders() {
        let mut data = GameData::new();
        let zone = Zone::new("zone_0", Rect::new(0.0, 640.0, 128.0, -128.0), "forest");
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (64.0, 576.0), Some(zone));
        let mut timers = Timers::new();

        let tick = run(&mut bug, &mut data, None, &CollisionLayer::default(), &mut timers);

        assert_eq!(tick.state, BehaviorState::Idle);
        let remaining = timers
            .remaining(&TimerKey::new("bug_forest_0", TimerKind::Wander))
            .unwrap();
        assert!((WANDER_MIN_SECS..=WANDER_MAX_SECS).contains(&remaining));
    }

    #[test]
    fn test_combat_exchange_respects_cooldown() {
        let mut data = GameData::new();
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (100.0, 100.0), None);
        let player = Rect::from_center(100.0, 100.0, 48.0, 48.0);
        let walls = CollisionLayer::default();
        let mut timers = Timers::new();

        let tick = run(&mut bug, &mut data, Some(player), &walls, &mut timers);
        let contact = tick.contact.unwrap();
        assert_eq!(contact.damage_to_player, 5);
        assert!(!contact.killed);
        assert_eq!(data.player.health, 35);
        assert_eq!(data.monster("bug_forest_0").unwrap().health, 25);

        let tick = run(&mut bug, &mut data, Some(player), &walls, &mut timers);
        assert!(tick.contact.is_none());
        assert_eq!(data.player.health, 35);
    }

    #[test]
    fn test_kill_grants_exp_and_loot() {
        let mut data = GameData::new();
        let mut bug = spawn(&mut data, "bug_forest_0", "bug", (100.0, 100.0), None);
        data.set_field("bug_forest_0", EntityField::Health, PropertyValue::Int(3));
        let player = Rect::from_center(100.0, 100.0, 48.0, 48.0);

        let tick = run(&mut bug, &mut data, Some(player), &CollisionLayer::default(), &mut Timers::new());

        assert!(tick.contact.unwrap().killed);
        assert!(!bug.is_alive(&data));
        assert_eq!(data.player.exp, KILL_EXP_REWARD as i32);
        assert_eq!(data.get_item_count("bug_shell"), 1);
        assert_eq!(data.statistics.enemies_killed, 1);
    }
}
