//! Countdown timer service
//!
//! Every "wait" in the simulation (event cooldowns, the lock-picking close
//! delay, creature contact cooldowns) is a countdown registered here and
//! advanced once per frame by the world tick. Components never decrement
//! their own counters.
//! Creature wander direction changes are scheduled the same way.
//!
//! # Architecture
//!
//! - `Countdown`: remaining amount plus the unit it counts in
//! - `TimerKey`: owner id + purpose, so one owner can hold several timers
//! - `Timers`: the registry; `tick(dt)` advances everything at once
//!
//! Tick-based countdowns lose one unit per `tick` call regardless of `dt`.
//! Second-based countdowns lose `dt`. Both clamp at zero and are dropped
//! once they expire.
//!
//! # Example
//!
//! ```rust
//! use tile_rpg::timer::{Countdown, TimerKey, TimerKind, Timers};
//!
//! let mut timers = Timers::new();
//! let key = TimerKey::new("chest_1", TimerKind::EventCooldown);
//! timers.register(key.clone(), Countdown::ticks(2));
//!
//! timers.tick(0.016);
//! assert!(timers.is_running(&key));
//! timers.tick(0.016);
//! assert!(!timers.is_running(&key));
//! ```

use std::collections::HashMap;

/// The unit a countdown is measured in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownUnit {
    /// Frame count, decremented by one per tick
    Ticks,
    /// Wall-clock seconds, decremented by `dt` per tick
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
    unit: CountdownUnit,
}

impl Countdown {
    pub fn ticks(count: u32) -> Self {
        Countdown {
            remaining: count as f32,
            unit: CountdownUnit::Ticks,
        }
    }

    pub fn seconds(secs: f32) -> Self {
        Countdown {
            remaining: secs.max(0.0),
            unit: CountdownUnit::Seconds,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn unit(&self) -> CountdownUnit {
        self.unit
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    fn advance(&mut self, dt: f32) {
        let step = match self.unit {
            CountdownUnit::Ticks => 1.0,
            CountdownUnit::Seconds => dt,
        };
        self.remaining = (self.remaining - step).max(0.0);
    }
}

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    EventCooldown,
    ContactCooldown,
    Wander,
    OverlayClose,
}

/// Identifies one timer: who owns it and what it guards
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub owner: String,
    pub kind: TimerKind,
}

impl TimerKey {
    pub fn new(owner: impl Into<String>, kind: TimerKind) -> Self {
        TimerKey {
            owner: owner.into(),
            kind,
        }
    }
}

/// Registry of running countdowns
#[derive(Debug, Clone, Default)]
pub struct Timers {
    running: HashMap<TimerKey, Countdown>,
}

impl Timers {
    pub fn new() -> Self {
        Timers {
            running: HashMap::new(),
        }
    }

    /// Starts (or restarts) a countdown under `key`
    pub fn register(&mut self, key: TimerKey, countdown: Countdown) {
        if countdown.is_expired() {
            self.running.remove(&key);
        } else {
            self.running.insert(key, countdown);
        }
    }

    /// Advances every countdown and drops the ones that reached zero
    ///
    /// Returns the keys that expired during this tick.
    pub fn tick(&mut self, dt: f32) -> Vec<TimerKey> {
        let mut expired = Vec::new();
        for (key, countdown) in self.running.iter_mut() {
            countdown.advance(dt);
            if countdown.is_expired() {
                expired.push(key.clone());
            }
        }
        for key in &expired {
            self.running.remove(key);
        }
        expired
    }

    pub fn is_running(&self, key: &TimerKey) -> bool {
        self.running.contains_key(key)
    }

    pub fn remaining(&self, key: &TimerKey) -> Option<f32> {
        self.running.get(key).map(Countdown::remaining)
    }

    pub fn cancel(&mut self, key: &TimerKey) -> bool {
        self.running.remove(key).is_some()
    }

    /// Cancels every timer of the given kind
    pub fn cancel_kind(&mut self, kind: TimerKind) {
        self.running.retain(|key, _| key.kind != kind);
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_countdown_ignores_dt() {
        let mut timers = Timers::new();
        let key = TimerKey::new("tp", TimerKind::EventCooldown);
        timers.register(key.clone(), Countdown::ticks(30));

        for _ in 0..29 {
            timers.tick(10.0);
        }
        assert_eq!(timers.remaining(&key), Some(1.0));

        let expired = timers.tick(10.0);
        assert_eq!(expired, vec![key.clone()]);
        assert!(!timers.is_running(&key));
    }

    #[test]
    fn test_seconds_countdown_clamps_at_zero() {
        let mut timers = Timers::new();
        let key = TimerKey::new("lock", TimerKind::OverlayClose);
        timers.register(key.clone(), Countdown::seconds(1.0));

        timers.tick(0.4);
        assert!((timers.remaining(&key).unwrap() - 0.6).abs() < 1e-5);

        let expired = timers.tick(5.0);
        assert_eq!(expired.len(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_register_restarts() {
        let mut timers = Timers::new();
        let key = TimerKey::new("bug_1", TimerKind::ContactCooldown);
        timers.register(key.clone(), Countdown::seconds(1.0));
        timers.tick(0.9);
        timers.register(key.clone(), Countdown::seconds(1.0));

        assert_eq!(timers.remaining(&key), Some(1.0));
    }

    #[test]
    fn test_cancel_kind() {
        let mut timers = Timers::new();
        timers.register(TimerKey::new("a", TimerKind::ContactCooldown), Countdown::ticks(5));
        timers.register(TimerKey::new("b", TimerKind::ContactCooldown), Countdown::ticks(5));
        timers.register(TimerKey::new("c", TimerKind::EventCooldown), Countdown::ticks(5));

        timers.cancel_kind(TimerKind::ContactCooldown);

        assert_eq!(timers.len(), 1);
        assert!(timers.is_running(&TimerKey::new("c", TimerKind::EventCooldown)));
    }
}
