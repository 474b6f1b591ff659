use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    LEVEL_UP_HEALTH_BONUS, LEVEL_UP_STRENGTH_BONUS, REQ_EXP_GROWTH, STARTING_REQ_EXP,
};
use crate::inventory::{Equipment, Inventory};
use crate::stats::{PlayerStat, StatOp};

/// Id under which the player is addressed through the data store
pub const PLAYER_ID: &str = "player";

/// The player's persistent record
///
/// Position is stored in tile units. The world converts to pixels when it
/// places the player's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub map_name: Option<String>,
    pub level: i32,
    pub exp: i32,
    /// Exp needed for the next level
    pub req_exp: i32,
    pub health: i32,
    pub max_health: i32,
    pub strength: i32,
    pub speed: i32,
    pub inventory: Inventory,
    pub equipment: Equipment,
}

/// What a single level-up changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: i32,
    pub new_req_exp: i32,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerRecord {
            id: PLAYER_ID.to_string(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            map_name: None,
            level: 1,
            exp: 0,
            req_exp: STARTING_REQ_EXP as i32,
            health: 40,
            max_health: 40,
            strength: 5,
            speed: 10,
            inventory: Inventory::new(),
            equipment: Equipment::new(),
        }
    }

    pub fn stat(&self, stat: PlayerStat) -> i32 {
        match stat {
            PlayerStat::Health => self.health,
            PlayerStat::MaxHealth => self.max_health,
            PlayerStat::Strength => self.strength,
            PlayerStat::Speed => self.speed,
            PlayerStat::Level => self.level,
            PlayerStat::Exp => self.exp,
            PlayerStat::ReqExp => self.req_exp,
        }
    }

    fn stat_mut(&mut self, stat: PlayerStat) -> &mut i32 {
        match stat {
            PlayerStat::Health => &mut self.health,
            PlayerStat::MaxHealth => &mut self.max_health,
            PlayerStat::Strength => &mut self.strength,
            PlayerStat::Speed => &mut self.speed,
            PlayerStat::Level => &mut self.level,
            PlayerStat::Exp => &mut self.exp,
            PlayerStat::ReqExp => &mut self.req_exp,
        }
    }

    /// Applies `op` to a stat, clamps it and stores the result
    ///
    /// Fractional results are truncated after clamping. Lowering
    /// `max_health` below the current health pulls health down with it.
    /// Crossing `req_exp` triggers at most one level-up per call.
    pub fn apply_stat_change(
        &mut self,
        stat: PlayerStat,
        op: StatOp,
        value: f64,
    ) -> (i32, Option<LevelUp>) {
        let current = self.stat(stat) as f64;
        let computed = op.apply(current, value);
        let clamped = stat.clamp(computed, self.max_health as f64);
        let new_value = clamped.clamp(i32::MIN as f64, i32::MAX as f64) as i32;

        *self.stat_mut(stat) = new_value;
        debug!(%stat, old = current, new = new_value, "Player stat changed");

        if stat == PlayerStat::MaxHealth && self.health > self.max_health {
            self.health = self.max_health;
        }

        let level_up = if stat == PlayerStat::Exp && self.exp >= self.req_exp {
            Some(self.level_up())
        } else {
            None
        };

        (self.stat(stat), level_up)
    }

    /// Raises the level by one, carrying surplus exp forward
    pub fn level_up(&mut self) -> LevelUp {
        self.level = self.level.saturating_add(1);
        self.exp = self.exp.saturating_sub(self.req_exp).max(0);
        self.req_exp = ((self.req_exp as f64) * REQ_EXP_GROWTH).floor() as i32;
        self.max_health = self.max_health.saturating_add(LEVEL_UP_HEALTH_BONUS);
        self.health = self
            .health
            .saturating_add(LEVEL_UP_HEALTH_BONUS)
            .min(self.max_health);
        self.strength = self.strength.saturating_add(LEVEL_UP_STRENGTH_BONUS);

        LevelUp {
            new_level: self.level,
            new_req_exp: self.req_exp,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new("Hero")
    }
}
