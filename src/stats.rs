//! Player stat arithmetic
//!
//! This module defines the named stats a player carries, the operations that
//! can be applied to them, and the per-stat clamp rules that keep every
//! write inside its documented range:
//!
//! | stat                                   | range                |
//! |----------------------------------------|----------------------|
//! | `health`                               | `0..=max_health`     |
//! | `max_health`, `strength`, `speed`, `level` | `>= 1`           |
//! | `exp`                                  | `>= 0`               |
//! | `req_exp`                              | `>= 1`               |
//!
//! Level-up itself lives on [`crate::game_data::PlayerRecord`] because it
//! touches several stats at once.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named player stats that can be read or changed by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStat {
    Health,
    MaxHealth,
    Strength,
    Speed,
    Level,
    Exp,
    ReqExp,
}

impl PlayerStat {
    pub fn all() -> [PlayerStat; 7] {
        [
            PlayerStat::Health,
            PlayerStat::MaxHealth,
            PlayerStat::Strength,
            PlayerStat::Speed,
            PlayerStat::Level,
            PlayerStat::Exp,
            PlayerStat::ReqExp,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerStat::Health => "health",
            PlayerStat::MaxHealth => "max_health",
            PlayerStat::Strength => "strength",
            PlayerStat::Speed => "speed",
            PlayerStat::Level => "level",
            PlayerStat::Exp => "exp",
            PlayerStat::ReqExp => "req_exp",
        }
    }

    /// Clamps a freshly computed value into this stat's valid range
    ///
    /// `max_health` is the player's current maximum and only matters for
    /// `health`.
    pub fn clamp(&self, value: f64, max_health: f64) -> f64 {
        match self {
            PlayerStat::Health => value.clamp(0.0, max_health.max(0.0)),
            PlayerStat::MaxHealth
            | PlayerStat::Strength
            | PlayerStat::Speed
            | PlayerStat::Level
            | PlayerStat::ReqExp => value.max(1.0),
            PlayerStat::Exp => value.max(0.0),
        }
    }
}

impl fmt::Display for PlayerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerStat {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerStat::all()
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| StatError::UnknownStat(s.to_string()))
    }
}

/// Arithmetic applied by `change_player_stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOp {
    Set,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl StatOp {
    /// Applies the operation to `current`
    ///
    /// Division by zero is a no-op and yields `current` unchanged.
    pub fn apply(&self, current: f64, value: f64) -> f64 {
        match self {
            StatOp::Set => value,
            StatOp::Add => current + value,
            StatOp::Subtract => current - value,
            StatOp::Multiply => current * value,
            StatOp::Divide => {
                if value == 0.0 {
                    current
                } else {
                    current / value
                }
            }
        }
    }
}

impl FromStr for StatOp {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(StatOp::Set),
            "add" => Ok(StatOp::Add),
            "subtract" => Ok(StatOp::Subtract),
            "multiply" => Ok(StatOp::Multiply),
            "divide" => Ok(StatOp::Divide),
            other => Err(StatError::UnknownOp(other.to_string())),
        }
    }
}

/// Errors from name-based stat access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("unknown player stat '{0}'")]
    UnknownStat(String),

    #[error("unknown stat operation '{0}'")]
    UnknownOp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_names() {
        assert_eq!("health".parse::<PlayerStat>(), Ok(PlayerStat::Health));
        assert_eq!("req_exp".parse::<PlayerStat>(), Ok(PlayerStat::ReqExp));
        assert_eq!(
            "mana".parse::<PlayerStat>(),
            Err(StatError::UnknownStat("mana".to_string()))
        );
    }

    #[test]
    fn test_parse_ops() {
        assert_eq!("divide".parse::<StatOp>(), Ok(StatOp::Divide));
        assert!("power".parse::<StatOp>().is_err());
    }

    #[test]
    fn test_divide_by_zero_is_noop() {
        assert_eq!(StatOp::Divide.apply(40.0, 0.0), 40.0);
        assert_eq!(StatOp::Divide.apply(40.0, 4.0), 10.0);
    }

    #[test]
    fn test_health_clamp() {
        assert_eq!(PlayerStat::Health.clamp(-959.0, 40.0), 0.0);
        assert_eq!(PlayerStat::Health.clamp(55.0, 40.0), 40.0);
        assert_eq!(PlayerStat::Health.clamp(12.0, 40.0), 12.0);
    }

    #[test]
    fn test_floor_of_one() {
        for stat in [
            PlayerStat::MaxHealth,
            PlayerStat::Strength,
            PlayerStat::Speed,
            PlayerStat::Level,
        ] {
            assert_eq!(stat.clamp(-3.0, 40.0), 1.0, "{stat} should floor at 1");
        }
        assert_eq!(PlayerStat::Exp.clamp(-3.0, 40.0), 0.0);
    }
}
