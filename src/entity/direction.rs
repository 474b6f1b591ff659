use serde::{Deserialize, Serialize};

/// Cardinal facing; creatures never move diagonally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Picks the axis with the larger magnitude; ties go vertical
    ///
    /// ```rust
    /// use tile_rpg::entity::Direction;
    ///
    /// assert_eq!(Direction::cardinal_toward(10.0, -3.0), Direction::Right);
    /// assert_eq!(Direction::cardinal_toward(5.0, 5.0), Direction::Up);
    /// assert_eq!(Direction::cardinal_toward(0.0, 0.0), Direction::Down);
    /// ```
    pub fn cardinal_toward(dx: f32, dy: f32) -> Direction {
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Movement vector for one step (y grows upwards)
    pub fn delta(&self, step: f32) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, step),
            Direction::Down => (0.0, -step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        }
    }

    /// First of the two walk frames for this facing
    pub fn base_frame(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Lock-picking symbol for horizontal directions
    pub fn lock_symbol(&self) -> Option<char> {
        match self {
            Direction::Left => Some('<'),
            Direction::Right => Some('>'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_never_diagonal() {
        assert_eq!(Direction::cardinal_toward(-3.0, 2.9), Direction::Left);
        assert_eq!(Direction::cardinal_toward(-3.0, -3.1), Direction::Down);
        assert_eq!(Direction::cardinal_toward(0.1, 40.0), Direction::Up);
    }

    #[test]
    fn test_delta_uses_y_up() {
        assert_eq!(Direction::Up.delta(2.0), (0.0, 2.0));
        assert_eq!(Direction::Left.delta(2.0), (-2.0, 0.0));
    }
}
