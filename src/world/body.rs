// Player collision body
//
// The player's position lives in GameData in tile units. The body converts
// it to a world-pixel box and performs wall-checked movement.

use crate::collision::{aabb_intersect, Collidable, CollisionLayer, Rect};
use crate::constants::{PLAYER_SIZE, REFERENCE_FPS, TILE_SIZE};
use crate::entity::Direction;
use crate::game_data::GameData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    /// Centre in world pixels
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl PlayerBody {
    pub fn from_data(data: &GameData) -> Self {
        let (x, y) = data.get_player_pixel_position();
        PlayerBody {
            x,
            y,
            size: PLAYER_SIZE,
        }
    }

    /// Writes the body position back to the store in tile units
    pub fn store(&self, data: &mut GameData) {
        data.set_player_position(self.x / TILE_SIZE, self.y / TILE_SIZE, None);
    }

    fn blocked(&self, walls: &CollisionLayer) -> bool {
        walls.collides(&self.bounds())
    }

    /// Moves by `(dx, dy)` one axis at a time
    ///
    /// Each axis is rolled back on its own if it would end inside a wall,
    /// so the player slides along walls. With `ghost` set walls are ignored.
    /// Returns true if the body moved at all.
    pub fn translate(&mut self, dx: f32, dy: f32, walls: &CollisionLayer, ghost: bool) -> bool {
        let start = (self.x, self.y);

        self.x += dx;
        if !ghost && self.blocked(walls) {
            self.x = start.0;
        }

        self.y += dy;
        if !ghost && self.blocked(walls) {
            self.y = start.1;
        }

        (self.x, self.y) != start
    }

    /// One frame of movement in `direction` at the player's speed
    pub fn step(&mut self, direction: Direction, speed: f32, dt: f32, walls: &CollisionLayer, ghost: bool) -> bool {
        let (dx, dy) = direction.delta(speed * dt * REFERENCE_FPS);
        self.translate(dx, dy, walls, ghost)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_intersect(&self.bounds(), other)
    }
}

impl Collidable for PlayerBody {
    fn bounds(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_blocked_by_wall() {
        let walls = CollisionLayer::new("m", vec![Rect::new(130.0, 0.0, 64.0, 640.0)]);
        let mut body = PlayerBody { x: 100.0, y: 100.0, size: 48.0 };

        // Right edge at 124 + 10 = 134 would overlap the wall at 130
        assert!(!body.step(Direction::Right, 10.0, 1.0 / 60.0, &walls, false));
        assert_eq!((body.x, body.y), (100.0, 100.0));

        assert!(body.step(Direction::Right, 10.0, 1.0 / 60.0, &walls, true));
        assert!((body.x - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_axis_separated_slide() {
        let walls = CollisionLayer::new("m", vec![Rect::new(130.0, 0.0, 64.0, 640.0)]);
        let mut body = PlayerBody { x: 100.0, y: 100.0, size: 48.0 };

        assert!(body.translate(10.0, 10.0, &walls, false));
        assert_eq!((body.x, body.y), (100.0, 110.0));
    }

    #[test]
    fn test_store_round_trip() {
        let mut data = GameData::new();
        data.set_player_position(2.0, 3.0, None);

        let mut body = PlayerBody::from_data(&data);
        assert_eq!((body.x, body.y), (128.0, 192.0));

        body.x += 32.0;
        body.store(&mut data);
        assert_eq!(data.get_player_position(), (2.5, 3.0));
    }
}
