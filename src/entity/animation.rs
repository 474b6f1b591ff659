//! Direction-driven walk animation
//!
//! Every creature sprite sheet has eight frames: two per facing
//! (`up` 0/1, `down` 2/3, `left` 4/5, `right` 6/7). While moving, the
//! animator toggles between the two frames of the current facing every
//! `animation_speed` seconds. When the creature stops it shows the first
//! frame of the last facing.

use serde::{Deserialize, Serialize};

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
}

#[derive(Debug, Clone)]
pub struct DirectionalAnimator {
    state: AnimationState,
    facing: Direction,
    frame: usize,
    elapsed: f32,
    animation_speed: f32,
}

impl DirectionalAnimator {
    pub fn new(animation_speed: f32) -> Self {
        DirectionalAnimator {
            state: AnimationState::Idle,
            facing: Direction::Down,
            frame: Direction::Down.base_frame(),
            elapsed: 0.0,
            animation_speed,
        }
    }

    /// Advances the animation given this tick's movement direction
    pub fn update(&mut self, dt: f32, moving: Option<Direction>) {
        self.elapsed += dt;

        match moving {
            Some(direction) if direction != self.facing => {
                // Turning: snap to the first frame of the new facing
                self.facing = direction;
                self.frame = direction.base_frame();
                self.elapsed = 0.0;
                self.state = AnimationState::Walking;
            }
            Some(direction) => {
                if self.state != AnimationState::Walking {
                    self.state = AnimationState::Walking;
                    self.elapsed = 0.0;
                } else if self.elapsed > self.animation_speed {
                    let base = direction.base_frame();
                    self.frame = if self.frame == base { base + 1 } else { base };
                    self.elapsed = 0.0;
                }
            }
            None => {
                self.state = AnimationState::Idle;
                self.frame = self.facing.base_frame();
            }
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }
}

pub fn determine_animation_state(dx: f32, dy: f32) -> AnimationState {
    if dx == 0.0 && dy == 0.0 {
        AnimationState::Idle
    } else {
        AnimationState::Walking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_toggle_while_walking() {
        let mut anim = DirectionalAnimator::new(0.5);
        anim.update(0.1, Some(Direction::Left));
        assert_eq!(anim.frame(), 4);

        anim.update(0.3, Some(Direction::Left));
        assert_eq!(anim.frame(), 4);
        anim.update(0.3, Some(Direction::Left));
        assert_eq!(anim.frame(), 5);
        anim.update(0.6, Some(Direction::Left));
        assert_eq!(anim.frame(), 4);
    }

    #[test]
    fn test_idle_keeps_last_facing() {
        let mut anim = DirectionalAnimator::new(0.5);
        anim.update(0.1, Some(Direction::Right));
        anim.update(0.6, Some(Direction::Right));
        anim.update(0.6, Some(Direction::Right));
        anim.update(0.1, None);

        assert_eq!(anim.state(), AnimationState::Idle);
        assert_eq!(anim.facing(), Direction::Right);
        assert_eq!(anim.frame(), 6);
    }

    #[test]
    fn test_determine_animation_state() {
        assert_eq!(determine_animation_state(0.0, 0.0), AnimationState::Idle);
        assert_eq!(determine_animation_state(0.0, -1.0), AnimationState::Walking);
    }
}
