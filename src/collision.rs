/// Collision detection for the tile world
///
/// This module provides axis-aligned rectangle collision. It supports both
/// dynamic bodies (the player, creatures) and the static wall geometry that
/// comes from a map's `collisions` tile layer.
///
/// # Architecture
///
/// - `Rect`: world-space rectangle, bottom-left origin, y grows upwards
/// - `Collidable` trait: implemented by anything with a bounding box
/// - `CollisionLayer`: the static walls of the currently loaded map
/// - AABB functions: pure functions for rectangle intersection detection
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world pixels
///
/// `x`/`y` is the bottom-left corner. Width and height are expected to be
/// non-negative; use [`Rect::normalized`] for rectangles coming from map data
/// where a sign flip may have happened.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// Builds a rectangle of the given size centred on a point
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Rect {
            x: center_x - width / 2.0,
            y: center_y - height / 2.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns an equivalent rectangle with non-negative width and height
    ///
    /// Map editors store rectangles with a top-left origin. After flipping
    /// into y-up world space the height can end up negative; normalising
    /// keeps the covered area and the centre point unchanged.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect { x, y, width, height }
    }

    /// Inclusive point containment on the normalised rectangle
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        let r = self.normalized();
        r.x <= px && px <= r.right() && r.y <= py && py <= r.top()
    }
}

/// Trait for bodies that participate in collision detection
pub trait Collidable {
    /// Returns the axis-aligned bounding box for this body in world pixels
    fn bounds(&self) -> Rect;
}

/// Checks if two axis-aligned bounding boxes intersect.
///
/// Two rectangles intersect if they overlap on both the X and Y axes.
/// Touching edges do not count as an overlap.
///
/// # Example
///
/// ```rust
/// use tile_rpg::collision::{aabb_intersect, Rect};
///
/// let player = Rect::new(10.0, 10.0, 32.0, 32.0);
/// let chest = Rect::new(20.0, 20.0, 32.0, 32.0);
/// assert!(aabb_intersect(&player, &chest));
/// ```
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.right() && a.right() > b.x;
    let y_overlap = a.y < b.top() && a.top() > b.y;

    x_overlap && y_overlap
}

/// Euclidean distance between two points
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Static wall geometry of the loaded map
///
/// Built once per map load from the `collisions` tile layer. Swapping maps
/// swaps the whole layer, so nothing holds on to stale walls.
#[derive(Debug, Clone, Default)]
pub struct CollisionLayer {
    map_name: String,
    walls: Vec<Rect>,
}

impl CollisionLayer {
    pub fn new(map_name: impl Into<String>, walls: Vec<Rect>) -> Self {
        CollisionLayer {
            map_name: map_name.into(),
            walls,
        }
    }

    /// Name of the map this geometry belongs to
    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Returns true if the rectangle overlaps any wall
    pub fn collides(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|wall| aabb_intersect(rect, wall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersect_overlapping() {
        let rect_a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(16.0, 16.0, 32.0, 32.0);

        assert!(aabb_intersect(&rect_a, &rect_b));
        assert!(aabb_intersect(&rect_b, &rect_a)); // Symmetric
    }

    #[test]
    fn test_aabb_intersect_touching_edges() {
        let rect_a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(32.0, 0.0, 32.0, 32.0);

        assert!(!aabb_intersect(&rect_a, &rect_b));
    }

    #[test]
    fn test_aabb_intersect_contained() {
        let large = Rect::new(0.0, 0.0, 100.0, 100.0);
        let small = Rect::new(25.0, 25.0, 50.0, 50.0);

        assert!(aabb_intersect(&large, &small));
        assert!(aabb_intersect(&small, &large));
    }

    #[test]
    fn test_normalized_keeps_center() {
        let flipped = Rect::new(100.0, 300.0, -40.0, -80.0);
        let normal = flipped.normalized();

        assert_eq!(normal, Rect::new(60.0, 220.0, 40.0, 80.0));
        assert_eq!(flipped.center(), normal.center());
    }

    #[test]
    fn test_contains_point_with_negative_height() {
        // Zone stored as top edge + negative height
        let zone = Rect::new(0.0, 200.0, 100.0, -100.0);

        assert!(zone.contains_point(50.0, 150.0));
        assert!(zone.contains_point(0.0, 100.0)); // Inclusive edges
        assert!(!zone.contains_point(50.0, 250.0));
    }

    #[test]
    fn test_collision_layer() {
        let layer = CollisionLayer::new("test", vec![Rect::new(64.0, 0.0, 64.0, 64.0)]);

        assert!(layer.collides(&Rect::new(100.0, 10.0, 10.0, 10.0)));
        assert!(!layer.collides(&Rect::new(0.0, 0.0, 64.0, 64.0)));
        assert_eq!(layer.map_name(), "test");
    }
}
