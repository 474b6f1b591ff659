use serde::{Deserialize, Serialize};

use crate::collision::{distance, Rect};
use super::properties::Properties;

/// Rectangular home region for creatures
///
/// The rectangle is stored as authored after the y-flip into world space.
/// For zones read from a map this is the top-left corner with a negative
/// height. All queries go through the normalised rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub rect: Rect,
    pub map_name: String,
    pub properties: Properties,
}

impl Zone {
    pub fn new(id: impl Into<String>, rect: Rect, map_name: impl Into<String>) -> Self {
        Zone {
            id: id.into(),
            rect,
            map_name: map_name.into(),
            properties: Properties::new(),
        }
    }

    /// Inclusive containment, independent of the rectangle's sign
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains_point(x, y)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect.normalized().center()
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        distance(self.center(), (x, y))
    }
}
