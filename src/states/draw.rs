//! Draw commands handed to the renderer
//!
//! States describe what to show instead of drawing it. World commands use
//! world pixels (bottom-left origin); screen commands use screen pixels with
//! the same orientation.

use crate::collision::Rect;
use crate::entity::DebugShape;

use super::StateId;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Screen-space text
    Text {
        text: String,
        x: f32,
        y: f32,
        size: u16,
        highlighted: bool,
    },
    /// Screen-space filled box, `alpha` 0-255
    Panel { rect: Rect, alpha: u8 },
    /// World-space sprite frame
    Sprite { key: String, x: f32, y: f32, frame: usize },
    /// World-space debug outline
    Shape(DebugShape),
}

/// Everything one state drew this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawLayer {
    pub state: StateId,
    pub commands: Vec<DrawCommand>,
}

impl DrawLayer {
    pub fn new(state: StateId) -> Self {
        DrawLayer {
            state,
            commands: Vec::new(),
        }
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: u16) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            size,
            highlighted: false,
        });
    }

    pub fn highlighted_text(&mut self, text: impl Into<String>, x: f32, y: f32, size: u16) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            size,
            highlighted: true,
        });
    }

    pub fn panel(&mut self, rect: Rect, alpha: u8) {
        self.commands.push(DrawCommand::Panel { rect, alpha });
    }

    pub fn sprite(&mut self, key: impl Into<String>, x: f32, y: f32, frame: usize) {
        self.commands.push(DrawCommand::Sprite {
            key: key.into(),
            x,
            y,
            frame,
        });
    }

    pub fn shape(&mut self, shape: DebugShape) {
        self.commands.push(DrawCommand::Shape(shape));
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// One frame, back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Base state first, then overlays bottom to top
    pub layers: Vec<DrawLayer>,
    /// Notification text with its opacity, drawn above every layer
    pub notifications: Vec<(String, f32)>,
}

impl DrawList {
    /// States in the order they were drawn
    pub fn order(&self) -> Vec<StateId> {
        self.layers.iter().map(|layer| layer.state).collect()
    }
}
