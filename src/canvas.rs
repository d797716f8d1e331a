// Committed drawing state: the shapes the user has rubber-banded onto the
// video. Persists across ticks; the live frame is composited under it.

use crate::frame::Point;

/// Which shape the next drag gesture produces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tool {
    Line,
    Rect,
    Circle,
}

impl Tool {
    /// Short HUD label.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Line => "LINE",
            Tool::Rect => "RECT",
            Tool::Circle => "CIRCLE",
        }
    }
}

/// One committed (or previewed) shape: anchor is where the press happened,
/// end is where the pointer is now / was released.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Shape {
    pub tool: Tool,
    pub anchor: Point,
    pub end: Point,
    pub color: u32,
}

/// Accumulates committed shapes across ticks. Cleared only by an explicit
/// clear command; never touched by the interaction state machine directly.
#[derive(Default)]
pub struct Canvas {
    shapes: Vec<Shape>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
