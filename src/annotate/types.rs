// Drawable primitives in canvas space

use serde::{Deserialize, Serialize};

use crate::coords::Point;

/// RGB color
pub type Rgb = [u8; 3];

/// A shape to draw on the canvas. Coordinates are canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Straight stroke
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: f64,
    },

    /// Circle, outlined or filled
    Circle {
        center: Point,
        radius: f64,
        color: Rgb,
        filled: bool,
    },

    /// Axis-aligned rectangle outline
    Rect {
        min: Point,
        max: Point,
        color: Rgb,
        dashed: bool,
    },

    /// Text anchored at its top-left corner
    Label { at: Point, text: String, color: Rgb },
}

impl Primitive {
    pub fn color(&self) -> Rgb {
        match self {
            Primitive::Line { color, .. }
            | Primitive::Circle { color, .. }
            | Primitive::Rect { color, .. }
            | Primitive::Label { color, .. } => *color,
        }
    }
}
