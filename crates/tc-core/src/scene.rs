//! Drawable primitives placed on a drawing surface.
//!
//! A primitive is a shape plus its paint. The engine never paints directly;
//! it adds, restyles and removes primitives, and a backend paints whatever
//! the surface holds at render time.

use crate::geometry::Point;
use crate::model::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a primitive on a surface. Never reused within one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape_{}", self.0)
    }
}

/// Font used by text primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16, // 100..900
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".into(),
            weight: 400,
            size: 14.0,
        }
    }
}

/// Where a text primitive sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextOrigin {
    /// Anchor is the top-left corner of the text box.
    #[default]
    TopLeft,
    /// Anchor is the center of the text box.
    Center,
}

/// Geometry of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle {
        center: Point,
        radius: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    /// Isosceles triangle pointing "up" before rotation (arrowheads).
    Triangle {
        center: Point,
        size: f64,
        /// Rotation in degrees, clockwise.
        angle: f64,
    },
    Text {
        anchor: Point,
        content: String,
        font: FontSpec,
        origin: TextOrigin,
    },
}

/// Paint applied to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f32,
    /// Box painted behind text primitives.
    pub background: Option<Color>,
    pub padding: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            background: None,
            padding: 0.0,
        }
    }
}

/// A shape with its paint: one entry on a drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub style: ShapeStyle,
}

impl Primitive {
    pub fn new(shape: Shape, style: ShapeStyle) -> Self {
        Self { shape, style }
    }

    /// Builder: start fully transparent (for fade-ins).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.style.opacity = 0.0;
        self
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────

/// Colors and sizes of the teaching canvas look.
pub mod palette {
    use crate::model::Color;

    pub const BACKGROUND: Color = Color::rgb8(0x1a, 0x1a, 0x1a);
    pub const ACCENT: Color = Color::rgb8(0x4a, 0x9e, 0xff);
    pub const VERTEX_FILL: Color = Color::rgb8(0x1a, 0x3a, 0x5a);
    pub const NOTE: Color = Color::rgb8(0xff, 0xeb, 0x3b);
    pub const FORMULA: Color = Color::rgb8(0x4c, 0xaf, 0x50);
    pub const LABEL_BG: Color = Color::rgba(0.0, 0.0, 0.0, 0.7);
    pub const FORMULA_BG: Color = Color::rgba(0.0, 0.0, 0.0, 0.8);

    pub const VERTEX_RADIUS: f64 = 25.0;
    pub const VERTEX_STROKE_WIDTH: f64 = 3.0;
    pub const HIGHLIGHT_STROKE_WIDTH: f64 = 5.0;
    pub const EDGE_STROKE_WIDTH: f64 = 2.0;
    pub const ARROW_SIZE: f64 = 12.0;
    pub const CURSOR_RADIUS: f64 = 4.0;
}
