//! Approximate text metrics for backends without a font context.
//!
//! Canvas2D measures real glyphs; the Vello painter and the SVG exporter
//! only need a box to paint label backgrounds behind.

use kurbo::Rect;
use tc_core::geometry::Point;
use tc_core::scene::{FontSpec, TextOrigin};

/// Mean glyph advance relative to the font size.
const AVERAGE_ADVANCE: f64 = 0.6;

pub fn estimate_width(content: &str, font: &FontSpec) -> f64 {
    content.chars().count() as f64 * f64::from(font.size) * AVERAGE_ADVANCE
}

/// Box of a text primitive, grown by `padding` on every side.
pub fn text_box(anchor: Point, content: &str, font: &FontSpec, origin: TextOrigin, padding: f64) -> Rect {
    let width = estimate_width(content, font);
    let height = f64::from(font.size);
    let (x, y) = match origin {
        TextOrigin::TopLeft => (anchor.x, anchor.y),
        TextOrigin::Center => (anchor.x - width / 2.0, anchor.y - height / 2.0),
    };
    Rect::new(x - padding, y - padding, x + width + padding, y + height + padding)
}
