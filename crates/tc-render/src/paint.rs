//! Display list → Vello drawing commands.
//!
//! Walks the primitives back-to-front and emits Vello paint operations:
//! fills, strokes, and label backgrounds.

use crate::text::text_box;
use kurbo::{Affine, BezPath, Circle, Line, Rect, Stroke as KurboStroke};
use peniko::{Color as PenikoColor, Fill};
use tc_core::geometry::triangle_points;
use tc_core::model::Color;
use tc_core::scene::{Primitive, Shape, ShapeStyle};
use tc_core::surface::DisplayList;
use vello::Scene;

/// Paint the whole display list, background first.
///
/// Call once per frame with a freshly-reset `Scene`.
pub fn paint_display_list(scene: &mut Scene, list: &DisplayList) {
    let background = Rect::new(0.0, 0.0, list.width(), list.height());
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        to_peniko(list.background(), 1.0),
        None,
        &background,
    );
    for (_, primitive) in list.iter() {
        paint_primitive(scene, primitive);
    }
}

pub fn paint_primitive(scene: &mut Scene, primitive: &Primitive) {
    let style = &primitive.style;
    if style.opacity <= 0.0 {
        return;
    }

    match &primitive.shape {
        Shape::Circle { center, radius } => {
            let shape = Circle::new((center.x, center.y), *radius);
            fill_shape(scene, &shape, style);
            stroke_shape(scene, &shape, style);
        }

        Shape::Line { from, to } => {
            let shape = Line::new((from.x, from.y), (to.x, to.y));
            stroke_shape(scene, &shape, style);
        }

        Shape::Triangle {
            center,
            size,
            angle,
        } => {
            let [a, b, c] = triangle_points(*center, *size, *angle);
            let mut path = BezPath::new();
            path.move_to((a.x, a.y));
            path.line_to((b.x, b.y));
            path.line_to((c.x, c.y));
            path.close_path();
            fill_shape(scene, &path, style);
            stroke_shape(scene, &path, style);
        }

        Shape::Text {
            anchor,
            content,
            font,
            origin,
        } => {
            if let Some(bg) = style.background {
                let rect = text_box(*anchor, content, font, *origin, style.padding);
                scene.fill(
                    Fill::NonZero,
                    Affine::IDENTITY,
                    to_peniko(bg, style.opacity),
                    None,
                    &rect,
                );
            }
            log::trace!("TEXT {:?} at ({}, {})", content, anchor.x, anchor.y);
            // Glyph runs need a font context; only the label box is painted.
        }
    }
}

// ─── Fill and stroke ─────────────────────────────────────────────────────

fn fill_shape<S: kurbo::Shape>(scene: &mut Scene, shape: &S, style: &ShapeStyle) {
    if let Some(fill) = style.fill {
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            to_peniko(fill, style.opacity),
            None,
            shape,
        );
    }
}

fn stroke_shape<S: kurbo::Shape>(scene: &mut Scene, shape: &S, style: &ShapeStyle) {
    if let Some(stroke) = style.stroke {
        let vello_stroke = KurboStroke::new(style.stroke_width);
        scene.stroke(
            &vello_stroke,
            Affine::IDENTITY,
            to_peniko(stroke, style.opacity),
            None,
            shape,
        );
    }
}

fn to_peniko(color: Color, opacity: f32) -> PenikoColor {
    let [r, g, b, a] = color.faded(opacity).to_rgba8();
    PenikoColor::from_rgba8(r, g, b, a)
}
