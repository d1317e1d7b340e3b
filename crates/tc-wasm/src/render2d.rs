//! Canvas2D software renderer.
//!
//! Paints a `DisplayList` back-to-front onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Text is measured with the real font.

use tc_core::geometry::{Point, triangle_points};
use tc_core::scene::{FontSpec, Primitive, Shape, ShapeStyle, TextOrigin};
use tc_core::surface::DisplayList;
use tc_render::estimate_width;
use web_sys::CanvasRenderingContext2d;

/// Clear to the background and paint every visible primitive.
pub fn render_display_list(ctx: &CanvasRenderingContext2d, list: &DisplayList) {
    ctx.save();
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(&list.background().to_css());
    ctx.fill_rect(0.0, 0.0, list.width(), list.height());
    ctx.restore();

    for (_, primitive) in list.iter() {
        draw_primitive(ctx, primitive);
    }
}

fn draw_primitive(ctx: &CanvasRenderingContext2d, primitive: &Primitive) {
    let style = &primitive.style;
    if style.opacity <= 0.0 {
        return;
    }

    ctx.save();
    ctx.set_global_alpha(f64::from(style.opacity));
    match &primitive.shape {
        Shape::Circle { center, radius } => {
            ctx.begin_path();
            let _ = ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU);
            fill_and_stroke(ctx, style);
        }
        Shape::Line { from, to } => {
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            apply_stroke(ctx, style);
        }
        Shape::Triangle {
            center,
            size,
            angle,
        } => {
            let [a, b, c] = triangle_points(*center, *size, *angle);
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.line_to(c.x, c.y);
            ctx.close_path();
            fill_and_stroke(ctx, style);
        }
        Shape::Text {
            anchor,
            content,
            font,
            origin,
        } => draw_text(ctx, *anchor, content, font, *origin, style),
    }
    ctx.restore();
}

fn draw_text(
    ctx: &CanvasRenderingContext2d,
    anchor: Point,
    content: &str,
    font: &FontSpec,
    origin: TextOrigin,
    style: &ShapeStyle,
) {
    ctx.set_font(&format!("{} {}px {}", font.weight, font.size, font.family));
    let width = ctx
        .measure_text(content)
        .map(|m| m.width())
        .unwrap_or_else(|_| estimate_width(content, font));
    let height = f64::from(font.size);
    let (x, y) = match origin {
        TextOrigin::TopLeft => (anchor.x, anchor.y),
        TextOrigin::Center => (anchor.x - width / 2.0, anchor.y - height / 2.0),
    };

    if let Some(bg) = style.background {
        let pad = style.padding;
        ctx.set_fill_style_str(&bg.to_css());
        ctx.fill_rect(x - pad, y - pad, width + pad * 2.0, height + pad * 2.0);
    }
    if let Some(fill) = style.fill {
        ctx.set_fill_style_str(&fill.to_css());
        ctx.set_text_baseline("top");
        let _ = ctx.fill_text(content, x, y);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn fill_and_stroke(ctx: &CanvasRenderingContext2d, style: &ShapeStyle) {
    if let Some(fill) = style.fill {
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
    }
    apply_stroke(ctx, style);
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, style: &ShapeStyle) {
    if let Some(stroke) = style.stroke {
        ctx.set_stroke_style_str(&stroke.to_css());
        ctx.set_line_width(style.stroke_width);
        ctx.stroke();
    }
}
