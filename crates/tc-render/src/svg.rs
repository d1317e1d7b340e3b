//! Display list → standalone SVG document.
//!
//! Used for snapshots of the current frame (the server's `render` method,
//! the browser "export" button). Hidden primitives are left out.

use crate::text::text_box;
use std::fmt::Write;
use tc_core::geometry::triangle_points;
use tc_core::model::{Color, format_number};
use tc_core::scene::{Primitive, Shape, ShapeStyle, TextOrigin};
use tc_core::surface::DisplayList;

pub fn render_svg(list: &DisplayList) -> String {
    let width = format_number(list.width());
    let height = format_number(list.height());

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>\n",
        list.background().to_css()
    ));
    for (_, primitive) in list.iter() {
        push_primitive(&mut svg, primitive);
    }
    svg.push_str("</svg>\n");
    svg
}

fn push_primitive(svg: &mut String, primitive: &Primitive) {
    let style = &primitive.style;
    if style.opacity <= 0.0 {
        return;
    }
    let paint = paint_attrs(style);

    // Writing into a String cannot fail.
    let _ = match &primitive.shape {
        Shape::Circle { center, radius } => writeln!(
            svg,
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\"{paint}/>",
            num(center.x),
            num(center.y),
            num(*radius)
        ),
        Shape::Line { from, to } => writeln!(
            svg,
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{paint}/>",
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y)
        ),
        Shape::Triangle {
            center,
            size,
            angle,
        } => {
            let points: Vec<String> = triangle_points(*center, *size, *angle)
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect();
            writeln!(svg, "  <polygon points=\"{}\"{paint}/>", points.join(" "))
        }
        Shape::Text {
            anchor,
            content,
            font,
            origin,
        } => {
            if let Some(bg) = style.background {
                let rect = text_box(*anchor, content, font, *origin, style.padding);
                let _ = writeln!(
                    svg,
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{}/>",
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                    bg.to_css(),
                    opacity_attr(style.opacity)
                );
            }
            let placement = match origin {
                TextOrigin::TopLeft => " dominant-baseline=\"hanging\"",
                TextOrigin::Center => " text-anchor=\"middle\" dominant-baseline=\"central\"",
            };
            let fill = style.fill.unwrap_or(Color::BLACK).to_css();
            writeln!(
                svg,
                "  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{fill}\"{placement}{}>{}</text>",
                num(anchor.x),
                num(anchor.y),
                xml_escape(&font.family),
                font.size,
                font.weight,
                opacity_attr(style.opacity),
                xml_escape(content)
            )
        }
    };
}

fn paint_attrs(style: &ShapeStyle) -> String {
    let mut attrs = String::new();
    match style.fill {
        Some(fill) => attrs.push_str(&format!(" fill=\"{}\"", fill.to_css())),
        None => attrs.push_str(" fill=\"none\""),
    }
    if let Some(stroke) = style.stroke {
        attrs.push_str(&format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            stroke.to_css(),
            num(style.stroke_width)
        ));
    }
    attrs.push_str(&opacity_attr(style.opacity));
    attrs
}

fn opacity_attr(opacity: f32) -> String {
    if opacity < 1.0 {
        format!(" opacity=\"{opacity}\"")
    } else {
        String::new()
    }
}

/// Rounded to hundredths to keep documents stable across float noise.
fn num(v: f64) -> String {
    format_number((v * 100.0).round() / 100.0)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
