//! Graph model: the authoritative, driver-visible record of the drawing.
//!
//! Vertices and edges keep insertion order. Both are immutable once
//! created and only disappear through a full clear, so the model is a pair
//! of append-only vectors rather than an indexed graph structure.

use crate::id::{EdgeKey, VertexId};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb8(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = if bytes.len() == 8 {
                    hex_val(bytes[6])? << 4 | hex_val(bytes[7])?
                } else {
                    255
                };
                Some(Self::rgba(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ))
            }
            _ => None,
        }
    }

    /// Parse a CSS-ish color as drivers send it: hex, `rgba(...)`/`rgb(...)`,
    /// or one of the common named colors.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::from_rgb_function(body);
        }
        Self::named(s)
    }

    fn from_rgb_function(body: &str) -> Option<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r: u8 = parts[0].parse().ok()?;
        let g: u8 = parts[1].parse().ok()?;
        let b: u8 = parts[2].parse().ok()?;
        let a: f32 = match parts.get(3) {
            Some(a) => a.parse().ok()?,
            None => 1.0,
        };
        let mut color = Self::rgb8(r, g, b);
        color.a = a.clamp(0.0, 1.0);
        Some(color)
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "yellow" => Self::rgb8(255, 255, 0),
            "red" => Self::rgb8(255, 0, 0),
            "green" => Self::rgb8(0, 128, 0),
            "lime" => Self::rgb8(0, 255, 0),
            "blue" => Self::rgb8(0, 0, 255),
            "orange" => Self::rgb8(255, 165, 0),
            "purple" => Self::rgb8(128, 0, 128),
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "gray" | "grey" => Self::rgb8(128, 128, 128),
            "cyan" => Self::rgb8(0, 255, 255),
            "magenta" => Self::rgb8(255, 0, 255),
            "pink" => Self::rgb8(255, 192, 203),
            _ => return None,
        };
        Some(color)
    }

    /// The same color with its alpha multiplied by `opacity`.
    pub fn faded(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// 8-bit channels, alpha included.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    /// Emit as a CSS color: `#RRGGBB` when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        if (self.a - 1.0).abs() < f32::EPSILON {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r},{g},{b},{})", self.a)
        }
    }
}

/// Format a number the way the driver expects to read it back:
/// integral values without a trailing `.0`.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// A labeled point in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// A connection between two existing vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub directed: bool,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from, self.to)
    }
}

/// The driver-visible snapshot of world state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a vertex by ID.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex(id).is_some()
    }

    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.edges.iter().any(|e| e.key() == key)
    }

    /// Vertex IDs in insertion order.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.iter().map(|v| v.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Compact `id:label` listing, e.g. `A:A, B:Start`.
    pub fn listing(&self) -> String {
        self.vertices
            .iter()
            .map(|v| format!("{}:{}", v.id, v.label))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Serialize to the JSON snapshot handed to the driver.
    pub fn to_json(&self) -> String {
        // Serializing plain strings, numbers and bools cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"vertices":[],"edges":[]}"#.into())
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    /// Returns the serde error text if the snapshot is malformed.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid graph snapshot: {e}"))
    }

    /// Same vertex set and same edge set, ignoring insertion order.
    pub fn equivalent(&self, other: &Graph) -> bool {
        fn same_set<T: PartialEq>(a: &[T], b: &[T]) -> bool {
            a.len() == b.len() && a.iter().all(|x| b.contains(x)) && b.iter().all(|x| a.contains(x))
        }
        same_set(&self.vertices, &other.vertices) && same_set(&self.edges, &other.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vertex(id: &str, x: f64, y: f64) -> Vertex {
        Vertex {
            id: VertexId::intern(id),
            x,
            y,
            label: id.to_string(),
        }
    }

    #[test]
    fn parse_hex_and_named_colors() {
        assert_eq!(Color::parse("#4a9eff"), Some(Color::rgb8(0x4a, 0x9e, 0xff)));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("Yellow"), Some(Color::rgb8(255, 255, 0)));
        assert_eq!(Color::parse("chartreuse-ish"), None);
    }

    #[test]
    fn parse_rgba_function() {
        let c = Color::parse("rgba(0,0,0,0.7)").unwrap();
        let [r, g, b, _] = c.to_rgba8();
        assert_eq!((r, g, b), (0, 0, 0));
        assert!((c.a - 0.7).abs() < 1e-6);
        assert_eq!(c.to_css(), "rgba(0,0,0,0.7)");
    }

    #[test]
    fn css_roundtrip_opaque() {
        let c = Color::from_hex("#1a3a5a").unwrap();
        assert_eq!(c.to_css(), "#1a3a5a");
    }

    #[test]
    fn numbers_format_like_the_driver_writes_them() {
        assert_eq!(format_number(200.0), "200");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn listing_and_json_snapshot() {
        let mut graph = Graph::new();
        graph.vertices.push(vertex("A", 200.0, 200.0));
        graph.vertices.push(vertex("B", 400.0, 200.0));
        graph.edges.push(Edge {
            from: VertexId::intern("A"),
            to: VertexId::intern("B"),
            weight: None,
            directed: false,
        });

        assert_eq!(graph.listing(), "A:A, B:B");
        assert_eq!(
            graph.to_json(),
            r#"{"vertices":[{"id":"A","x":200.0,"y":200.0,"label":"A"},{"id":"B","x":400.0,"y":200.0,"label":"B"}],"edges":[{"from":"A","to":"B","directed":false}]}"#
        );
        assert_eq!(Graph::from_json(&graph.to_json()).unwrap(), graph);
    }

    #[test]
    fn equivalence_ignores_order() {
        let mut a = Graph::new();
        a.vertices.push(vertex("A", 1.0, 1.0));
        a.vertices.push(vertex("B", 2.0, 2.0));
        let mut b = Graph::new();
        b.vertices.push(vertex("B", 2.0, 2.0));
        b.vertices.push(vertex("A", 1.0, 1.0));
        assert!(a.equivalent(&b));

        b.vertices[0].x = 3.0;
        assert!(!a.equivalent(&b));
    }
}
